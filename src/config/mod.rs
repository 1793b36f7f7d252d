use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::fs;

/// Configuration document holding library paths.
///
/// The document is a YAML mapping of sections, each addressable by
/// `(section, key)`:
///
/// ```yaml
/// movie:
///   path: /library/movies
/// tv:
///   path: /library/tv
/// ```
///
/// It is read fresh every time it is loaded; nothing is cached between runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    sections: IndexMap<String, Value>,
}

impl ConfigDocument {
    /// Load and parse the document at `path`.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let file_contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path))?;

        let document = Self::from_yaml(&file_contents)
            .with_context(|| format!("Failed to parse config: {}", path))?;

        tracing::debug!(
            "Loaded config from {} ({} sections)",
            path,
            document.sections.len()
        );
        Ok(document)
    }

    /// Parse a document from YAML text. An empty document has no sections.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let document: ConfigDocument =
            serde_yaml_ng::from_str(contents).context("Config is not a YAML mapping")?;
        Ok(document)
    }

    /// Look up a string value by section and key.
    ///
    /// Non-string values and missing sections or keys yield `None`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|value| value.get(key))
            .and_then(Value::as_str)
    }

    /// Section names in document order
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}
