use crate::config::ConfigDocument;
use crate::models::{MediaType, PathSource, RunOptions};
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Key looked up in each media type's configuration section
pub const PATH_KEY: &str = "path";

/// Errors resolving a library root
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No path set for {} library, see --{} or --config", .0, .0.dir_option())]
    NoPathConfigured(MediaType),

    #[error("Config unusable: {0}")]
    ConfigUnreadable(String),
}

/// Turns explicit paths and the configuration document into library roots.
pub struct PathResolver;

impl PathResolver {
    /// Resolve the root for `media`.
    ///
    /// An explicit, non-empty path wins; otherwise `(media, "path")` is looked up in
    /// the document at `config`.
    pub fn resolve(
        media: MediaType,
        explicit: Option<&Utf8Path>,
        config: Option<&Utf8Path>,
    ) -> Result<Utf8PathBuf, ResolveError> {
        Self::resolve_source(media, &PathSource::new(explicit, config), &mut None)
    }

    /// Resolve every requested media type, movie first.
    ///
    /// All types are checked for a path source before the configuration document is
    /// read, and the document is read at most once per call.
    pub fn resolve_all(options: &RunOptions) -> Result<Vec<(MediaType, Utf8PathBuf)>, ResolveError> {
        let sources: Vec<(MediaType, PathSource)> = options
            .requested()
            .into_iter()
            .map(|media| (media, options.path_source(media)))
            .collect();

        if let Some((media, _)) = sources.iter().find(|(_, s)| *s == PathSource::Unset) {
            return Err(ResolveError::NoPathConfigured(*media));
        }

        let mut document = None;
        sources
            .into_iter()
            .map(|(media, source)| {
                Self::resolve_source(media, &source, &mut document).map(|root| (media, root))
            })
            .collect()
    }

    fn resolve_source(
        media: MediaType,
        source: &PathSource,
        document: &mut Option<ConfigDocument>,
    ) -> Result<Utf8PathBuf, ResolveError> {
        match source {
            PathSource::Explicit(path) => Ok(path.clone()),
            PathSource::Unset => Err(ResolveError::NoPathConfigured(media)),
            PathSource::ConfigFile(config_path) => {
                if document.is_none() {
                    let loaded = ConfigDocument::load(config_path)
                        .map_err(|e| ResolveError::ConfigUnreadable(format!("{:#}", e)))?;
                    *document = Some(loaded);
                }
                let value = document
                    .as_ref()
                    .and_then(|doc| doc.get(media.section(), PATH_KEY))
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| {
                        ResolveError::ConfigUnreadable(format!(
                            "no '{}' value in section '{}' of {}",
                            PATH_KEY,
                            media.section(),
                            config_path
                        ))
                    })?;
                Ok(Utf8PathBuf::from(value))
            }
        }
    }
}
