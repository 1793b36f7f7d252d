use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use thiserror::Error;
use walkdir::WalkDir;

const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "m4v", "mov", "wmv", "mpg", "mpeg", "ts"];
const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "sub", "ass"];

/// Suffixes torrent and download clients give files that are still being written
const INCOMPLETE_SUFFIXES: &[&str] = &[".part", ".!qb", ".!ut", ".crdownload", ".tmp"];

/// A single rename, planned (safe mode) or applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanAction {
    pub source: Utf8PathBuf,
    pub destination: Utf8PathBuf,
    pub applied: bool,
}

/// A file the cleaner looked at but left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub path: Utf8PathBuf,
    pub reason: String,
}

/// A recoverable per-file failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    pub path: Utf8PathBuf,
    pub message: String,
}

/// Everything a cleaner did (or would have done) to one library root.
#[derive(Debug, Clone, Default)]
pub struct CleanSummary {
    pub actions: Vec<CleanAction>,
    pub skipped: Vec<SkippedItem>,
    pub errors: Vec<ItemError>,
    pub removed_dirs: Vec<Utf8PathBuf>,
    pub already_clean: usize,
}

impl CleanSummary {
    /// Check if anything was (or would be) renamed
    pub fn has_changes(&self) -> bool {
        !self.actions.is_empty() || !self.removed_dirs.is_empty()
    }

    pub fn applied_count(&self) -> usize {
        self.actions.iter().filter(|a| a.applied).count()
    }

    pub fn planned_count(&self) -> usize {
        self.actions.iter().filter(|a| !a.applied).count()
    }

    /// Get a summary string of what was cleaned
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        let applied = self.applied_count();
        let planned = self.planned_count();
        if applied > 0 {
            parts.push(format!("{} renamed", applied));
        }
        if planned > 0 {
            parts.push(format!("{} planned", planned));
        }
        if !self.removed_dirs.is_empty() {
            parts.push(format!("{} empty directories removed", self.removed_dirs.len()));
        }
        if self.already_clean > 0 {
            parts.push(format!("{} already clean", self.already_clean));
        }
        if !self.skipped.is_empty() {
            parts.push(format!("{} skipped", self.skipped.len()));
        }
        if !self.errors.is_empty() {
            parts.push(format!("{} errors", self.errors.len()));
        }

        if parts.is_empty() {
            "Nothing to clean".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Errors that stop a cleaner before it can look at any file
#[derive(Error, Debug)]
pub enum CleaningError {
    #[error("Library root {0} does not exist")]
    RootMissing(Utf8PathBuf),

    #[error("Library root {0} is not a directory")]
    RootNotDirectory(Utf8PathBuf),

    #[error("Failed to read library root {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reorganizes one library root into its canonical layout.
///
/// Implementations must not touch the filesystem when `safe_mode` is true and
/// must collect per-file problems into the returned [`CleanSummary`] instead of
/// failing the whole call.
#[cfg_attr(test, mockall::automock)]
pub trait MediaCleaner {
    fn clean(&self, root: &Utf8Path, safe_mode: bool) -> Result<CleanSummary, CleaningError>;
}

/// Kind of library file a cleaner is willing to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFileKind {
    Video,
    Subtitle,
}

/// Classify a file by extension. Anything else is ignored by the cleaners.
pub fn classify(path: &Utf8Path) -> Option<MediaFileKind> {
    let ext = path.extension()?.to_ascii_lowercase();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaFileKind::Video)
    } else if SUBTITLE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaFileKind::Subtitle)
    } else {
        None
    }
}

/// True for files a download client is still writing.
pub fn is_incomplete_download(path: &Utf8Path) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_ascii_lowercase(),
        None => return false,
    };
    INCOMPLETE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// True for release sample clips, which are never worth keeping in the library layout
pub fn is_sample(path: &Utf8Path) -> bool {
    let stem = path.file_stem().unwrap_or_default().to_ascii_lowercase();
    let in_sample_dir = path
        .parent()
        .and_then(Utf8Path::file_name)
        .is_some_and(|dir| dir.eq_ignore_ascii_case("sample"));

    in_sample_dir || stem == "sample" || stem.ends_with("-sample") || stem.ends_with(".sample")
}

/// First path component below `root`, used as a naming fallback when the
/// file name itself carries no usable title.
pub fn top_level_dir<'a>(root: &Utf8Path, path: &'a Utf8Path) -> Option<&'a str> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components = relative.components();
    let first = components.next()?;
    // A file directly in the root has no enclosing directory.
    components.next()?;
    Some(first.as_str())
}

/// Walk `root`, ask `canonical` where each media file belongs, and move it there.
///
/// `canonical` returns `None` for names it cannot parse; those files are recorded
/// as skipped. Files already at their canonical location are counted and left
/// alone, so running twice in a row is a no-op the second time.
pub fn clean_library<F>(
    root: &Utf8Path,
    safe_mode: bool,
    canonical: F,
) -> Result<CleanSummary, CleaningError>
where
    F: Fn(&Utf8Path, MediaFileKind) -> Option<Utf8PathBuf>,
{
    check_root(root)?;

    let mut summary = CleanSummary::default();
    let candidates = collect_candidates(root, &mut summary);
    tracing::debug!("Found {} media files under {}", candidates.len(), root);

    let mut claimed: HashSet<Utf8PathBuf> = HashSet::new();
    let mut vacated: BTreeSet<Utf8PathBuf> = BTreeSet::new();

    for (path, kind) in candidates {
        let Some(destination) = canonical(&path, kind) else {
            tracing::debug!("Could not parse a name from {}", path);
            summary.skipped.push(SkippedItem {
                path,
                reason: "unrecognized name".to_string(),
            });
            continue;
        };

        if destination == path {
            summary.already_clean += 1;
            continue;
        }

        if destination.exists() || !claimed.insert(destination.clone()) {
            tracing::warn!("Not moving {}: {} already exists", path, destination);
            summary.errors.push(ItemError {
                path,
                message: format!("destination {} already exists", destination),
            });
            continue;
        }

        if safe_mode {
            tracing::info!("Would move {} -> {}", path, destination);
            summary.actions.push(CleanAction {
                source: path,
                destination,
                applied: false,
            });
            continue;
        }

        match move_file(&path, &destination) {
            Ok(()) => {
                tracing::info!("Moved {} -> {}", path, destination);
                if let Some(parent) = path.parent() {
                    vacated.insert(parent.to_path_buf());
                }
                summary.actions.push(CleanAction {
                    source: path,
                    destination,
                    applied: true,
                });
            }
            Err(e) => {
                tracing::error!("Failed to move {}: {}", path, e);
                summary.errors.push(ItemError {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    if !safe_mode {
        remove_vacated_dirs(root, vacated, &mut summary);
    }

    Ok(summary)
}

fn check_root(root: &Utf8Path) -> Result<(), CleaningError> {
    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CleaningError::RootMissing(root.to_path_buf()));
        }
        Err(source) => {
            return Err(CleaningError::Io {
                path: root.to_path_buf(),
                source,
            });
        }
    };

    if !metadata.is_dir() {
        return Err(CleaningError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(())
}

fn collect_candidates(root: &Utf8Path, summary: &mut CleanSummary) -> Vec<(Utf8PathBuf, MediaFileKind)> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .and_then(|p| Utf8PathBuf::try_from(p.to_path_buf()).ok())
                    .unwrap_or_else(|| root.to_path_buf());
                summary.errors.push(ItemError {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = match Utf8PathBuf::try_from(entry.into_path()) {
            Ok(path) => path,
            Err(e) => {
                summary.skipped.push(SkippedItem {
                    path: Utf8PathBuf::from(e.as_path().to_string_lossy().into_owned()),
                    reason: "file name is not valid UTF-8".to_string(),
                });
                continue;
            }
        };

        if is_incomplete_download(&path) {
            tracing::debug!("Ignoring incomplete download {}", path);
            continue;
        }

        let Some(kind) = classify(&path) else {
            continue;
        };

        if is_sample(&path) {
            summary.skipped.push(SkippedItem {
                path,
                reason: "sample".to_string(),
            });
            continue;
        }

        candidates.push((path, kind));
    }

    candidates
}

fn move_file(source: &Utf8Path, destination: &Utf8Path) -> std::io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(source, destination)
}

/// Remove directories emptied by this run, deepest first, never the root itself.
fn remove_vacated_dirs(root: &Utf8Path, vacated: BTreeSet<Utf8PathBuf>, summary: &mut CleanSummary) {
    for dir in vacated.into_iter().rev() {
        let mut current = Some(dir.as_path());
        while let Some(candidate) = current {
            if candidate == root || !candidate.starts_with(root) {
                break;
            }
            let is_empty = fs::read_dir(candidate)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if !is_empty {
                break;
            }
            match fs::remove_dir(candidate) {
                Ok(()) => {
                    tracing::info!("Removed empty directory {}", candidate);
                    summary.removed_dirs.push(candidate.to_path_buf());
                }
                Err(e) => {
                    summary.errors.push(ItemError {
                        path: candidate.to_path_buf(),
                        message: e.to_string(),
                    });
                    break;
                }
            }
            current = candidate.parent();
        }
    }
}
