use crate::services::cleaning::{
    CleanSummary, CleaningError, MediaCleaner, MediaFileKind, clean_library, top_level_dir,
};
use crate::services::release_parser::{ReleaseParser, clean_title, subtitle_language};
use camino::{Utf8Path, Utf8PathBuf};

/// Cleaner for a tv-series library.
///
/// Episodes end up as `<root>/<Show>/Season NN/<Show> - SNNEMM.<ext>`. Names that only
/// carry an episode marker take the show name from their folder directly under the root.
pub struct TvCleaner {
    parser: ReleaseParser,
}

impl TvCleaner {
    pub fn new() -> Self {
        Self {
            parser: ReleaseParser::new(),
        }
    }

    /// Where `path` belongs inside `root`, or `None` if no episode marker can be found.
    pub fn canonical_path(
        &self,
        root: &Utf8Path,
        path: &Utf8Path,
        kind: MediaFileKind,
    ) -> Option<Utf8PathBuf> {
        let stem = path.file_stem()?;
        let ext = path.extension()?.to_ascii_lowercase();

        let language = match kind {
            MediaFileKind::Subtitle => subtitle_language(stem),
            MediaFileKind::Video => None,
        };

        let episode = self.parser.parse_episode(stem)?;
        let show = match episode.show.clone() {
            Some(show) => show,
            None => clean_title(top_level_dir(root, path)?),
        };
        if show.is_empty() {
            return None;
        }

        let stem = format!("{} - {}", show, episode.marker());
        let file_name = match language {
            Some(tag) => format!("{}.{}.{}", stem, tag, ext),
            None => format!("{}.{}", stem, ext),
        };
        Some(
            root.join(&show)
                .join(format!("Season {:02}", episode.season))
                .join(file_name),
        )
    }
}

impl Default for TvCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaCleaner for TvCleaner {
    fn clean(&self, root: &Utf8Path, safe_mode: bool) -> Result<CleanSummary, CleaningError> {
        clean_library(root, safe_mode, |path, kind| {
            self.canonical_path(root, path, kind)
        })
    }
}
