use crate::services::cleaning::{
    CleanSummary, CleaningError, MediaCleaner, MediaFileKind, clean_library, top_level_dir,
};
use crate::services::release_parser::{ReleaseParser, subtitle_language};
use camino::{Utf8Path, Utf8PathBuf};

/// Cleaner for a movie library.
///
/// Every movie ends up as `<root>/<Title> (<Year>)/<Title> (<Year>).<ext>`; subtitles
/// keep their language tag (`<Title> (<Year>).en.srt`). When the file name carries no
/// year, the enclosing release folder directly under the root is tried instead,
/// unless that folder is already canonical: such files are extras and stay put.
pub struct MovieCleaner {
    parser: ReleaseParser,
}

impl MovieCleaner {
    pub fn new() -> Self {
        Self {
            parser: ReleaseParser::new(),
        }
    }

    /// Where `path` belongs inside `root`, or `None` if no title and year can be found.
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
        let base = match &language {
            Some(tag) => &stem[..stem.len() - tag.len() - 1],
            None => stem,
        };

        let movie = match self.parser.parse_movie(base) {
            Some(movie) => movie,
            None => {
                let dir = top_level_dir(root, path)?;
                let movie = self.parser.parse_movie(dir)?;
                // Unparseable files inside an already canonical folder are extras.
                if movie.canonical_name() == dir {
                    return None;
                }
                movie
            }
        };

        let name = movie.canonical_name();
        let file_name = match language {
            Some(tag) => format!("{}.{}.{}", name, tag, ext),
            None => format!("{}.{}", name, ext),
        };
        Some(root.join(&name).join(file_name))
    }
}

impl Default for MovieCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaCleaner for MovieCleaner {
    fn clean(&self, root: &Utf8Path, safe_mode: bool) -> Result<CleanSummary, CleaningError> {
        clean_library(root, safe_mode, |path, kind| {
            self.canonical_path(root, path, kind)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn root() -> &'static Utf8Path {
        Utf8Path::new("/library/movies")
    }

    #[test]
    fn test_canonical_video_path() {
        let cleaner = MovieCleaner::new();
        let dest = cleaner
            .canonical_path(
                root(),
                Utf8Path::new("/library/movies/The.Matrix.1999.1080p.BluRay.x264.MKV"),
                MediaFileKind::Video,
            )
            .unwrap();
        assert_eq!(
            dest,
            Utf8PathBuf::from("/library/movies/The Matrix (1999)/The Matrix (1999).mkv")
        );
    }

    #[test]
    fn test_canonical_subtitle_keeps_language() {
        let cleaner = MovieCleaner::new();
        let dest = cleaner
            .canonical_path(
                root(),
                Utf8Path::new("/library/movies/Heat.1995.720p/Heat.1995.720p.en.srt"),
                MediaFileKind::Subtitle,
            )
            .unwrap();
        assert_eq!(dest, Utf8PathBuf::from("/library/movies/Heat (1995)/Heat (1995).en.srt"));
    }

    #[test]
    fn test_folder_name_fallback() {
        let cleaner = MovieCleaner::new();
        let dest = cleaner
            .canonical_path(
                root(),
                Utf8Path::new("/library/movies/Alien.1979.REMASTERED/movie.mkv"),
                MediaFileKind::Video,
            )
            .unwrap();
        assert_eq!(dest, Utf8PathBuf::from("/library/movies/Alien (1979)/Alien (1979).mkv"));
    }

    #[test]
    fn test_extras_in_canonical_folder_left_alone() {
        let cleaner = MovieCleaner::new();
        assert!(cleaner
            .canonical_path(
                root(),
                Utf8Path::new("/library/movies/Alien (1979)/Behind the Scenes.mkv"),
                MediaFileKind::Video,
            )
            .is_none());
    }

    #[test]
    fn test_curated_library_reaches_steady_state() {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let folder = root.join("Lord of the Rings (2001)");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("Lord of the Rings (2001).mkv"), b"video").unwrap();
        fs::write(folder.join("Deleted Scenes.mkv"), b"extra").unwrap();

        for _ in 0..2 {
            let summary = MovieCleaner::new().clean(&root, false).unwrap();
            assert!(!summary.has_changes());
            assert!(summary.errors.is_empty());
            assert_eq!(summary.already_clean, 1);
            assert_eq!(summary.skipped.len(), 1);
        }
        assert!(folder.join("Deleted Scenes.mkv").exists());
    }

    #[test]
    fn test_no_year_anywhere() {
        let cleaner = MovieCleaner::new();
        assert!(cleaner
            .canonical_path(root(), Utf8Path::new("/library/movies/holiday.mkv"), MediaFileKind::Video)
            .is_none());
    }

    #[test]
    fn test_canonical_path_is_fixed_point() {
        let cleaner = MovieCleaner::new();
        let path = Utf8Path::new("/library/movies/The Matrix (1999)/The Matrix (1999).mkv");
        assert_eq!(
            cleaner.canonical_path(root(), path, MediaFileKind::Video).as_deref(),
            Some(path)
        );
    }

    #[test]
    fn test_clean_moves_release_folder() {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let release = root.join("Heat.1995.1080p.BluRay");
        fs::create_dir_all(&release).unwrap();
        fs::write(release.join("Heat.1995.1080p.BluRay.mkv"), b"video").unwrap();

        let summary = MovieCleaner::new().clean(&root, false).unwrap();

        assert_eq!(summary.applied_count(), 1);
        assert!(root.join("Heat (1995)/Heat (1995).mkv").exists());
        assert!(!release.exists());
    }
}
