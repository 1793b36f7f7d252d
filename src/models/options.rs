use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Library kinds the tool knows how to clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Movie,
    TvSeries,
}

impl MediaType {
    /// All media types in the fixed cleaning order (movie before tv-series).
    pub const ALL: [MediaType; 2] = [MediaType::Movie, MediaType::TvSeries];

    /// Section name used in the configuration document
    pub fn section(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::TvSeries => "tv",
        }
    }

    /// Long option that sets this type's directory explicitly
    pub fn dir_option(self) -> &'static str {
        match self {
            MediaType::Movie => "movie-dir",
            MediaType::TvSeries => "tv-dir",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::TvSeries => write!(f, "tv-series"),
        }
    }
}

/// Console verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// Filter directive handed to the tracing subscriber
    pub fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Where the root directory of one media type comes from.
///
/// Explicit paths always win over the configuration document; an empty explicit
/// path counts as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSource {
    Explicit(Utf8PathBuf),
    ConfigFile(Utf8PathBuf),
    Unset,
}

impl PathSource {
    pub fn new(explicit: Option<&Utf8Path>, config: Option<&Utf8Path>) -> Self {
        match (explicit, config) {
            (Some(path), _) if !path.as_str().trim().is_empty() => {
                PathSource::Explicit(path.to_path_buf())
            }
            (_, Some(config)) if !config.as_str().trim().is_empty() => {
                PathSource::ConfigFile(config.to_path_buf())
            }
            _ => PathSource::Unset,
        }
    }
}

/// The operator's intent for a single run.
///
/// Constructed once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub clean_movie: bool,
    pub clean_tv: bool,
    pub force: bool,
    pub safe_mode: bool,
    pub verbosity: Verbosity,
    pub movie_dir: Option<Utf8PathBuf>,
    pub tv_dir: Option<Utf8PathBuf>,
    pub config_path: Option<Utf8PathBuf>,
}

impl RunOptions {
    /// Media types selected for this run, movie first.
    pub fn requested(&self) -> Vec<MediaType> {
        MediaType::ALL
            .into_iter()
            .filter(|media| self.is_requested(*media))
            .collect()
    }

    pub fn is_requested(&self, media: MediaType) -> bool {
        match media {
            MediaType::Movie => self.clean_movie,
            MediaType::TvSeries => self.clean_tv,
        }
    }

    pub fn explicit_dir(&self, media: MediaType) -> Option<&Utf8Path> {
        match media {
            MediaType::Movie => self.movie_dir.as_deref(),
            MediaType::TvSeries => self.tv_dir.as_deref(),
        }
    }

    /// The path source that applies to `media` under these options
    pub fn path_source(&self, media: MediaType) -> PathSource {
        PathSource::new(self.explicit_dir(media), self.config_path.as_deref())
    }
}
