//! Release-name parsing for movie and episode files.
//!
//! Handles scene-style names as well as names already in the library layout:
//! - "The.Matrix.1999.1080p.BluRay.x264-GROUP" and "The Matrix (1999)"
//! - "Chicago.Fire.S14E08.1080p.WEB.h264-ETHEL", "show_1x02_title" and "Show - S01E02"

use regex::Regex;

/// Subtitle language tags preserved when a subtitle is renamed
const LANGUAGE_TAGS: &[&str] = &[
    "en", "eng", "nl", "dut", "nld", "de", "ger", "deu", "fr", "fre", "fra", "es", "spa", "it",
    "ita", "sv", "swe", "no", "nor", "da", "dan", "fi", "fin", "pt", "por", "pl", "pol",
];

/// Title and year extracted from a movie file or folder name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMovie {
    pub title: String,
    pub year: u16,
}

impl ParsedMovie {
    /// Folder and file stem for this movie, e.g. "The Matrix (1999)"
    pub fn canonical_name(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }
}

/// Episode information extracted from a file name.
///
/// `show` is `None` when the name only carries the episode marker ("S01E02.mkv").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEpisode {
    pub show: Option<String>,
    pub season: u32,
    pub episode: u32,
}

impl ParsedEpisode {
    /// Episode marker in library form, e.g. "S01E02"
    pub fn marker(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.episode)
    }
}

/// Parser with regex patterns compiled once at construction.
pub struct ReleaseParser {
    /// "<title><sep><year>" with the last plausible year winning
    movie_pattern: Regex,

    /// "<show><sep>S01E02"
    sxxexx_pattern: Regex,

    /// "<show><sep>1x02"
    nxnn_pattern: Regex,

    /// Bare "S01E02" at the start of a name
    bare_episode_pattern: Regex,
}

impl ReleaseParser {
    pub fn new() -> Self {
        Self {
            movie_pattern: Regex::new(r"^(?P<title>.+)[ ._\-(\[]+(?P<year>(?:19|20)\d{2})(?:[ ._\-)\]]|$)")
                .expect("Invalid movie regex"),
            sxxexx_pattern: Regex::new(r"(?i)^(?P<show>.+?)[ ._\-]+s(?P<season>\d{1,2})[ ._\-]?e(?P<episode>\d{1,3})")
                .expect("Invalid SxxEyy regex"),
            nxnn_pattern: Regex::new(r"(?i)^(?P<show>.+?)[ ._\-]+(?P<season>\d{1,2})x(?P<episode>\d{2,3})(?:\D|$)")
                .expect("Invalid NxMM regex"),
            bare_episode_pattern: Regex::new(r"(?i)^s(?P<season>\d{1,2})[ ._\-]?e(?P<episode>\d{1,3})")
                .expect("Invalid bare episode regex"),
        }
    }

    /// Parse a movie title and year from a file stem or folder name.
    pub fn parse_movie(&self, name: &str) -> Option<ParsedMovie> {
        let caps = self.movie_pattern.captures(name)?;
        let title = clean_title(caps.name("title")?.as_str());
        if title.is_empty() {
            return None;
        }
        let year = caps.name("year")?.as_str().parse().ok()?;
        Some(ParsedMovie { title, year })
    }

    /// Parse show, season and episode from a file stem.
    pub fn parse_episode(&self, name: &str) -> Option<ParsedEpisode> {
        if let Some(caps) = self.bare_episode_pattern.captures(name) {
            return Some(ParsedEpisode {
                show: None,
                season: caps.name("season")?.as_str().parse().ok()?,
                episode: caps.name("episode")?.as_str().parse().ok()?,
            });
        }

        let caps = self
            .sxxexx_pattern
            .captures(name)
            .or_else(|| self.nxnn_pattern.captures(name))?;

        let show = clean_title(caps.name("show")?.as_str());
        Some(ParsedEpisode {
            show: (!show.is_empty()).then_some(show),
            season: caps.name("season")?.as_str().parse().ok()?,
            episode: caps.name("episode")?.as_str().parse().ok()?,
        })
    }
}

impl Default for ReleaseParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize separators, capitalizing each word of scene-style names.
///
/// Titles without `.` or `_` separators keep their casing ("Lord of the Rings"),
/// so already-clean titles come back unchanged and renames stay idempotent.
pub fn clean_title(raw: &str) -> String {
    let scene_style = raw.contains(['.', '_']);
    raw.replace(['.', '_'], " ")
        .split_whitespace()
        .map(|word| if scene_style { capitalize(word) } else { word.to_string() })
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([' ', '-', '(', '['])
        .to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Language tag at the end of a subtitle stem ("Movie.2010.en" -> "en")
pub fn subtitle_language(stem: &str) -> Option<String> {
    let (_, tag) = stem.rsplit_once('.')?;
    let tag = tag.to_ascii_lowercase();
    LANGUAGE_TAGS.contains(&tag.as_str()).then_some(tag)
}
