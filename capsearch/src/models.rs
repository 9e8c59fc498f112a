use crate::error::{Error, Result};
use std::path::PathBuf;

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub video_id: String,
    pub title: Option<String>,
}

impl VideoRef {
    pub fn new(video_id: impl Into<String>) -> Self {
        VideoRef {
            video_id: video_id.into(),
            title: None,
        }
    }

    pub fn with_title(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        VideoRef {
            video_id: video_id.into(),
            title: Some(title.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSegment {
    pub start_time: f64,
    pub text: String,
}

impl CaptionSegment {
    pub fn new(start_time: f64, text: impl Into<String>) -> Self {
        CaptionSegment {
            start_time,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub video_id: String,
    pub start_time: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoDetails {
    pub title: String,
    pub channel_name: String,
    pub channel_id: String,
    pub upload_date: String, // RFC 3339 as returned by the API
    pub views: u64,
}

/// Everything the writer needs for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMatches {
    pub video: VideoRef,
    pub details: Option<VideoDetails>,
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    Channel { channel: String, count: usize },
    ExplicitList(Vec<String>),
    FileList(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub phrase: String,
    pub language: String,
}

impl SearchRequest {
    pub fn new(mode: SearchMode, phrase: &str, language: &str) -> Result<Self> {
        if phrase.split_whitespace().next().is_none() {
            return Err(Error::invalid_input("search phrase must not be empty"));
        }

        match &mode {
            SearchMode::Channel { channel, count } => {
                if channel.trim().is_empty() {
                    return Err(Error::invalid_input("channel must not be empty"));
                }
                if *count == 0 {
                    return Err(Error::invalid_input(
                        "number of videos must be a positive integer",
                    ));
                }
            }
            SearchMode::ExplicitList(ids) => {
                if ids.iter().all(|id| id.trim().is_empty()) {
                    return Err(Error::invalid_input("no video IDs provided"));
                }
            }
            SearchMode::FileList(path) => {
                if path.as_os_str().is_empty() {
                    return Err(Error::invalid_input("video ID file path must not be empty"));
                }
            }
        }

        let language = language.trim();
        let language = if language.is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else if is_valid_language_code(language) {
            language.to_string()
        } else {
            return Err(Error::invalid_input(format!(
                "`{language}` is not a valid caption language code"
            )));
        };

        Ok(SearchRequest {
            mode,
            phrase: phrase.trim().to_string(),
            language,
        })
    }
}

/// Accepts `en`, `pt-BR`, `zh-Hans` style codes.
pub fn is_valid_language_code(code: &str) -> bool {
    let mut parts = code.split('-');
    let primary = parts.next().unwrap_or_default();
    let primary_ok =
        (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());

    primary_ok
        && parts.all(|p| (2..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_matches: usize,
    pub videos_searched: usize,
    pub videos_with_matches: usize,
    pub skipped_unavailable: usize,
    pub skipped_failed: usize,
    pub output_path: PathBuf,
}

impl RunSummary {
    pub fn videos_skipped(&self) -> usize {
        self.skipped_unavailable + self.skipped_failed
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plural = if self.total_matches == 1 { "" } else { "es" };
        writeln!(f, "Search finished!")?;
        writeln!(
            f,
            "Found a total of {} match{plural} in the captions.",
            self.total_matches
        )?;
        writeln!(
            f,
            "Searched {} video(s); skipped {} ({} without captions, {} after fetch errors).",
            self.videos_searched,
            self.videos_skipped(),
            self.skipped_unavailable,
            self.skipped_failed
        )?;
        write!(f, "Generated .txt file at: {}", self.output_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_language_to_english() {
        let request =
            SearchRequest::new(SearchMode::ExplicitList(vec!["a".into()]), "hello", " ").unwrap();
        assert_eq!(request.language, "en");
    }

    #[test]
    fn request_rejects_blank_phrase() {
        let result = SearchRequest::new(SearchMode::ExplicitList(vec!["a".into()]), "  \t", "en");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn request_rejects_zero_count() {
        let mode = SearchMode::Channel {
            channel: "UCxyz".into(),
            count: 0,
        };
        assert!(SearchRequest::new(mode, "hello", "en").is_err());
    }

    #[test]
    fn request_rejects_empty_id_list() {
        let mode = SearchMode::ExplicitList(vec![" ".into(), String::new()]);
        assert!(SearchRequest::new(mode, "hello", "en").is_err());
    }

    #[test]
    fn summary_reports_skips() {
        let summary = RunSummary {
            total_matches: 1,
            videos_searched: 1,
            videos_with_matches: 1,
            skipped_unavailable: 1,
            skipped_failed: 0,
            output_path: PathBuf::from("transcripts/hello_matches.txt"),
        };
        let text = summary.to_string();
        assert!(text.contains("Found a total of 1 match in the captions."));
        assert!(text.contains("skipped 1 (1 without captions, 0 after fetch errors)"));
        assert!(text.ends_with("transcripts/hello_matches.txt"));
    }

    #[test]
    fn language_codes() {
        assert!(is_valid_language_code("en"));
        assert!(is_valid_language_code("pt-BR"));
        assert!(is_valid_language_code("zh-Hans"));
        assert!(!is_valid_language_code("english"));
        assert!(!is_valid_language_code("e"));
        assert!(!is_valid_language_code("en-"));
        assert!(!is_valid_language_code("1a"));
    }
}
