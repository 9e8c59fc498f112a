use crate::error::{Error, Result};
use crate::models::{CaptionSegment, MatchRecord, VideoRef};

/// A search phrase in its comparison form: case folded, single spaces, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPhrase {
    original: String,
    normalized: String,
}

impl SearchPhrase {
    pub fn new(phrase: &str) -> Result<Self> {
        let normalized = normalize(phrase);
        if normalized.is_empty() {
            return Err(Error::invalid_input("search phrase must not be empty"));
        }
        Ok(SearchPhrase {
            original: phrase.trim().to_string(),
            normalized,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn matches(&self, text: &str) -> bool {
        normalize(text).contains(&self.normalized)
    }
}

/// Uppercasing first expands `ß` to `SS`, so both spellings fold together.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_uppercase().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One record per matching segment, in segment order.
pub fn search(
    video: &VideoRef,
    segments: &[CaptionSegment],
    phrase: &SearchPhrase,
) -> Vec<MatchRecord> {
    segments
        .iter()
        .filter(|segment| phrase.matches(&segment.text))
        .map(|segment| MatchRecord {
            video_id: video.video_id.clone(),
            start_time: segment.start_time,
            text: segment.text.clone(),
        })
        .collect()
}
