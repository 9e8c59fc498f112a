use crate::error::{Error, Result, TranscriptServiceError};
use crate::models::CaptionSegment;
use async_trait::async_trait;
use log::debug;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

/// Result of asking for one video's captions.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Captions(Vec<CaptionSegment>),
    /// No track in the requested language, captions disabled, or the video is gone.
    Unavailable(String),
    Failed(TranscriptServiceError),
}

#[async_trait(?Send)]
pub trait CaptionSource {
    async fn fetch(&self, video_id: &str, language: &str) -> FetchOutcome;
}

pub struct TranscriptFetcher {
    api: YouTubeTranscriptApi,
}

impl TranscriptFetcher {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::TranscriptSetup(e.to_string()))?;
        Ok(TranscriptFetcher { api })
    }
}

#[async_trait(?Send)]
impl CaptionSource for TranscriptFetcher {
    async fn fetch(&self, video_id: &str, language: &str) -> FetchOutcome {
        let languages = [language];

        match self.api.fetch_transcript(video_id, &languages, false).await {
            Ok(transcript) => {
                let segments = sorted_segments(
                    transcript
                        .into_iter()
                        .map(|entry| CaptionSegment::new(entry.start, entry.text))
                        .collect(),
                );
                debug!(
                    "Fetched {} captions for video ID: {video_id}",
                    segments.len()
                );
                FetchOutcome::Captions(segments)
            }
            Err(e) => classify_transcript_error(video_id, e),
        }
    }
}

fn classify_transcript_error(video_id: &str, error: CouldNotRetrieveTranscript) -> FetchOutcome {
    match &error.reason {
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled) => {
            FetchOutcome::Unavailable("subtitles are disabled".to_string())
        }
        Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
            FetchOutcome::Unavailable("no transcript in the requested language".to_string())
        }
        Some(CouldNotRetrieveTranscriptReason::VideoUnavailable) => {
            FetchOutcome::Unavailable("video is unavailable".to_string())
        }
        Some(CouldNotRetrieveTranscriptReason::VideoUnplayable { reason, .. }) => {
            FetchOutcome::Unavailable(match reason {
                Some(reason) => format!("video is unplayable: {reason}"),
                None => "video is unplayable".to_string(),
            })
        }
        Some(CouldNotRetrieveTranscriptReason::AgeRestricted) => {
            FetchOutcome::Unavailable("video is age restricted".to_string())
        }
        Some(CouldNotRetrieveTranscriptReason::InvalidVideoId) => {
            FetchOutcome::Unavailable("not a valid video ID".to_string())
        }
        _ => FetchOutcome::Failed(TranscriptServiceError {
            video_id: video_id.to_string(),
            message: error.to_string(),
        }),
    }
}

/// Orders segments by start time, keeping service order for equal starts.
pub fn sorted_segments(mut segments: Vec<CaptionSegment>) -> Vec<CaptionSegment> {
    segments.sort_by(|a, b| {
        a.start_time
            .partial_cmp(&b.start_time)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_ordered_by_start() {
        let segments = sorted_segments(vec![
            CaptionSegment::new(4.0, "third"),
            CaptionSegment::new(1.5, "first"),
            CaptionSegment::new(4.0, "fourth"),
            CaptionSegment::new(2.0, "second"),
        ]);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third", "fourth"]);
    }

    fn failure(reason: CouldNotRetrieveTranscriptReason) -> FetchOutcome {
        classify_transcript_error(
            "vid",
            CouldNotRetrieveTranscript {
                video_id: "vid".to_string(),
                reason: Some(reason),
            },
        )
    }

    #[test]
    fn videos_without_retrievable_captions_are_unavailable() {
        let reasons = vec![
            CouldNotRetrieveTranscriptReason::TranscriptsDisabled,
            CouldNotRetrieveTranscriptReason::VideoUnavailable,
            CouldNotRetrieveTranscriptReason::AgeRestricted,
            CouldNotRetrieveTranscriptReason::InvalidVideoId,
            CouldNotRetrieveTranscriptReason::VideoUnplayable {
                reason: Some("Private video".to_string()),
                sub_reasons: vec![],
            },
        ];
        for reason in reasons {
            let outcome = failure(reason);
            assert!(
                matches!(outcome, FetchOutcome::Unavailable(_)),
                "{outcome:?}"
            );
        }
    }

    #[test]
    fn service_trouble_is_a_fetch_error() {
        let outcome = failure(CouldNotRetrieveTranscriptReason::YouTubeRequestFailed(
            "connection reset".to_string(),
        ));
        match outcome {
            FetchOutcome::Failed(e) => assert_eq!(e.video_id, "vid"),
            other => panic!("expected a fetch error, got {other:?}"),
        }
    }
}
