use crate::error::{Error, Result};
use crate::models::{RunSummary, SearchMode, SearchRequest, VideoMatches, VideoRef};
use crate::services::caption_fetcher::{CaptionSource, FetchOutcome};
use crate::services::enumerator;
use crate::services::result_writer;
use crate::services::search_service::{search, SearchPhrase};
use crate::services::youtube_api::VideoCatalog;
use log::{debug, error, info, warn};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    SelectingMode,
    CollectingInput,
    Enumerating,
    FetchingAndSearching { current: usize, total: usize },
    Writing,
    Done(RunSummary),
    Aborted(String),
}

/// Drives one search run: enumerate, fetch and search each video in turn, write.
pub struct Orchestrator<'a, C: VideoCatalog + ?Sized, T: CaptionSource + ?Sized> {
    catalog: &'a C,
    captions: &'a T,
    state: RunState,
}

impl<'a, C: VideoCatalog + ?Sized, T: CaptionSource + ?Sized> Orchestrator<'a, C, T> {
    pub fn new(catalog: &'a C, captions: &'a T) -> Self {
        Orchestrator {
            catalog,
            captions,
            state: RunState::SelectingMode,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Records that mode selection finished and parameters are being collected.
    pub fn collecting_input(&mut self) {
        self.transition(RunState::CollectingInput);
    }

    pub async fn run(
        &mut self,
        request: &SearchRequest,
        output_path: &Path,
    ) -> Result<RunSummary> {
        match self.execute(request, output_path).await {
            Ok(summary) => {
                self.transition(RunState::Done(summary.clone()));
                Ok(summary)
            }
            Err(e) => {
                error!("Search aborted: {e}");
                self.transition(RunState::Aborted(e.to_string()));
                Err(e)
            }
        }
    }

    async fn execute(
        &mut self,
        request: &SearchRequest,
        output_path: &Path,
    ) -> Result<RunSummary> {
        let phrase = SearchPhrase::new(&request.phrase)?;

        self.transition(RunState::Enumerating);
        self.catalog.validate_credential().await?;
        let videos = self.enumerate(&request.mode).await?;

        info!(
            "Searching for '{}' in {} video(s) using language '{}'...",
            phrase.as_str(),
            videos.len(),
            request.language
        );

        let mut summary = RunSummary {
            output_path: output_path.to_path_buf(),
            ..RunSummary::default()
        };
        let mut results: Vec<VideoMatches> = Vec::new();
        let total = videos.len();

        for (index, video) in videos.into_iter().enumerate() {
            self.transition(RunState::FetchingAndSearching {
                current: index + 1,
                total,
            });

            match self.captions.fetch(&video.video_id, &request.language).await {
                FetchOutcome::Captions(segments) => {
                    summary.videos_searched += 1;
                    let matches = search(&video, &segments, &phrase);
                    if !matches.is_empty() {
                        summary.total_matches += matches.len();
                        summary.videos_with_matches += 1;
                        results.push(VideoMatches {
                            video,
                            details: None,
                            matches,
                        });
                    }
                }
                FetchOutcome::Unavailable(reason) => {
                    debug!("Skipping video ID {}: {reason}", video.video_id);
                    summary.skipped_unavailable += 1;
                }
                FetchOutcome::Failed(e) => {
                    warn!("Error processing video ID {}: {e}", video.video_id);
                    summary.skipped_failed += 1;
                }
            }

            info!(
                "Processed {}/{total} videos, {} match(es) so far",
                index + 1,
                summary.total_matches
            );
        }

        self.enrich(&mut results).await;

        self.transition(RunState::Writing);
        result_writer::write(output_path, &results)?;

        Ok(summary)
    }

    async fn enumerate(&self, mode: &SearchMode) -> Result<Vec<VideoRef>> {
        match mode {
            SearchMode::Channel { channel, count } => {
                enumerator::by_channel(self.catalog, channel, *count).await
            }
            SearchMode::ExplicitList(ids) => enumerator::by_explicit_ids(ids.as_slice()),
            SearchMode::FileList(path) => enumerator::by_file(path),
        }
    }

    /// Details only decorate the output; lookups that fail leave the header bare.
    async fn enrich(&self, results: &mut [VideoMatches]) {
        for entry in results.iter_mut() {
            match self.catalog.video_details(&entry.video.video_id).await {
                Ok(details) => entry.details = details,
                Err(Error::Quota(message)) => {
                    warn!(
                        "Quota exhausted while looking up video details, continuing without: {message}"
                    );
                    return;
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch metadata for video {}: {e}",
                        entry.video.video_id
                    );
                }
            }
        }
    }

    fn transition(&mut self, next: RunState) {
        debug!("Run state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
