use crate::error::{Error, Result};
use crate::models::VideoRef;
use crate::services::youtube_api::{ChannelRef, PlaylistPage, VideoCatalog, MAX_PAGE_SIZE};
use crate::utils::normalize_video_input;
use log::info;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Lazy cursor over the pages of a playlist. Nothing is requested until
/// `next_page` is called; `restart` rewinds to the first page.
pub struct UploadPages<'a, C: VideoCatalog + ?Sized> {
    catalog: &'a C,
    playlist_id: String,
    next_token: Option<String>,
    exhausted: bool,
}

impl<'a, C: VideoCatalog + ?Sized> UploadPages<'a, C> {
    pub fn new(catalog: &'a C, playlist_id: impl Into<String>) -> Self {
        UploadPages {
            catalog,
            playlist_id: playlist_id.into(),
            next_token: None,
            exhausted: false,
        }
    }

    pub async fn next_page(&mut self, max_results: usize) -> Result<Option<PlaylistPage>> {
        if self.exhausted {
            return Ok(None);
        }

        let page = self
            .catalog
            .playlist_page(&self.playlist_id, self.next_token.as_deref(), max_results)
            .await?;

        self.next_token = page.next_page_token.clone();
        self.exhausted = self.next_token.is_none();
        Ok(Some(page))
    }

    pub fn restart(&mut self) {
        self.next_token = None;
        self.exhausted = false;
    }
}

/// Newest `count` uploads of a channel.
pub async fn by_channel<C: VideoCatalog + ?Sized>(
    catalog: &C,
    channel: &str,
    count: usize,
) -> Result<Vec<VideoRef>> {
    if count == 0 {
        return Err(Error::invalid_input("number of videos must be a positive integer"));
    }

    let channel_ref = ChannelRef::parse(channel)?;
    let resolved = catalog.resolve_channel(&channel_ref).await?;
    info!(
        "Fetching up to {count} videos from channel {} ({})",
        resolved.title, resolved.channel_id
    );

    let mut pages = UploadPages::new(catalog, resolved.uploads_playlist_id);
    let mut seen = HashSet::new();
    let mut videos = Vec::new();

    while videos.len() < count {
        let remaining = count - videos.len();
        let Some(page) = pages.next_page(remaining.min(MAX_PAGE_SIZE)).await? else {
            info!("Reached end of channel videos.");
            break;
        };

        for video in page.videos {
            if videos.len() >= count {
                break;
            }
            if seen.insert(video.video_id.clone()) {
                videos.push(video);
            }
        }
    }

    info!("Collected {} video IDs", videos.len());
    Ok(videos)
}

/// No network access; duplicates are kept.
pub fn by_explicit_ids<S: AsRef<str>>(ids: &[S]) -> Result<Vec<VideoRef>> {
    let videos: Vec<VideoRef> = ids
        .iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty())
        .map(|id| VideoRef::new(normalize_video_input(id)))
        .collect();

    if videos.is_empty() {
        return Err(Error::invalid_input("no video IDs provided"));
    }
    Ok(videos)
}

/// One ID (or video URL) per line, blank lines skipped.
pub fn by_file(path: &Path) -> Result<Vec<VideoRef>> {
    let contents =
        fs::read_to_string(path).map_err(|e| Error::io("failed to read video ID file", path, e))?;
    let ids: Vec<&str> = contents.lines().collect();
    by_explicit_ids(ids.as_slice())
}

/// Splits a comma separated list typed by the user.
pub fn split_id_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
