use crate::error::{ApiError, Error, Result};
use crate::models::{VideoDetails, VideoRef};
use crate::utils::mask_api_key;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest `maxResults` the listing endpoints accept.
pub const MAX_PAGE_SIZE: usize = 50;

const QUOTA_REASONS: &[&str] = &[
    "quotaExceeded",
    "dailyLimitExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
];
const CREDENTIAL_REASONS: &[&str] = &[
    "keyInvalid",
    "keyExpired",
    "forbidden",
    "accessNotConfigured",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub channel_id: String,
    pub title: String,
    pub uploads_playlist_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPage {
    pub videos: Vec<VideoRef>,
    pub next_page_token: Option<String>,
}

/// How the user pointed at a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    Id(String),
    Handle(String),
}

impl ChannelRef {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim().trim_end_matches('/');

        let channel = if let Some(rest) = input.split("/channel/").nth(1) {
            // Format: https://www.youtube.com/channel/UCTeLqJq1mXUX5WWoNXLmOIA
            ChannelRef::Id(first_path_segment(rest).to_string())
        } else if let Some(rest) = input.split("/@").nth(1) {
            // Format: https://youtube.com/@RobertsSpaceInd
            ChannelRef::Handle(first_path_segment(rest).to_string())
        } else if let Some(handle) = input.strip_prefix('@') {
            ChannelRef::Handle(handle.to_string())
        } else {
            ChannelRef::Id(input.to_string())
        };

        match &channel {
            ChannelRef::Id(id) | ChannelRef::Handle(id) if id.is_empty() => Err(
                Error::invalid_input(format!("`{input}` is not a channel ID, URL or handle")),
            ),
            _ => Ok(channel),
        }
    }
}

impl std::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelRef::Id(id) => write!(f, "{id}"),
            ChannelRef::Handle(handle) => write!(f, "@{handle}"),
        }
    }
}

fn first_path_segment(rest: &str) -> &str {
    rest.split(['/', '?']).next().unwrap_or_default()
}

/// The parts of the YouTube Data API the search needs.
#[async_trait(?Send)]
pub trait VideoCatalog {
    /// Cheapest authenticated call; fails when the key is rejected.
    async fn validate_credential(&self) -> Result<()>;

    async fn resolve_channel(&self, channel: &ChannelRef) -> Result<ResolvedChannel>;

    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> Result<PlaylistPage>;

    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>>;
}

pub struct YouTubeDataClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeDataClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        YouTubeDataClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{resource}", self.base_url))
            .map_err(|e| ApiError::Malformed(format!("invalid API base URL: {e}")))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn get_json(&self, resource: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = self.endpoint(resource, params)?;
        debug!("GET {resource} {params:?}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::Transport)?;
        let body = serde_json::from_str::<Value>(&text);

        match body {
            Ok(body) if status.is_success() => Ok(body),
            Ok(body) => Err(classify_error(status.as_u16(), &body)),
            Err(_) if !status.is_success() => Err(classify_error(status.as_u16(), &Value::Null)),
            Err(e) => Err(ApiError::Malformed(format!("{resource}: {e}")).into()),
        }
    }
}

#[async_trait(?Send)]
impl VideoCatalog for YouTubeDataClient {
    async fn validate_credential(&self) -> Result<()> {
        info!(
            "Validating YouTube Data API key {}",
            mask_api_key(&self.api_key)
        );
        // Documentation: https://developers.google.com/youtube/v3/docs/i18nRegions/list
        self.get_json("i18nRegions", &[("part", "id"), ("hl", "en_US")])
            .await
            .map_err(|e| match e {
                Error::Api(ApiError::Request { status, message })
                    if (400..500).contains(&status) =>
                {
                    Error::Api(ApiError::InvalidCredential(message))
                }
                other => other,
            })?;
        Ok(())
    }

    async fn resolve_channel(&self, channel: &ChannelRef) -> Result<ResolvedChannel> {
        // Documentation: https://developers.google.com/youtube/v3/docs/channels/list
        let lookup = match channel {
            ChannelRef::Id(id) => ("id", id.as_str()),
            ChannelRef::Handle(handle) => ("forHandle", handle.as_str()),
        };
        let response = self
            .get_json("channels", &[("part", "snippet,contentDetails"), lookup])
            .await?;

        parse_channel(&response)
            .ok_or_else(|| ApiError::ChannelNotFound(channel.to_string()).into())
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> Result<PlaylistPage> {
        // Documentation: https://developers.google.com/youtube/v3/docs/playlistItems/list
        let max_results = max_results.clamp(1, MAX_PAGE_SIZE).to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response = self.get_json("playlistItems", &params).await?;
        Ok(parse_playlist_page(&response))
    }

    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>> {
        // Documentation: https://developers.google.com/youtube/v3/docs/videos
        let response = self
            .get_json("videos", &[("part", "snippet,statistics"), ("id", video_id)])
            .await?;
        Ok(parse_video_details(&response))
    }
}

/// Maps an error body of the Data API onto the failure taxonomy.
pub fn classify_error(status: u16, body: &Value) -> Error {
    let error = &body["error"];
    let message = error["message"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {status}"));
    let reasons: Vec<&str> = error["errors"]
        .as_array()
        .map(|errors| errors.iter().filter_map(|e| e["reason"].as_str()).collect())
        .unwrap_or_default();

    if reasons.iter().any(|r| QUOTA_REASONS.contains(r)) {
        Error::Quota(message)
    } else if status == 401
        || reasons.iter().any(|r| CREDENTIAL_REASONS.contains(r))
        || message.contains("API key not valid")
    {
        ApiError::InvalidCredential(message).into()
    } else {
        ApiError::Request { status, message }.into()
    }
}

pub fn parse_channel(response: &Value) -> Option<ResolvedChannel> {
    let item = response["items"].as_array()?.first()?;
    let uploads = item["contentDetails"]["relatedPlaylists"]["uploads"].as_str()?;

    Some(ResolvedChannel {
        channel_id: item["id"].as_str()?.to_string(),
        title: item["snippet"]["title"].as_str().unwrap_or("").to_string(),
        uploads_playlist_id: uploads.to_string(),
    })
}

pub fn parse_playlist_page(response: &Value) -> PlaylistPage {
    let videos = response["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let snippet = &item["snippet"];
                    let video_id = snippet["resourceId"]["videoId"].as_str()?;
                    Some(match snippet["title"].as_str() {
                        Some(title) => VideoRef::with_title(video_id, title),
                        None => VideoRef::new(video_id),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    PlaylistPage {
        videos,
        next_page_token: response["nextPageToken"]
            .as_str()
            .filter(|token| !token.is_empty())
            .map(String::from),
    }
}

pub fn parse_video_details(response: &Value) -> Option<VideoDetails> {
    let item = response["items"].as_array()?.first()?;
    let snippet = &item["snippet"];

    Some(VideoDetails {
        title: snippet["title"].as_str().unwrap_or("").to_string(),
        channel_name: snippet["channelTitle"].as_str().unwrap_or("").to_string(),
        channel_id: snippet["channelId"].as_str().unwrap_or("").to_string(),
        upload_date: snippet["publishedAt"].as_str().unwrap_or("").to_string(),
        views: item["statistics"]["viewCount"]
            .as_str()
            .unwrap_or("0")
            .parse()
            .unwrap_or(0),
    })
}
