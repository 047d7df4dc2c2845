use std::{fmt, future::Future, time::Duration};

use async_trait::async_trait;
use filmi_model::{MediaKind, MediaRef};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PlaylistSource, TrailerSource, status_error};
use crate::error::ProviderError;

pub const YOUTUBE_V3_BASE: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Clone)]
pub struct YoutubeSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for YoutubeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YoutubeSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: YOUTUBE_V3_BASE.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultType {
    Video,
    Playlist,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery<'a> {
    part: &'static str,
    q: &'a str,
    #[serde(rename = "type")]
    result_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_embeddable: Option<&'static str>,
    max_results: u8,
    key: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: ItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
    playlist_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnail {
    #[serde(default)]
    url: String,
}

impl Snippet {
    fn thumbnail_url(&self) -> String {
        [&self.thumbnails.high, &self.thumbnails.medium]
            .into_iter()
            .flatten()
            .map(|thumb| thumb.url.as_str())
            .find(|url| !url.is_empty())
            .unwrap_or_default()
            .to_owned()
    }
}

fn first_video(response: SearchResponse, kind: MediaKind) -> Option<MediaRef> {
    let item = response.items.into_iter().next()?;
    let video_id = item.id.video_id.filter(|id| !id.is_empty())?;
    let thumbnail = item.snippet.thumbnail_url();
    Some(MediaRef::video(kind, video_id, item.snippet.title, thumbnail))
}

fn first_playlist(response: SearchResponse) -> Option<MediaRef> {
    let item = response.items.into_iter().next()?;
    let playlist_id = item.id.playlist_id.filter(|id| !id.is_empty())?;
    let thumbnail = item.snippet.thumbnail_url();
    Some(MediaRef::playlist(playlist_id, item.snippet.title, thumbnail))
}

/// Take the first playlist hit, or run the jukebox video search and take its
/// first video. The fallback search only runs when no playlist was found.
async fn playlist_or_fallback<F, Fut>(
    playlists: SearchResponse,
    fallback: F,
) -> Result<Option<MediaRef>, ProviderError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<SearchResponse, ProviderError>>,
{
    if let Some(playlist) = first_playlist(playlists) {
        return Ok(Some(playlist));
    }
    let videos = fallback().await?;
    Ok(first_video(videos, MediaKind::FallbackVideo))
}

/// YouTube Data API search client used for trailers and song playlists.
pub struct YoutubeClient {
    http: reqwest::Client,
    settings: YoutubeSettings,
}

impl fmt::Debug for YoutubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YoutubeClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl YoutubeClient {
    pub fn new(settings: YoutubeSettings) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { http, settings })
    }

    async fn search(
        &self,
        q: &str,
        result_type: ResultType,
    ) -> Result<SearchResponse, ProviderError> {
        let key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(ProviderError::Unconfigured("YOUTUBE_API_KEY"))?;

        let query = SearchQuery {
            part: "snippet",
            q,
            result_type: match result_type {
                ResultType::Video => "video",
                ResultType::Playlist => "playlist",
            },
            video_embeddable: (result_type == ResultType::Video)
                .then_some("true"),
            max_results: 1,
            key,
        };

        debug!(q = %q, ?result_type, "Querying YouTube search");
        let response = self
            .http
            .get(format!("{}/search", self.settings.base_url))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<SearchResponse>()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()));
        }

        #[derive(Debug, Deserialize)]
        struct ErrorBody {
            error: Option<ErrorDetail>,
        }
        #[derive(Debug, Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error?.message)
            .unwrap_or_else(|| {
                format!("YouTube request failed with status {status}")
            });

        // Quota exhaustion is reported as 403.
        if status.as_u16() == 403 {
            return Err(ProviderError::RateLimited);
        }
        Err(status_error(status, message))
    }
}

#[async_trait]
impl TrailerSource for YoutubeClient {
    async fn trailer(
        &self,
        title: &str,
    ) -> Result<Option<MediaRef>, ProviderError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let response = self
            .search(&format!("{title} official trailer"), ResultType::Video)
            .await?;
        Ok(first_video(response, MediaKind::Trailer))
    }
}

#[async_trait]
impl PlaylistSource for YoutubeClient {
    async fn playlist(
        &self,
        title: &str,
    ) -> Result<Option<MediaRef>, ProviderError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let playlists = self
            .search(
                &format!("{title} songs jukebox playlist"),
                ResultType::Playlist,
            )
            .await?;
        let fallback_query = format!("{title} songs jukebox");
        playlist_or_fallback(playlists, || {
            self.search(&fallback_query, ResultType::Video)
        })
        .await
    }
}
