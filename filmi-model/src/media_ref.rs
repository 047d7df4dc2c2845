use serde::{Deserialize, Serialize};

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed";

/// What a [`MediaRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Trailer,
    Playlist,
    /// Single "jukebox" video used when no song playlist exists.
    FallbackVideo,
}

/// Embeddable video or playlist reference.
///
/// Trailers and playlists share one rendering shape; `kind` records which
/// search produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: MediaKind,
    /// YouTube video id, or playlist id when `kind` is `Playlist`.
    pub source_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: String,
    pub embed_url: String,
}

impl MediaRef {
    pub fn video(
        kind: MediaKind,
        video_id: impl Into<String>,
        title: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        let source_id = video_id.into();
        let embed_url = format!("{YOUTUBE_EMBED_BASE}/{source_id}");
        Self {
            kind,
            source_id,
            title: title.into(),
            thumbnail_url: thumbnail_url.into(),
            embed_url,
        }
    }

    pub fn playlist(
        playlist_id: impl Into<String>,
        title: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        let source_id = playlist_id.into();
        let embed_url =
            format!("{YOUTUBE_EMBED_BASE}/videoseries?list={source_id}");
        Self {
            kind: MediaKind::Playlist,
            source_id,
            title: title.into(),
            thumbnail_url: thumbnail_url.into(),
            embed_url,
        }
    }
}
