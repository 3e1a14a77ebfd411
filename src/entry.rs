//! Normalise an aggregated YouTube API response into an h-entry style
//! document.

use std::collections::HashMap;

use log::{debug, warn};

static WATCH_PREFIX: &str = "https://www.youtube.com/watch?v=";
static EMBED_PREFIX: &str = "https://www.youtube.com/embed/";
static CHANNEL_PREFIX: &str = "https://www.youtube.com/channel/";
static SITE_PREFIX: &str = "https://www.youtube.com/";

/// Result of parsing: either a complete entry or `{"type": "unknown"}`
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Document {
    Entry(Entry),
    Unknown,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub content: String,
    /// Always the `watch?v=` form, whatever URL was fetched
    pub url: String,
    pub published: String,
    pub video: Vec<Media>,
    pub author: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<String>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Media {
    #[serde(rename = "content-type")]
    pub content_type: String,
    pub url: String,
}

/// Author details, serialised with `"type": "card"`
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename = "card")]
pub struct Card {
    pub name: String,
    /// URL of the channel's "high" thumbnail. Only the URL is kept, not
    /// the `{url, width, height}` thumbnail object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub url: String,
}

/// Normalised document alongside the body it came from
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Parsed {
    pub data: Document,
    pub original: String,
}

#[derive(Deserialize, Debug)]
struct AggregateBody {
    #[serde(default)]
    videos: Vec<serde_json::Value>,
    #[serde(default)]
    channels: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
    tags: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    id: String,
    #[serde(default)]
    title: String,
    custom_url: Option<String>,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Deserialize, Debug)]
struct Thumbnail {
    url: String,
}

fn build_entry(video: VideoSnippet, channel: ChannelSnippet) -> Entry {
    let author_url = match channel.custom_url.as_deref().filter(|c| !c.is_empty()) {
        Some(custom) => format!("{}{}", SITE_PREFIX, custom),
        None => format!("{}{}", CHANNEL_PREFIX, channel.id),
    };

    let photo = video
        .thumbnails
        .get("maxres")
        .or_else(|| video.thumbnails.get("standard"))
        .map(|t| vec![t.url.clone()]);

    Entry {
        url: format!("{}{}", WATCH_PREFIX, video.id),
        video: vec![Media {
            content_type: "text/html".into(),
            url: format!("{}{}", EMBED_PREFIX, video.id),
        }],
        name: video.title,
        content: video.description,
        published: video.published_at,
        author: Card {
            name: channel.title,
            photo: channel.thumbnails.get("high").map(|t| t.url.clone()),
            url: author_url,
        },
        category: video.tags,
        photo,
    }
}

/// Build an entry from the first video and first channel of the body
fn normalize(body: &str) -> Option<Entry> {
    let agg: AggregateBody = match serde_json::from_str(body) {
        Ok(agg) => agg,
        Err(e) => {
            debug!("Unparseable aggregate body: {}", e);
            return None;
        }
    };
    // Later videos and channels are never decoded
    let video: VideoSnippet = first_as(agg.videos, "video")?;
    let channel: ChannelSnippet = first_as(agg.channels, "channel")?;
    Some(build_entry(video, channel))
}

fn first_as<T: serde::de::DeserializeOwned>(
    items: Vec<serde_json::Value>,
    what: &str,
) -> Option<T> {
    let first = items.into_iter().next()?;
    match serde_json::from_value(first) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("Unusable {} snippet: {}", what, e);
            None
        }
    }
}

/// Normalise a fetch body. Anything that does not contain at least one
/// video and one channel yields `Document::Unknown`.
pub fn parse(body: &str, url: &str) -> Parsed {
    let data = match normalize(body) {
        Some(entry) => {
            debug!("Parsed {} as entry {}", url, entry.url);
            Document::Entry(entry)
        }
        None => {
            warn!("Could not build an entry for {}", url);
            Document::Unknown
        }
    };
    Parsed {
        data,
        original: body.into(),
    }
}
