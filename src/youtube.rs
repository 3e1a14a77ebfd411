use std::collections::HashSet;

use log::{debug, info, trace};
use serde_json::{Map, Value};

use crate::common::{Credentials, Resource};
use crate::http::HttpClient;
use crate::source::base::FetchError;

static API_BASE: &str = "https://www.googleapis.com/youtube/v3/";

/// How many members of a playlist are looked up
const PLAYLIST_MAX_RESULTS: usize = 15;

/// A `snippet` object as returned by the API, with the item's `id` merged in
pub type Snippet = Map<String, Value>;

#[derive(Deserialize, Debug, Clone)]
struct YTListResponse {
    #[serde(default)]
    items: Vec<YTItem>,
}

#[derive(Deserialize, Debug, Clone)]
struct YTItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
}

impl YTItem {
    fn into_snippet(self) -> Snippet {
        let mut snippet = self.snippet;
        snippet.insert("id".into(), Value::String(self.id));
        snippet
    }
}

#[derive(Deserialize, Debug, Clone)]
struct YTPlaylistItemListResponse {
    #[serde(default)]
    items: Vec<YTPlaylistItem>,
}

#[derive(Deserialize, Debug, Clone)]
struct YTPlaylistItem {
    snippet: YTPlaylistItemSnippet,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct YTPlaylistItemSnippet {
    resource_id: YTPlaylistItemSnippetResource,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct YTPlaylistItemSnippetResource {
    video_id: Option<String>,
}

fn channel_id(snippet: &Snippet) -> Option<&str> {
    snippet.get("channelId").and_then(Value::as_str)
}

fn not_a_playlist() -> FetchError {
    FetchError::Youtube {
        description: "YouTube API did not return a playlist.".into(),
        code: 400,
    }
}

/// Everything fetched for one resource. Serialises to the fetch body as
/// `{"feed": {..}, "videos": [..], "channels": [..]}`, `feed` only for
/// playlists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub feed: Option<Snippet>,
    pub videos: Vec<Snippet>,
    pub channels: Vec<Snippet>,
}

impl From<Aggregate> for Value {
    fn from(agg: Aggregate) -> Value {
        let mut out = Map::new();
        if let Some(feed) = agg.feed {
            out.insert("feed".into(), Value::Object(feed));
        }
        out.insert(
            "videos".into(),
            Value::Array(agg.videos.into_iter().map(Value::Object).collect()),
        );
        out.insert(
            "channels".into(),
            Value::Array(agg.channels.into_iter().map(Value::Object).collect()),
        );
        Value::Object(out)
    }
}

/// Per-call state for talking to the API: the HTTP client, key and extra
/// headers. Built fresh for every fetch.
pub struct ApiContext<'a> {
    http: &'a dyn HttpClient,
    key: &'a str,
    headers: Vec<(String, String)>,
}

impl<'a> ApiContext<'a> {
    pub fn new(http: &'a dyn HttpClient, creds: &'a Credentials) -> Result<Self, FetchError> {
        let key = creds.api_key().ok_or(FetchError::MissingCredentials)?;
        let headers = match creds.referer() {
            Some(referer) => vec![("Referer".to_string(), referer.to_string())],
            None => vec![],
        };
        Ok(ApiContext { http, key, headers })
    }

    fn request<T: serde::de::DeserializeOwned + std::fmt::Debug>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("key", self.key).append_pair("part", "snippet");
        for (name, value) in params {
            query.append_pair(name, value);
        }
        let url = format!("{}{}?{}", API_BASE, endpoint, query.finish());

        debug!("Querying YouTube API endpoint {} with {:?}", endpoint, params);
        let resp = self
            .http
            .get(&url, &self.headers)
            .map_err(|e| FetchError::Transport(format!("{:#}", e)))?;
        if !resp.is_success() {
            debug!("YouTube API {} returned status {}", endpoint, resp.code);
            return Err(FetchError::Youtube {
                description: resp.body,
                code: resp.code,
            });
        }

        let d: T = serde_json::from_str(&resp.body).map_err(|source| FetchError::Malformed {
            endpoint: endpoint.into(),
            source,
        })?;
        trace!("Raw deserialisation: {:?}", &d);
        Ok(d)
    }

    /// Snippet of a single playlist
    pub fn playlist(&self, id: &str) -> Result<Snippet, FetchError> {
        let d: YTListResponse = self.request("playlists", &[("id", id)])?;
        if d.items.len() != 1 {
            debug!("Expected one playlist for {:?}, got {}", id, d.items.len());
            return Err(not_a_playlist());
        }
        let item = d.items.into_iter().next().ok_or_else(not_a_playlist)?;
        Ok(item.into_snippet())
    }

    /// IDs of the first few videos in a playlist
    pub fn playlist_video_ids(&self, id: &str) -> Result<Vec<String>, FetchError> {
        let max = PLAYLIST_MAX_RESULTS.to_string();
        let d: YTPlaylistItemListResponse = self.request(
            "playlistItems",
            &[("playlistId", id), ("maxResults", max.as_str())],
        )?;
        Ok(d
            .items
            .into_iter()
            .filter_map(|item| item.snippet.resource_id.video_id)
            .collect())
    }

    /// Snippets for a batch of videos, in one request
    pub fn videos(&self, ids: &[String]) -> Result<Vec<Snippet>, FetchError> {
        let joined = ids.join(",");
        let d: YTListResponse = self.request("videos", &[("id", joined.as_str())])?;
        Ok(d.items.into_iter().map(YTItem::into_snippet).collect())
    }

    /// Snippets for a batch of channels, in one request
    pub fn channels(&self, ids: &[String]) -> Result<Vec<Snippet>, FetchError> {
        let joined = ids.join(",");
        let max = ids.len().to_string();
        let d: YTListResponse = self.request(
            "channels",
            &[("id", joined.as_str()), ("maxResults", max.as_str())],
        )?;
        Ok(d.items.into_iter().map(YTItem::into_snippet).collect())
    }
}

/// Remove repeats, keeping the first occurrence of each
fn dedupe(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Look up a resource and everything needed to describe it. Requests are
/// made in the order playlist, playlist items, videos, channels, and the
/// first failure is returned.
pub fn collect(ctx: &ApiContext, resource: &Resource) -> Result<Aggregate, FetchError> {
    let mut agg = Aggregate::default();
    let mut channel_ids: Vec<String> = vec![];

    let video_ids = match resource {
        Resource::Feed(id) => {
            let feed = ctx.playlist(id)?;
            if let Some(c) = channel_id(&feed) {
                channel_ids.push(c.into());
            }
            agg.feed = Some(feed);
            ctx.playlist_video_ids(id)?
        }
        Resource::Entry(id) => vec![id.clone()],
        Resource::Unknown => return Err(FetchError::UnsupportedUrl),
    };

    if !video_ids.is_empty() {
        agg.videos = ctx.videos(&video_ids)?;
        channel_ids.extend(agg.videos.iter().filter_map(channel_id).map(String::from));
    }

    let channel_ids = dedupe(channel_ids);
    if !channel_ids.is_empty() {
        agg.channels = ctx.channels(&channel_ids)?;
    }

    info!(
        "Fetched {} {:?}: {} videos, {} channels",
        resource.as_str(),
        resource.id().unwrap_or(""),
        agg.videos.len(),
        agg.channels.len()
    );
    Ok(agg)
}
