//! Classify YouTube URLs without touching the network.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use url::Url;

use crate::common::Resource;

lazy_static! {
    static ref HOST_RE: Regex =
        Regex::new(r"(?i)^((m|www)\.)?youtu(be\.com|\.be)$").expect("Invalid host regex");
}

/// Is the URL on a host this adapter handles (`youtube.com`, `youtu.be`,
/// optionally with `www.` or `m.`)
pub fn matches_host(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => host_matches(&parsed),
        Err(_) => false,
    }
}

fn host_matches(url: &Url) -> bool {
    url.host_str().map(|h| HOST_RE.is_match(h)).unwrap_or(false)
}

/// Last non-empty value of a query parameter
fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .last()
        .filter(|v| !v.is_empty())
}

/// Work out which video or playlist a URL points at
pub fn matches(url: &str) -> Resource {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            debug!("Could not parse URL {:?}: {}", url, e);
            return Resource::Unknown;
        }
    };
    if !host_matches(&parsed) {
        trace!("Host of {:?} is not YouTube", url);
        return Resource::Unknown;
    }

    let host = parsed.host_str().unwrap_or("").to_lowercase();
    let path: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();
    let first = path.first().copied().unwrap_or("");
    let second = path.get(1).copied().unwrap_or("");

    // Playlists: /embed/videoseries?list={ID} and /playlist?list={ID}
    if (first == "embed" && second == "videoseries") || first == "playlist" {
        if let Some(list) = query_value(&parsed, "list") {
            return Resource::Feed(list);
        }
    }

    let mut id = None;

    // Short link: youtu.be/{ID}
    if host == "youtu.be" && !first.is_empty() {
        id = Some(first.to_string());
    }

    // /v/{ID} and /embed/{ID}
    if (first == "v" || first == "embed") && !second.is_empty() {
        id = Some(second.to_string());
    }

    // ?v={ID} wins over anything found in the path
    if let Some(v) = query_value(&parsed, "v") {
        id = Some(v);
    }

    match id {
        Some(id) => Resource::Entry(id),
        None => Resource::Unknown,
    }
}
