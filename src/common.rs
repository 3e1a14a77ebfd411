/// What a URL refers to, derived purely from its structure
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Single video, by video ID
    Entry(String),
    /// Playlist, by playlist ID
    Feed(String),
    Unknown,
}

impl Resource {
    pub fn as_str(&self) -> &str {
        match self {
            Resource::Entry(_) => "entry",
            Resource::Feed(_) => "feed",
            Resource::Unknown => "unknown",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Resource::Entry(id) | Resource::Feed(id) => Some(id),
            Resource::Unknown => None,
        }
    }
}

/// Credentials bundle handed to `fetch` by the caller
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_api_referer: Option<String>,
}

impl Credentials {
    pub fn new(key: &str) -> Self {
        Credentials {
            youtube_api_key: Some(key.into()),
            youtube_api_referer: None,
        }
    }

    pub fn with_referer(mut self, referer: &str) -> Self {
        self.youtube_api_referer = Some(referer.into());
        self
    }

    /// API key, treating an empty string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.youtube_api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn referer(&self) -> Option<&str> {
        self.youtube_api_referer.as_deref().filter(|r| !r.is_empty())
    }
}
