use thiserror::Error;

use crate::common::{Credentials, Resource};
use crate::entry::Parsed;
use crate::http::HttpClient;

/// Why a fetch produced no result. Every variant maps onto the
/// `{error, error_description, error_code}` envelope via `envelope()`.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("YouTube credentials must be included in the request")]
    MissingCredentials,

    #[error("This YouTube URL is not supported")]
    UnsupportedUrl,

    /// Non-2xx response, or a response with unexpected contents
    #[error("{description}")]
    Youtube { description: String, code: u16 },

    #[error("Failed to reach YouTube API: {0}")]
    Transport(String),

    #[error("Failed to parse response from {endpoint}")]
    Malformed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::MissingCredentials => "missing_parameters",
            FetchError::UnsupportedUrl => "unsupported_url",
            FetchError::Youtube { .. } | FetchError::Transport(_) | FetchError::Malformed { .. } => {
                "youtube_error"
            }
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            FetchError::MissingCredentials | FetchError::UnsupportedUrl => 400,
            FetchError::Youtube { code, .. } => *code,
            FetchError::Transport(_) | FetchError::Malformed { .. } => 502,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.kind().into(),
            error_description: self.to_string(),
            error_code: self.code(),
        }
    }
}

/// Serialised form of a `FetchError`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorEnvelope {
    pub error: String,
    pub error_description: String,
    pub error_code: u16,
}

/// Successful fetch: the raw aggregate body, ready for `Format::parse`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub url: String,
    pub body: String,
    pub code: u16,
}

/// A site-specific handler in the normalization pipeline
pub trait Format {
    /// Short name, e.g. "youtube"
    fn name(&self) -> &'static str;

    /// Whether this handler should be offered the URL at all
    fn matches_host(&self, url: &str) -> bool;

    fn matches(&self, url: &str) -> Resource;

    /// Query the upstream service and return its aggregated response
    fn fetch(
        &self,
        http: &dyn HttpClient,
        url: &str,
        creds: &Credentials,
    ) -> Result<FetchResponse, FetchError>;

    /// Turn a body returned by `fetch` into a normalized document. Never
    /// fails; unusable input yields the unknown document.
    fn parse(&self, body: &str, url: &str) -> Parsed;
}
