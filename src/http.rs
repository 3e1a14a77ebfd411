use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, trace};

/// Status and body of a completed HTTP request, whatever the status
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub code: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Minimal GET capability the adapter needs. Connections, TLS and timeouts
/// belong to the implementation; an `Err` means no response was received.
pub trait HttpClient {
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse>;
}

/// Blocking client backed by `attohttpc`
#[derive(Debug, Clone)]
pub struct AttoClient {
    timeout: Duration,
}

impl AttoClient {
    pub fn new(timeout: Duration) -> Self {
        AttoClient { timeout }
    }
}

impl Default for AttoClient {
    fn default() -> Self {
        AttoClient::new(Duration::from_secs(30))
    }
}

impl HttpClient for AttoClient {
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse> {
        debug!("Retrieving URL {}", redact_key(url));
        let mut req = attohttpc::get(url)
            .timeout(self.timeout)
            .header(
                attohttpc::header::USER_AGENT,
                concat!("ytentry/", env!("CARGO_PKG_VERSION")),
            );
        for (name, value) in headers {
            let name = attohttpc::header::HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name {:?}", name))?;
            let context = format!("Invalid value for header {}", name);
            req = req.try_header(name, value.as_str()).context(context)?;
        }
        let resp = req
            .send()
            .with_context(|| format!("Request to {} failed", redact_key(url)))?;
        let code = resp.status().as_u16();
        let body = resp.text().context("Failed to read response body")?;
        trace!("Raw response ({}): {}", code, &body);
        Ok(HttpResponse { code, body })
    }
}

/// Hide the value of a `key=` query parameter so API keys stay out of logs
pub(crate) fn redact_key(url: &str) -> String {
    let (base, query) = match url.split_once('?') {
        Some(parts) => parts,
        None => return url.to_string(),
    };
    let query: Vec<String> = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("key=") {
                "key=REDACTED".to_string()
            } else {
                pair.to_string()
            }
        })
        .collect();
    format!("{}?{}", base, query.join("&"))
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_success() -> Result<()> {
        let _m = mockito::mock("GET", "/atto/ok")
            .with_status(200)
            .with_body("{\"items\": []}")
            .create();

        let client = AttoClient::default();
        let resp = client.get(&format!("{}/atto/ok", mockito::server_url()), &[])?;
        assert_eq!(resp.code, 200);
        assert_eq!(resp.body, "{\"items\": []}");
        assert!(resp.is_success());
        Ok(())
    }

    #[test]
    fn test_get_error_status_is_not_err() -> Result<()> {
        let _m = mockito::mock("GET", "/atto/forbidden")
            .with_status(403)
            .with_body("quota exceeded")
            .create();

        let client = AttoClient::default();
        let resp = client.get(&format!("{}/atto/forbidden", mockito::server_url()), &[])?;
        assert_eq!(resp.code, 403);
        assert_eq!(resp.body, "quota exceeded");
        assert!(!resp.is_success());
        Ok(())
    }

    #[test]
    fn test_get_forwards_headers() -> Result<()> {
        let m = mockito::mock("GET", "/atto/referer")
            .match_header("referer", "https://example.com/")
            .with_body("ok")
            .create();

        let client = AttoClient::default();
        let headers = vec![("Referer".to_string(), "https://example.com/".to_string())];
        let resp = client.get(&format!("{}/atto/referer", mockito::server_url()), &headers)?;
        assert_eq!(resp.body, "ok");
        m.assert();
        Ok(())
    }

    #[test]
    fn test_get_bad_header_value_is_err() {
        let client = AttoClient::default();
        let headers = vec![(
            "Referer".to_string(),
            "https://example.com/\nX-Evil: 1".to_string(),
        )];
        let resp = client.get(&format!("{}/atto/bad-header", mockito::server_url()), &headers);
        assert!(resp.is_err());
    }

    #[test]
    fn test_redact_key() {
        assert_eq!(
            redact_key("https://example.com/v3/videos?key=SECRET&part=snippet&id=a"),
            "https://example.com/v3/videos?key=REDACTED&part=snippet&id=a"
        );
        assert_eq!(redact_key("https://example.com/"), "https://example.com/");
    }
}
