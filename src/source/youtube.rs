use log::{debug, info};

use crate::common::{Credentials, Resource};
use crate::entry::Parsed;
use crate::http::HttpClient;
use crate::source::base::{FetchError, FetchResponse, Format};
use crate::youtube::{collect, ApiContext};

/// Videos and playlists on youtube.com and youtu.be, via the YouTube Data
/// API v3
#[derive(Debug, Clone, Copy, Default)]
pub struct YouTube;

impl Format for YouTube {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn matches_host(&self, url: &str) -> bool {
        crate::resolve::matches_host(url)
    }

    fn matches(&self, url: &str) -> Resource {
        crate::resolve::matches(url)
    }

    fn fetch(
        &self,
        http: &dyn HttpClient,
        url: &str,
        creds: &Credentials,
    ) -> Result<FetchResponse, FetchError> {
        // Credentials are checked before the URL
        let ctx = ApiContext::new(http, creds)?;

        let resource = self.matches(url);
        debug!("Resolved {} to {:?}", url, resource);
        if resource == Resource::Unknown {
            return Err(FetchError::UnsupportedUrl);
        }

        let agg = collect(&ctx, &resource)?;
        info!("Fetched {}", url);
        Ok(FetchResponse {
            url: url.into(),
            body: serde_json::Value::from(agg).to_string(),
            code: 200,
        })
    }

    fn parse(&self, body: &str, url: &str) -> Parsed {
        crate::entry::parse(body, url)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entry::Document;
    use crate::http::fake::FakeHttp;

    fn entry_http() -> FakeHttp {
        FakeHttp::new()
            .route("videos", 200, include_str!("../../testdata/videos_abc123.json"))
            .route("channels", 200, include_str!("../../testdata/channels_chXYZ.json"))
    }

    #[test]
    fn test_fetch_then_parse() -> Result<(), FetchError> {
        let http = entry_http();
        let url = "https://youtu.be/abc123";
        let resp = YouTube.fetch(&http, url, &Credentials::new("K"))?;
        assert_eq!(resp.url, url);
        assert_eq!(resp.code, 200);

        let parsed = YouTube.parse(&resp.body, url);
        assert_eq!(parsed.original, resp.body);
        match parsed.data {
            Document::Entry(e) => {
                assert_eq!(e.url, "https://www.youtube.com/watch?v=abc123");
                assert_eq!(e.author.url, "https://www.youtube.com/channel/chXYZ");
                assert_eq!(e.published, "2020-03-01T12:00:00Z");
                assert_eq!(
                    e.photo,
                    Some(vec![
                        "https://i.ytimg.com/vi/abc123/maxresdefault.jpg".to_string()
                    ])
                );
                assert_eq!(
                    e.category,
                    Some(vec!["testing".to_string(), "rust".to_string()])
                );
            }
            Document::Unknown => panic!("expected an entry"),
        }
        Ok(())
    }

    #[test]
    fn test_body_has_no_feed_for_videos() -> anyhow::Result<()> {
        let http = entry_http();
        let resp = YouTube.fetch(
            &http,
            "https://www.youtube.com/watch?v=abc123",
            &Credentials::new("K"),
        )?;
        let body: serde_json::Value = serde_json::from_str(&resp.body)?;
        assert!(body.get("feed").is_none());
        assert_eq!(body["videos"][0]["id"], "abc123");
        assert_eq!(body["channels"][0]["id"], "chXYZ");
        Ok(())
    }

    #[test]
    fn test_unsupported_url() {
        let http = entry_http();
        for url in &[
            "https://www.youtube.com/channel/UCxyz",
            "https://vimeo.com/1234",
            "not a url",
        ] {
            let err = YouTube
                .fetch(&http, url, &Credentials::new("K"))
                .unwrap_err();
            assert_eq!(err.kind(), "unsupported_url");
            assert_eq!(err.code(), 400);
        }
        assert!(http.requests.borrow().is_empty());
    }

    #[test]
    fn test_missing_key_checked_first() {
        let http = entry_http();
        let err = YouTube
            .fetch(&http, "https://vimeo.com/1234", &Credentials::default())
            .unwrap_err();
        assert_eq!(err.kind(), "missing_parameters");
        assert_eq!(err.code(), 400);
        assert!(http.requests.borrow().is_empty());
    }

    #[test]
    fn test_format_surface() {
        assert_eq!(YouTube.name(), "youtube");
        assert!(YouTube.matches_host("https://m.youtube.com/watch?v=abc"));
        assert_eq!(
            YouTube.matches("https://youtu.be/abc"),
            Resource::Entry("abc".into())
        );
    }
}
