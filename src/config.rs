use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::debug;

use crate::common::Credentials;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct Config {
    pub credentials: Credentials,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Config {
    /// Read `credentials.json` from the config directory, then apply
    /// overrides from the environment
    pub fn load() -> Result<Config> {
        let file = match config_dir() {
            Some(dir) => read_optional(&dir.join("credentials.json"))?,
            None => None,
        };
        Config::from_sources(file.as_deref(), |name| std::env::var(name).ok())
    }

    pub fn from_sources<F>(file: Option<&str>, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut credentials: Credentials = match file {
            Some(text) => serde_json::from_str(text).context("Invalid credentials file")?,
            None => Credentials::default(),
        };
        if let Some(key) = env("YOUTUBE_API_KEY") {
            credentials.youtube_api_key = Some(key);
        }
        if let Some(referer) = env("YOUTUBE_API_REFERER") {
            credentials.youtube_api_referer = Some(referer);
        }

        let timeout = match env("YTENTRY_HTTP_TIMEOUT") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .with_context(|| format!("Invalid YTENTRY_HTTP_TIMEOUT {:?}", secs))?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Config {
            credentials,
            timeout,
        })
    }
}

/// `$YTENTRY_CONFIG_DIR`, or the platform config directory
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("YTENTRY_CONFIG_DIR") {
        return Some(dir.into());
    }
    ProjectDirs::from("uk.co", "dbrweb", "ytentry").map(|pd| pd.config_dir().to_path_buf())
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        debug!("No config file at {:?}", path);
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    Ok(Some(text))
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let cfg = Config::from_sources(None, env_from(&[]))?;
        assert_eq!(cfg.credentials, Credentials::default());
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        Ok(())
    }

    #[test]
    fn test_file() -> Result<()> {
        let file = r#"{"youtube_api_key": "FILEKEY", "youtube_api_referer": "https://example.com/"}"#;
        let cfg = Config::from_sources(Some(file), env_from(&[]))?;
        assert_eq!(cfg.credentials.api_key(), Some("FILEKEY"));
        assert_eq!(cfg.credentials.referer(), Some("https://example.com/"));
        Ok(())
    }

    #[test]
    fn test_env_overrides_file() -> Result<()> {
        let file = r#"{"youtube_api_key": "FILEKEY"}"#;
        let cfg = Config::from_sources(
            Some(file),
            env_from(&[("YOUTUBE_API_KEY", "ENVKEY"), ("YTENTRY_HTTP_TIMEOUT", "5")]),
        )?;
        assert_eq!(cfg.credentials.api_key(), Some("ENVKEY"));
        assert_eq!(cfg.credentials.referer(), None);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        Ok(())
    }

    #[test]
    fn test_bad_values() {
        assert!(Config::from_sources(Some("not json"), env_from(&[])).is_err());
        assert!(
            Config::from_sources(None, env_from(&[("YTENTRY_HTTP_TIMEOUT", "soon")])).is_err()
        );
    }
}
