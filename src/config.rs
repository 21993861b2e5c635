use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org";
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    pub wikipedia_url: String,
    pub enrichment_enabled: bool,
    pub lookup_timeout_secs: u64,
    pub include_video_block: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            wikipedia_url: DEFAULT_WIKIPEDIA_URL.to_string(),
            enrichment_enabled: true,
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
            include_video_block: false,
        }
    }
}

impl ProcessorConfig {
    /// Creates a config from environment variables, loading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates a config from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = get("BIRDBUDDY_WIKIPEDIA_URL") {
            config.wikipedia_url = raw.trim().to_string();
            config.wikipedia_url()?;
        }
        if let Some(raw) = get("BIRDBUDDY_ENRICHMENT_ENABLED") {
            config.enrichment_enabled = parse_flag("BIRDBUDDY_ENRICHMENT_ENABLED", &raw)?;
        }
        if let Some(raw) = get("BIRDBUDDY_LOOKUP_TIMEOUT_SECS") {
            config.lookup_timeout_secs = raw.trim().parse().map_err(|_| {
                anyhow!("BIRDBUDDY_LOOKUP_TIMEOUT_SECS must be a whole number of seconds, got {:?}", raw)
            })?;
        }
        if let Some(raw) = get("BIRDBUDDY_INCLUDE_VIDEO_BLOCK") {
            config.include_video_block = parse_flag("BIRDBUDDY_INCLUDE_VIDEO_BLOCK", &raw)?;
        }

        Ok(config)
    }

    /// Gets the Wikipedia base URL, validated
    pub fn wikipedia_url(&self) -> Result<Url> {
        Url::parse(&self.wikipedia_url)
            .map_err(|e| anyhow!("BIRDBUDDY_WIKIPEDIA_URL is not a valid URL: {}", e))
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("{} must be true or false, got {:?}", name, other)),
    }
}

// to run just these tests do cargo test -- config
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ProcessorConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProcessorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ProcessorConfig::default());
        assert_eq!(config.lookup_timeout(), Duration::from_secs(10));
        assert!(config.enrichment_enabled);
        assert!(!config.include_video_block);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BIRDBUDDY_WIKIPEDIA_URL", "https://de.wikipedia.org"),
            ("BIRDBUDDY_ENRICHMENT_ENABLED", "off"),
            ("BIRDBUDDY_LOOKUP_TIMEOUT_SECS", " 3 "),
            ("BIRDBUDDY_INCLUDE_VIDEO_BLOCK", "TRUE"),
        ])
        .unwrap();

        assert_eq!(config.wikipedia_url().unwrap().as_str(), "https://de.wikipedia.org/");
        assert!(!config.enrichment_enabled);
        assert_eq!(config.lookup_timeout_secs, 3);
        assert!(config.include_video_block);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config_from(&[("BIRDBUDDY_ENRICHMENT_ENABLED", "maybe")]).is_err());
        assert!(config_from(&[("BIRDBUDDY_LOOKUP_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config_from(&[("BIRDBUDDY_WIKIPEDIA_URL", "not a url")]).is_err());
    }
}
