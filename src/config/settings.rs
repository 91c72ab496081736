use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://mijn.host/api/v2";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub domain_name: String,
    pub api_key: ApiKey,
    pub record_names: Vec<String>,
    pub default_ttl: u32,
    #[serde(default)]
    pub create_records_if_missing: bool,
    /// Seconds between passes, 0 runs a single pass
    #[serde(default)]
    pub interval: u64,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_ipv4_lookup_urls")]
    pub ipv4_lookup_urls: Vec<String>,
    #[serde(default = "default_ipv6_lookup_urls")]
    pub ipv6_lookup_urls: Vec<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Provider API key. Kept out of `Debug` output so settings can be logged.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_ipv4_lookup_urls() -> Vec<String> {
    vec![
        "https://ipv4.icanhazip.com".to_string(),
        "https://api.ipify.org".to_string(),
    ]
}

fn default_ipv6_lookup_urls() -> Vec<String> {
    vec![
        "https://ipv6.icanhazip.com".to_string(),
        "https://api6.ipify.org".to_string(),
    ]
}

fn default_request_timeout() -> u64 {
    10
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            bail!(
                "Config path {} is a directory, expected a JSON file",
                path.display()
            );
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_json(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut settings: Settings =
            serde_json::from_str(content).context("Failed to parse JSON configuration")?;
        settings.dedup_record_names();
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.domain_name.trim().is_empty() {
            bail!("domain_name must not be empty");
        }
        if self.api_key.expose().trim().is_empty() {
            bail!("api_key must not be empty");
        }
        if self.record_names.is_empty() {
            bail!("record_names must list at least one record");
        }
        if let Some(name) = self.record_names.iter().find(|n| n.trim().is_empty()) {
            bail!("record_names contains an empty name: {:?}", name);
        }
        if self.default_ttl == 0 {
            bail!("default_ttl must be a positive number of seconds");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be positive");
        }
        if self.ipv4_lookup_urls.is_empty() && self.ipv6_lookup_urls.is_empty() {
            bail!("at least one IPv4 or IPv6 lookup URL is required");
        }
        Ok(())
    }

    /// `None` when the updater should run a single pass.
    pub fn interval_duration(&self) -> Option<Duration> {
        (self.interval > 0).then(|| Duration::from_secs(self.interval))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    // Record names behave as a set; first occurrence wins so logs follow config order.
    fn dedup_record_names(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.record_names.retain(|name| seen.insert(name.clone()));
    }
}
