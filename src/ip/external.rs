use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{AddressFamily, AddressResolver};
use crate::config::Settings;
use crate::error::ResolveError;
use crate::USER_AGENT;

/// Looks up the public address through "what is my IP" HTTP services,
/// trying each configured endpoint of a family in order.
pub struct HttpResolver {
    client: Client,
    v4_urls: Vec<String>,
    v6_urls: Vec<String>,
}

impl HttpResolver {
    pub fn new(
        v4_urls: Vec<String>,
        v6_urls: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            v4_urls,
            v6_urls,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        Self::new(
            settings.ipv4_lookup_urls.clone(),
            settings.ipv6_lookup_urls.clone(),
            settings.request_timeout(),
        )
    }

    fn urls(&self, family: AddressFamily) -> &[String] {
        match family {
            AddressFamily::V4 => &self.v4_urls,
            AddressFamily::V6 => &self.v6_urls,
        }
    }
}

#[async_trait]
impl AddressResolver for HttpResolver {
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr, ResolveError> {
        let mut last_error = None;

        for url in self.urls(family) {
            match fetch_ip(&self.client, url, family).await {
                Ok(ip) => return Ok(ip),
                Err(e) => {
                    tracing::debug!("Failed to get {} from {}: {}", family, url, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last) => Err(ResolveError::Exhausted {
                family,
                last: Box::new(last),
            }),
            None => Err(ResolveError::NoEndpoints(family)),
        }
    }
}

async fn fetch_ip(client: &Client, url: &str, family: AddressFamily) -> Result<IpAddr, ResolveError> {
    let http_err = |source: reqwest::Error| ResolveError::Http {
        url: url.to_string(),
        source,
    };

    let body = client
        .get(url)
        .send()
        .await
        .map_err(http_err)?
        .error_for_status()
        .map_err(http_err)?
        .text()
        .await
        .map_err(http_err)?;

    let ip = parse_address(&body).ok_or_else(|| ResolveError::Malformed {
        url: url.to_string(),
        body: body.trim().chars().take(64).collect(),
    })?;

    let found = AddressFamily::of(&ip);
    if found != family {
        return Err(ResolveError::WrongFamily {
            url: url.to_string(),
            expected: family,
            found,
        });
    }

    Ok(ip)
}

/// Accepts a bare address or a JSON object with an `ip` or `address` field.
fn parse_address(body: &str) -> Option<IpAddr> {
    let body = body.trim();

    if body.starts_with('{') {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        let field = value.get("ip").or_else(|| value.get("address"))?;
        return field.as_str()?.trim().parse().ok();
    }

    body.parse().ok()
}
