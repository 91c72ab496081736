use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::provider::{DnsProvider, DnsRecord, RecordType};
use crate::config::{ApiKey, Settings};
use crate::error::ProviderError;
use crate::USER_AGENT;

/// Client for the mijn.host v2 DNS API.
pub struct MijnHostProvider {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

#[derive(Debug, Serialize, Deserialize)]
struct MijnHostRecord {
    #[serde(default, skip_serializing)]
    id: Option<String>,
    #[serde(rename = "type")]
    record_type: RecordType,
    name: String,
    value: String,
    ttl: u32,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: ListData,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    records: Vec<MijnHostRecord>,
}

#[derive(Debug, Serialize)]
struct RecordPayload {
    record: MijnHostRecord,
}

impl From<MijnHostRecord> for DnsRecord {
    fn from(record: MijnHostRecord) -> Self {
        DnsRecord {
            id: record.id,
            name: record.name,
            record_type: record.record_type,
            value: record.value,
            ttl: record.ttl,
        }
    }
}

impl From<&DnsRecord> for MijnHostRecord {
    fn from(record: &DnsRecord) -> Self {
        MijnHostRecord {
            id: None,
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            value: record.value.clone(),
            ttl: record.ttl,
        }
    }
}

impl MijnHostProvider {
    pub fn new(base_url: &str, api_key: ApiKey, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        Self::new(
            &settings.api_base_url,
            settings.api_key.clone(),
            settings.request_timeout(),
        )
    }

    fn dns_url(&self, domain: &str) -> String {
        format!("{}/domains/{}/dns", self.base_url, domain)
    }

    async fn send_record(
        &self,
        request: reqwest::RequestBuilder,
        record: &DnsRecord,
    ) -> Result<(), ProviderError> {
        let payload = RecordPayload {
            record: record.into(),
        };

        let response = request
            .header("API-Key", self.api_key.expose())
            .json(&payload)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Authentication {
            status: status.as_u16(),
            body,
        }),
        _ => Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        }),
    }
}

#[async_trait]
impl DnsProvider for MijnHostProvider {
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>, ProviderError> {
        let response = self
            .client
            .get(self.dns_url(domain))
            .header("API-Key", self.api_key.expose())
            .header("Accept", "application/json")
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        let parsed: ListResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(parsed.data.records.into_iter().map(DnsRecord::from).collect())
    }

    async fn create_record(&self, domain: &str, record: &DnsRecord) -> Result<(), ProviderError> {
        self.send_record(self.client.post(self.dns_url(domain)), record)
            .await
    }

    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<(), ProviderError> {
        self.send_record(self.client.patch(self.dns_url(domain)), record)
            .await
    }

    fn provider_name(&self) -> &'static str {
        "mijn.host"
    }
}
