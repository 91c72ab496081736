use std::fmt;
use std::net::IpAddr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::ip::AddressFamily;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    AAAA,
    Other(String),
}

impl RecordType {
    pub fn for_family(family: AddressFamily) -> Self {
        match family {
            AddressFamily::V4 => RecordType::A,
            AddressFamily::V6 => RecordType::AAAA,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::Other(other) => other,
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::AAAA,
            _ => RecordType::Other(value),
        }
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record as held by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Provider-assigned identifier, when the provider exposes one.
    pub id: Option<String>,
    pub name: String,
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
}

impl DnsRecord {
    pub fn new(name: &str, record_type: RecordType, ip: IpAddr, ttl: u32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            record_type,
            value: ip.to_string(),
            ttl,
        }
    }
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record of the domain
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>, ProviderError>;

    /// Create a new record
    async fn create_record(&self, domain: &str, record: &DnsRecord) -> Result<(), ProviderError>;

    /// Replace the value and TTL of an existing record
    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<(), ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
