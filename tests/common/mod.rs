//! In-memory test doubles for the resolver, provider and sleeper seams.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mijnhost_ddns::config::Settings;
use mijnhost_ddns::daemon::Sleeper;
use mijnhost_ddns::dns::{DnsProvider, DnsRecord, RecordType};
use mijnhost_ddns::error::{ProviderError, ResolveError};
use mijnhost_ddns::ip::{AddressFamily, AddressResolver};

pub fn settings(record_names: &[&str], create: bool, interval: u64) -> Settings {
    let json = serde_json::json!({
        "domain_name": "example.com",
        "api_key": "test_key",
        "record_names": record_names,
        "default_ttl": 3600,
        "create_records_if_missing": create,
        "interval": interval,
    });
    Settings::from_json(&json.to_string()).expect("valid test settings")
}

pub fn record(name: &str, record_type: RecordType, value: &str, ttl: u32) -> DnsRecord {
    DnsRecord {
        id: None,
        name: name.to_string(),
        record_type,
        value: value.to_string(),
        ttl,
    }
}

/// Resolver returning fixed addresses; `None` makes that family fail.
#[derive(Clone, Default)]
pub struct FakeResolver {
    addresses: Arc<Mutex<(Option<IpAddr>, Option<IpAddr>)>>,
}

impl FakeResolver {
    pub fn new(v4: Option<&str>, v6: Option<&str>) -> Self {
        let resolver = Self::default();
        resolver.set(v4, v6);
        resolver
    }

    pub fn set(&self, v4: Option<&str>, v6: Option<&str>) {
        let parse = |ip: Option<&str>| ip.map(|ip| ip.parse().expect("valid test IP"));
        *self.addresses.lock().unwrap() = (parse(v4), parse(v6));
    }
}

#[async_trait]
impl AddressResolver for FakeResolver {
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr, ResolveError> {
        let (v4, v6) = *self.addresses.lock().unwrap();
        let found = match family {
            AddressFamily::V4 => v4,
            AddressFamily::V6 => v6,
        };
        found.ok_or(ResolveError::NoEndpoints(family))
    }
}

#[derive(Default)]
struct ProviderState {
    records: Vec<DnsRecord>,
    list_calls: usize,
    creates: Vec<DnsRecord>,
    updates: Vec<DnsRecord>,
    failing_list_calls: usize,
    failing_names: HashSet<String>,
}

/// Provider keeping records in memory and counting every call.
#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl FakeProvider {
    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let provider = Self::default();
        provider.state.lock().unwrap().records = records;
        provider
    }

    /// Make the next `count` list calls fail with an authentication error.
    pub fn fail_next_lists(&self, count: usize) {
        self.state.lock().unwrap().failing_list_calls = count;
    }

    /// Make creates and updates of `name` fail.
    pub fn fail_writes_for(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_names
            .insert(name.to_string());
    }

    pub fn records(&self) -> Vec<DnsRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn creates(&self) -> Vec<DnsRecord> {
        self.state.lock().unwrap().creates.clone()
    }

    pub fn updates(&self) -> Vec<DnsRecord> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn write_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.creates.len() + state.updates.len()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }
}

#[async_trait]
impl DnsProvider for FakeProvider {
    async fn list_records(&self, _domain: &str) -> Result<Vec<DnsRecord>, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.failing_list_calls > 0 {
            state.failing_list_calls -= 1;
            return Err(ProviderError::Authentication {
                status: 401,
                body: "invalid api key".to_string(),
            });
        }
        Ok(state.records.clone())
    }

    async fn create_record(&self, _domain: &str, record: &DnsRecord) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.creates.push(record.clone());
        if state.failing_names.contains(&record.name) {
            return Err(ProviderError::Api {
                status: 500,
                body: "create failed".to_string(),
            });
        }
        state.records.push(record.clone());
        Ok(())
    }

    async fn update_record(&self, _domain: &str, record: &DnsRecord) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.updates.push(record.clone());
        if state.failing_names.contains(&record.name) {
            return Err(ProviderError::Api {
                status: 500,
                body: "update failed".to_string(),
            });
        }
        let existing = state
            .records
            .iter_mut()
            .find(|r| r.record_type == record.record_type && r.name == record.name)
            .ok_or_else(|| ProviderError::Api {
                status: 404,
                body: "no such record".to_string(),
            })?;
        *existing = record.clone();
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Sleeper that returns immediately and remembers what it was asked to wait.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
