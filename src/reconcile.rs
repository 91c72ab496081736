//! Diffing resolved addresses against remote records, and applying the result.

use std::fmt;
use std::net::IpAddr;

use tracing::{debug, error, info};

use crate::config::Settings;
use crate::dns::{DnsProvider, DnsRecord, RecordType};
use crate::ip::{AddressFamily, ResolvedAddresses};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Remote value already equals the resolved address
    UpToDate,
    /// No remote record and creation is disabled
    SkipMissing,
    Create(DnsRecord),
    Update {
        current: DnsRecord,
        desired: DnsRecord,
    },
}

/// Outcome of comparing one (record name, family) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Record name as configured ("@" for the domain root)
    pub name: String,
    pub family: AddressFamily,
    pub action: Action,
}

impl Decision {
    pub fn is_change(&self) -> bool {
        matches!(self.action, Action::Create(_) | Action::Update { .. })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record_type = RecordType::for_family(self.family);
        match &self.action {
            Action::UpToDate => write!(f, "{} record for '{}' is up to date", record_type, self.name),
            Action::SkipMissing => write!(
                f,
                "{} record for '{}' does not exist and creation is disabled",
                record_type, self.name
            ),
            Action::Create(record) => write!(
                f,
                "Create {} record for '{}' with IP '{}' and TTL {}",
                record_type, self.name, record.value, record.ttl
            ),
            Action::Update { current, desired } => write!(
                f,
                "Update {} record for '{}' from '{}' to '{}'",
                record_type, self.name, current.value, desired.value
            ),
        }
    }
}

/// Fully-qualified form of a configured record name, without trailing dot.
pub fn qualified_name(name: &str, domain: &str) -> String {
    let domain = domain.trim_end_matches('.');
    if name == "@" {
        domain.to_string()
    } else {
        format!("{}.{}", name.trim_end_matches('.'), domain)
    }
}

fn name_matches(remote: &str, configured: &str, domain: &str) -> bool {
    remote == configured || remote.strip_suffix('.').unwrap_or(remote) == qualified_name(configured, domain)
}

fn value_matches(remote: &str, ip: IpAddr) -> bool {
    match remote.trim().parse::<IpAddr>() {
        Ok(remote_ip) => remote_ip == ip,
        Err(_) => remote == ip.to_string(),
    }
}

/// Decide what to do for every configured name and every resolved family.
/// Families missing from `resolved` produce no decisions at all.
pub fn plan(settings: &Settings, resolved: &ResolvedAddresses, remote: &[DnsRecord]) -> Vec<Decision> {
    let domain = settings.domain_name.as_str();
    let mut decisions = Vec::new();

    for name in &settings.record_names {
        debug!("Processing record {}", qualified_name(name, domain));

        for (family, ip) in resolved.iter() {
            let record_type = RecordType::for_family(family);
            let existing = remote
                .iter()
                .find(|r| r.record_type == record_type && name_matches(&r.name, name, domain));

            let action = match existing {
                Some(current) if value_matches(&current.value, ip) => Action::UpToDate,
                Some(current) => Action::Update {
                    current: current.clone(),
                    desired: DnsRecord {
                        value: ip.to_string(),
                        ..current.clone()
                    },
                },
                None if settings.create_records_if_missing => {
                    Action::Create(DnsRecord::new(name, record_type, ip, settings.default_ttl))
                }
                None => Action::SkipMissing,
            };

            let decision = Decision {
                name: name.clone(),
                family,
                action,
            };

            match decision.action {
                Action::UpToDate => debug!("{}", decision),
                Action::SkipMissing => info!("{}, skipping", decision),
                _ => info!("Change detected: {}", decision),
            }

            decisions.push(decision);
        }
    }

    decisions
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub failed: usize,
    /// Changes only logged because of dry-run
    pub planned: usize,
}

/// Push every change in `decisions` to the provider. One failing record is
/// logged and does not stop the others. In dry-run the provider is never called.
pub async fn apply(
    provider: &dyn DnsProvider,
    domain: &str,
    decisions: &[Decision],
    dry_run: bool,
) -> ApplyReport {
    let mut report = ApplyReport::default();
    let changes: Vec<&Decision> = decisions.iter().filter(|d| d.is_change()).collect();

    if changes.is_empty() {
        info!("No changes to push");
        return report;
    }

    if dry_run {
        info!("Dry-run: the following changes would be made:");
        for decision in changes {
            info!("  - {}", decision);
            report.planned += 1;
        }
        return report;
    }

    info!(
        "Pushing {} change(s) to {}",
        changes.len(),
        provider.provider_name()
    );

    for decision in changes {
        let result = match &decision.action {
            Action::Create(record) => provider.create_record(domain, record).await,
            Action::Update { desired, .. } => provider.update_record(domain, desired).await,
            Action::UpToDate | Action::SkipMissing => continue,
        };

        match result {
            Ok(()) => {
                info!("Done: {}", decision);
                report.applied += 1;
            }
            Err(e) => {
                error!("Failed: {}: {}", decision, e);
                report.failed += 1;
            }
        }
    }

    report
}
