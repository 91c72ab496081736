use anyhow::Context;
use tracing::{debug, info};

use crate::config::Settings;
use crate::dns::{DnsProvider, MijnHostProvider};
use crate::error::PassError;
use crate::ip::{self, AddressResolver, HttpResolver};
use crate::reconcile::{self, Action, ApplyReport};

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub up_to_date: usize,
    pub skipped: usize,
    pub apply: ApplyReport,
}

impl PassReport {
    pub fn has_errors(&self) -> bool {
        self.apply.failed > 0
    }
}

/// Runs reconciliation passes for one domain.
pub struct Updater {
    settings: Settings,
    resolver: Box<dyn AddressResolver>,
    provider: Box<dyn DnsProvider>,
    dry_run: bool,
}

impl Updater {
    pub fn new(
        settings: Settings,
        resolver: Box<dyn AddressResolver>,
        provider: Box<dyn DnsProvider>,
        dry_run: bool,
    ) -> Self {
        Self {
            settings,
            resolver,
            provider,
            dry_run,
        }
    }

    /// Build an updater talking to the real lookup services and mijn.host API.
    pub fn from_settings(settings: Settings, dry_run: bool) -> anyhow::Result<Self> {
        let resolver = HttpResolver::from_settings(&settings)
            .context("Failed to create HTTP client for IP lookups")?;
        let provider = MijnHostProvider::from_settings(&settings)
            .context("Failed to create HTTP client for the mijn.host API")?;

        Ok(Self::new(
            settings,
            Box::new(resolver),
            Box::new(provider),
            dry_run,
        ))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve, fetch, diff and apply once. Remote records are fetched fresh
    /// on every call.
    pub async fn run_pass(&self) -> Result<PassReport, PassError> {
        if self.dry_run {
            info!("Starting update pass in dry-run mode, no changes will be made");
        } else {
            info!("Starting update pass");
        }

        let resolved = ip::resolve_all(self.resolver.as_ref()).await;
        if resolved.v4.is_none() {
            info!("No public IPv4 address found, skipping A records");
        }
        if resolved.v6.is_none() {
            info!("No public IPv6 address found, skipping AAAA records");
        }
        if resolved.is_empty() {
            return Err(PassError::NoAddress);
        }

        let domain = self.settings.domain_name.as_str();
        let records = self
            .provider
            .list_records(domain)
            .await
            .map_err(|source| PassError::Fetch {
                domain: domain.to_string(),
                source,
            })?;
        debug!("Current DNS records for {}: {:#?}", domain, records);

        let decisions = reconcile::plan(&self.settings, &resolved, &records);
        let apply = reconcile::apply(self.provider.as_ref(), domain, &decisions, self.dry_run).await;

        Ok(PassReport {
            up_to_date: decisions
                .iter()
                .filter(|d| d.action == Action::UpToDate)
                .count(),
            skipped: decisions
                .iter()
                .filter(|d| d.action == Action::SkipMissing)
                .count(),
            apply,
        })
    }
}
