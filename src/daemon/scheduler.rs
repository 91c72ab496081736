use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info};

use super::updater::Updater;

/// Waits between passes. Swapped out in tests so several passes run without
/// real delay.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passes: usize,
    pub failed_passes: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed_passes == 0
    }
}

pub struct Scheduler {
    updater: Updater,
    sleeper: Box<dyn Sleeper>,
}

impl Scheduler {
    pub fn new(updater: Updater, sleeper: Box<dyn Sleeper>) -> Self {
        Self { updater, sleeper }
    }

    /// Run a single pass when the interval is 0, otherwise loop forever.
    pub async fn run(&self) -> RunSummary {
        let settings = self.updater.settings();
        match settings.interval_duration() {
            Some(interval) => {
                info!(
                    "Updater started. Monitoring {} record name(s) of {} every {} seconds",
                    settings.record_names.len(),
                    settings.domain_name,
                    interval.as_secs()
                );
                self.run_passes(None).await
            }
            None => {
                let summary = self.run_passes(Some(1)).await;
                info!("Interval is 0, exiting after a single pass");
                summary
            }
        }
    }

    /// Run passes until `limit` is reached, sleeping the configured interval
    /// between them. A failed pass is logged and the loop carries on.
    pub async fn run_passes(&self, limit: Option<usize>) -> RunSummary {
        let interval = self
            .updater
            .settings()
            .interval_duration()
            .unwrap_or(Duration::ZERO);
        let mut summary = RunSummary::default();

        loop {
            summary.passes += 1;
            if !self.pass().await {
                summary.failed_passes += 1;
            }

            if limit.is_some_and(|limit| summary.passes >= limit) {
                return summary;
            }

            info!("Waiting {} seconds before next run", interval.as_secs());
            self.sleeper.sleep(interval).await;
        }
    }

    async fn pass(&self) -> bool {
        match self.updater.run_pass().await {
            Ok(report) if report.has_errors() => {
                error!(
                    "Update pass finished with {} failed change(s), {} applied",
                    report.apply.failed, report.apply.applied
                );
                false
            }
            Ok(report) => {
                info!(
                    "Update pass finished: {} applied, {} planned, {} up to date, {} skipped",
                    report.apply.applied, report.apply.planned, report.up_to_date, report.skipped
                );
                true
            }
            Err(e) => {
                error!("Update pass failed: {}", e);
                false
            }
        }
    }
}

pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
