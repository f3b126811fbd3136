use crate::client::OllamaClient;
use crate::config::KeeperConfig;
use anyhow::{Context, Result};
use keeper_core::{
    classify, decide, now_ms, wait_duration, Action, DaemonState, EpochMs, ModelRecord,
};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Backoff after a failed cycle, so an unreachable daemon does not turn the
/// loop into a hot spin.
const RETRY_BACKOFF: Duration = Duration::from_secs(10);

/// Single cooperative task that reconciles the daemon towards "target model
/// resident with indefinite keep-alive" whenever the daemon is free.
pub struct Reconciler {
    config: KeeperConfig,
    client: OllamaClient,
}

impl Reconciler {
    pub fn new(config: KeeperConfig, client: OllamaClient) -> Self {
        Reconciler { config, client }
    }

    /// Drive reconciliation forever. Every failure inside a cycle is logged
    /// and retried after a fixed backoff; the loop ends only when the future
    /// is dropped by an external stop signal.
    pub async fn run(&self) {
        loop {
            match self.cycle().await {
                Ok(()) => sleep(Duration::from_secs(self.config.cycle_interval_seconds)).await,
                Err(e) => {
                    error!(
                        "cycle failed: {e:?}; retrying in {}s",
                        RETRY_BACKOFF.as_secs()
                    );
                    sleep(RETRY_BACKOFF).await;
                }
            }
        }
    }

    /// One probe → decide → act pass. Each cycle starts from a fresh probe;
    /// nothing carries over from the previous one.
    async fn cycle(&self) -> Result<()> {
        let loaded = self.probe().await?;
        match decide(&loaded, &self.config.target_model) {
            Action::LoadTarget => {
                info!(
                    "no models are loaded; loading '{}'",
                    self.config.target_model
                );
                self.load_target().await?;
            }
            Action::Idle => {
                debug!(
                    "'{}' is loaded and alone; nothing to do",
                    self.config.target_model
                );
            }
            Action::Monitor => {
                info!(
                    "other models detected alongside '{}': {:?}; monitoring",
                    self.config.target_model,
                    other_names(&loaded, &self.config.target_model)
                );
                self.monitor_until_target_alone().await?;
            }
            Action::WaitForUnload { until_ms } => self.wait_for_unload(until_ms).await?,
            Action::PollAgain => {
                info!(
                    "only non-expiring models are loaded; checking again in {}s",
                    self.config.monitor_interval_seconds
                );
                self.sleep_monitor_interval().await;
            }
        }
        Ok(())
    }

    /// Poll at the monitor interval until the target is the sole entry again.
    /// If the target disappears, return and let the next outer cycle decide
    /// from a fresh probe.
    async fn monitor_until_target_alone(&self) -> Result<()> {
        loop {
            self.sleep_monitor_interval().await;
            let loaded = self.probe().await?;
            match classify(&loaded, &self.config.target_model) {
                DaemonState::Mixed => {
                    info!(
                        "other models still loaded: {:?}",
                        other_names(&loaded, &self.config.target_model)
                    );
                }
                DaemonState::TargetActive => {
                    info!(
                        "'{}' is the only loaded model again",
                        self.config.target_model
                    );
                    return Ok(());
                }
                DaemonState::OthersActive | DaemonState::Empty => {
                    info!("'{}' is no longer loaded", self.config.target_model);
                    return Ok(());
                }
            }
        }
    }

    /// Suspend until the latest expiry (plus buffer) has passed, then
    /// re-probe once: load the target if the daemon emptied out, otherwise
    /// log what is still resident and fall through to the next cycle.
    async fn wait_for_unload(&self, until_ms: EpochMs) -> Result<()> {
        let wait = wait_duration(until_ms, now_ms());
        info!(
            "other models own the daemon; waiting {}s for the latest expiry",
            wait.as_secs()
        );
        sleep(wait).await;

        let loaded = self.probe().await?;
        if loaded.is_empty() {
            info!(
                "no models are loaded now; loading '{}'",
                self.config.target_model
            );
            self.load_target().await?;
        } else {
            info!("models still loaded: {:?}", names(&loaded));
        }
        Ok(())
    }

    async fn probe(&self) -> Result<Vec<ModelRecord>> {
        let loaded = self
            .client
            .probe()
            .await
            .context("probing loaded models")?;
        debug!("current snapshot: {loaded:?}");
        Ok(loaded)
    }

    async fn load_target(&self) -> Result<()> {
        self.client
            .load(&self.config.target_model)
            .await
            .with_context(|| format!("loading model '{}'", self.config.target_model))?;
        info!(
            "loaded '{}' with indefinite keep-alive",
            self.config.target_model
        );
        Ok(())
    }

    async fn sleep_monitor_interval(&self) {
        sleep(Duration::from_secs(self.config.monitor_interval_seconds)).await;
    }
}

fn names(loaded: &[ModelRecord]) -> Vec<&str> {
    loaded.iter().map(|m| m.name.as_str()).collect()
}

fn other_names<'a>(loaded: &'a [ModelRecord], target: &str) -> Vec<&'a str> {
    loaded
        .iter()
        .filter(|m| m.name != target)
        .map(|m| m.name.as_str())
        .collect()
}
