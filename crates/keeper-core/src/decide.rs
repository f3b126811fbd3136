use crate::model::{Expiry, ModelRecord};
use crate::time::EpochMs;
use std::time::Duration;

/// Safety margin added to the latest expiry so we never race the daemon's
/// own unload bookkeeping.
pub const EXPIRY_BUFFER_MS: EpochMs = 5_000;

/// What one status snapshot looks like relative to the target model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonState {
    /// Nothing is loaded.
    Empty,
    /// The target model is loaded and nothing else is.
    TargetActive,
    /// Only non-target models are loaded.
    OthersActive,
    /// The target model and at least one other model are loaded.
    Mixed,
}

pub fn classify(loaded: &[ModelRecord], target: &str) -> DaemonState {
    let target_loaded = loaded.iter().any(|m| m.name == target);
    let others_loaded = loaded.iter().any(|m| m.name != target);
    match (target_loaded, others_loaded) {
        (false, false) => DaemonState::Empty,
        (true, false) => DaemonState::TargetActive,
        (false, true) => DaemonState::OthersActive,
        (true, true) => DaemonState::Mixed,
    }
}

/// What the reconciler should do with the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Daemon is free: issue one load request for the target.
    LoadTarget,
    /// Target is resident and alone; nothing to do this cycle.
    Idle,
    /// Target shares the daemon with others; poll until it is alone again.
    Monitor,
    /// Other models own the daemon but at least one expires: suspend until
    /// `until_ms`, then re-probe once.
    WaitForUnload { until_ms: EpochMs },
    /// Other models own the daemon and none of them expire. Sleep one
    /// monitor interval and re-evaluate; this can recur indefinitely.
    PollAgain,
}

/// Decide the next action from one snapshot.
///
/// Pure function of the snapshot: an unchanged snapshot always yields the
/// same decision. The wait target is the maximum over all expiring
/// non-target entries plus [`EXPIRY_BUFFER_MS`]; an expiry already in the
/// past simply clamps the wait to zero and forces an immediate re-probe.
pub fn decide(loaded: &[ModelRecord], target: &str) -> Action {
    match classify(loaded, target) {
        DaemonState::Empty => Action::LoadTarget,
        DaemonState::TargetActive => Action::Idle,
        DaemonState::Mixed => Action::Monitor,
        DaemonState::OthersActive => {
            let latest = loaded
                .iter()
                .filter(|m| m.name != target)
                .filter_map(|m| match m.expires_at {
                    Expiry::At(ts) => Some(ts),
                    Expiry::Never => None,
                })
                .max();
            match latest {
                Some(ts) => Action::WaitForUnload {
                    until_ms: ts + EXPIRY_BUFFER_MS,
                },
                None => Action::PollAgain,
            }
        }
    }
}

/// Cooperative sleep length until `until_ms`, clamped at zero.
///
/// Computed once from the wall-clock delta; the caller sleeps on the
/// monotonic clock rather than re-deriving the deadline at wake.
pub fn wait_duration(until_ms: EpochMs, now_ms: EpochMs) -> Duration {
    Duration::from_millis((until_ms - now_ms).max(0) as u64)
}
