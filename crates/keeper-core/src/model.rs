use crate::time::EpochMs;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Wire format of the daemon's `GET /api/ps` status query.
///
/// Unknown fields (size, digest, details, ...) are ignored; only the name and
/// expiry matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct PsResponse {
    #[serde(default)]
    pub models: Vec<PsModel>,
}

/// One loaded-model entry as the daemon reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct PsModel {
    pub name: String,
    /// RFC 3339 timestamp. Absent, or the Go zero time, for models that
    /// never auto-unload.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// When a loaded model will be unloaded by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Indefinite keep-alive; the daemon never auto-unloads this model.
    /// Distinct from an expiry in the past.
    Never,
    At(EpochMs),
}

/// Normalized snapshot row. Read-only view; discarded after each cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRecord {
    pub name: String,
    pub expires_at: Expiry,
}

impl ModelRecord {
    pub fn is_expiring(&self) -> bool {
        matches!(self.expires_at, Expiry::At(_))
    }
}

impl From<PsModel> for ModelRecord {
    fn from(m: PsModel) -> Self {
        // A missing expiry, or one at/before the epoch (Go's zero time
        // "0001-01-01T00:00:00Z" lands there), means indefinite keep-alive.
        let expires_at = match m.expires_at {
            Some(ts) if ts.timestamp_millis() > 0 => Expiry::At(ts.timestamp_millis()),
            _ => Expiry::Never,
        };
        ModelRecord {
            name: m.name,
            expires_at,
        }
    }
}
