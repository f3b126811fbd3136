use keeper_core::{ModelRecord, PsResponse};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Keep-alive sentinel the daemon treats as "never auto-unload".
const INDEFINITE_KEEP_ALIVE: i64 = -1;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to model daemon failed: {0}")]
    Communication(#[from] reqwest::Error),
    #[error("model daemon returned a malformed status payload: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

/// Load request against `POST /api/generate`. No prompt: the daemon loads
/// the model (or refreshes its keep-alive) and returns without generating.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    stream: bool,
    keep_alive: i64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    done: bool,
}

/// Thin client for the daemon's status/load API.
pub struct OllamaClient {
    http: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Self {
        OllamaClient {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Snapshot of currently loaded models. Read-only; no local retry.
    pub async fn probe(&self) -> Result<Vec<ModelRecord>, ClientError> {
        let body = self
            .http
            .get(format!("{}/api/ps", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!("ps response: {body}");

        let resp: PsResponse = serde_json::from_str(&body)?;
        Ok(resp.models.into_iter().map(ModelRecord::from).collect())
    }

    /// Load `model` with an indefinite keep-alive. Idempotent from the
    /// caller's perspective: the daemon de-duplicates an already-loaded model
    /// and just refreshes its keep-alive.
    pub async fn load(&self, model: &str) -> Result<(), ClientError> {
        let req = GenerateRequest {
            model,
            stream: false,
            keep_alive: INDEFINITE_KEEP_ALIVE,
        };
        let resp = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;
        debug!("generate response for {model}: done={}", resp.done);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_carries_the_indefinite_sentinel() {
        let req = GenerateRequest {
            model: "llama3:8b",
            stream: false,
            keep_alive: INDEFINITE_KEEP_ALIVE,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(
            json,
            r#"{"model":"llama3:8b","stream":false,"keep_alive":-1}"#
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OllamaClient::new("http://127.0.0.1:11434/");
        assert_eq!(client.base_url, "http://127.0.0.1:11434");
    }
}
