//! HTTP client for a remote `/wave-ai` endpoint.
//!
//! Used by `wave ai --remote` to talk to a deployed responder instead of
//! answering in-process. The endpoint URL and key come from the `[client]`
//! config section (`WAVE_AI_URL` / `WAVE_AI_KEY`).

use std::time::Duration;

use anyhow::{Context, Result};

use super::{AiRequest, AiResponse};
use crate::config::schema::ClientConfig;

/// Synchronous client for the copy endpoint.
#[derive(Debug)]
pub struct EdgeClient {
    url: String,
    api_key: String,
    timeout: Duration,
}

impl EdgeClient {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            // "localhost" may resolve to ::1 first while the server binds IPv4 only
            url: config.edge_url.replace("://localhost", "://127.0.0.1"),
            api_key: config.api_key.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the request and return the generated text.
    ///
    /// A `500 { success: false, error }` reply is surfaced as an error
    /// carrying the server's message.
    pub fn generate(&self, request: &AiRequest) -> Result<String> {
        let mut call = ureq::post(&self.url).timeout(self.timeout);
        if !self.api_key.is_empty() {
            call = call
                .set("Authorization", &format!("Bearer {}", self.api_key))
                .set("Apikey", &self.api_key);
        }

        let resp = match call.send_json(request) {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                let detail = resp
                    .into_json::<AiResponse>()
                    .ok()
                    .and_then(|r| r.error)
                    .unwrap_or_else(|| "no error message".to_string());
                anyhow::bail!("copy endpoint returned HTTP {code}: {detail}");
            }
            Err(e) => return Err(e).context("copy endpoint request failed"),
        };

        let parsed: AiResponse = resp
            .into_json()
            .context("failed to parse copy endpoint response")?;

        match parsed {
            AiResponse {
                success: true,
                response: Some(text),
                ..
            } => Ok(text),
            AiResponse { error, .. } => {
                anyhow::bail!(
                    "copy endpoint reported failure: {}",
                    error.unwrap_or_else(|| "no error message".to_string())
                )
            }
        }
    }
}
