//! HTTP client for the remote classification service.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use triage_core::input::SubmitPayload;
use triage_core::response::Outcome;

use crate::protocol::ClassifyResponse;

/// Path of the single classification endpoint, fixed by the service contract.
const CLASSIFY_PATH: &str = "/classify_file";

/// Client for the classification API.
///
/// One call per submission: no retry, no cancellation. Every possible result
/// of a call is folded into an [`Outcome`], so the caller always receives
/// exactly one terminal value.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Submit one payload for classification.
    ///
    /// The payload travels as a multipart form with a single field named
    /// `file`: the raw file bytes under the original filename in upload
    /// mode, or the pasted text as a plain-text attachment.
    #[instrument(skip(self, payload), fields(file = %payload.file_name, bytes = payload.bytes.len()))]
    pub async fn classify(&self, payload: SubmitPayload) -> Outcome {
        let part = match Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.mime_type)
        {
            Ok(part) => part,
            Err(e) => {
                warn!("Failed to build multipart payload: {}", e);
                return Outcome::TransportError {
                    detail: e.to_string(),
                };
            }
        };
        let form = Form::new().part("file", part);

        let url = format!("{}{}", self.base_url, CLASSIFY_PATH);
        let resp = match self.client.post(&url).multipart(form).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Request failed: {}", e);
                return Outcome::TransportError {
                    detail: e.to_string(),
                };
            }
        };

        let status = resp.status();
        if status.is_success() {
            match resp.json::<ClassifyResponse>().await {
                Ok(body) => {
                    debug!("Classification received");
                    body.into()
                }
                Err(e) => {
                    warn!("Malformed success body: {}", e);
                    Outcome::TransportError {
                        detail: e.to_string(),
                    }
                }
            }
        } else {
            // Non-success bodies are raw text, consumed verbatim; display
            // truncation happens in the reducer.
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "Server rejected submission");
            Outcome::ServerError {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_configured_timeout() {
        let client = ApiClient::new("http://127.0.0.1:9".to_string(), 1);
        assert!(client.is_ok());
    }
}
