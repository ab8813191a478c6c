use std::time::Duration;

use anyhow::Context as _;
use serde::Serialize;

/// The rendered prompt can be large, so the submission gets a generous
/// timeout rather than the per-page one.
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(600);

/// Wire shape the prompt store accepts.
#[derive(Debug, Serialize)]
struct PromptUpdate<'a> {
    text: &'a str,
}

/// Client for the external prompt-update interface: one PATCH carrying
/// `{"text": ...}`, where anything but a 2xx acknowledgement counts as a
/// failed publish.
pub struct PromptClient {
    endpoint: String,
    client: reqwest::Client,
}

impl PromptClient {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PUBLISH_TIMEOUT)
            .build()
            .context("build prompt update http client")?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub async fn update(&self, text: &str) -> anyhow::Result<()> {
        let response = self
            .client
            .patch(&self.endpoint)
            .json(&PromptUpdate { text })
            .send()
            .await
            .with_context(|| format!("PATCH {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = parse_error_detail(&raw).unwrap_or_else(|| raw.trim().to_owned());
            anyhow::bail!("prompt update rejected ({status}): {message}");
        }

        tracing::info!(status = %status, "prompt update acknowledged");
        Ok(())
    }
}

/// FastAPI-style stores report errors as `{"detail": "..."}`.
fn parse_error_detail(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let detail = value.get("detail")?.as_str()?.to_owned();
    Some(detail)
}
