//! Backoff policy shared by the embedding and generation backends.
//!
//! Transient failures retry with exponential backoff: HTTP 429 and 5xx
//! responses and network errors retry with delays of 1s, 2s, 4s, 8s,
//! 16s, 32s (capped); any other 4xx fails immediately.

use anyhow::{bail, Result};
use std::time::Duration;

/// POST a JSON body and return the parsed JSON response, retrying
/// transient failures up to `max_retries` times.
pub async fn post_json_with_backoff(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, String)],
    body: &serde_json::Value,
    max_retries: u32,
) -> Result<serde_json::Value> {
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tokio::time::sleep(delay).await;
        }

        let mut request = client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return Ok(response.json().await?);
                }

                if status.as_u16() == 429 || status.is_server_error() {
                    let body_text = response.text().await.unwrap_or_default();
                    last_err = Some(anyhow::anyhow!("{} returned {}: {}", url, status, body_text));
                    continue;
                }

                let body_text = response.text().await.unwrap_or_default();
                bail!("{} returned {}: {}", url, status, body_text);
            }
            Err(e) => {
                last_err = Some(anyhow::anyhow!("request to {} failed: {}", url, e));
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("request failed after retries")))
}
