//! Best-effort proxy endpoint selection.
//!
//! A proxy is an optional part of the provisioned identity: when a source
//! URL is configured, one endpoint is fetched from it before the browser is
//! built. Every failure on this path (unreachable source, bad status, empty
//! list) degrades to "no proxy" with a warning; absence of a proxy is never
//! a provisioning failure.

use std::time::Duration;

/// Fetch one proxy endpoint from `source_url`, or `None` if the source is
/// unusable. The source is expected to return one `host:port` endpoint per
/// line; the first non-empty line wins.
pub async fn fetch_proxy(source_url: &str, timeout_secs: u64) -> Option<String> {
    match try_fetch(source_url, timeout_secs).await {
        Ok(Some(endpoint)) => {
            tracing::info!(endpoint = %endpoint, "using proxy endpoint");
            Some(endpoint)
        }
        Ok(None) => {
            tracing::warn!(source_url, "proxy source returned no usable endpoint");
            None
        }
        Err(err) => {
            tracing::warn!(source_url, error = %err, "proxy fetch failed; continuing without one");
            None
        }
    }
}

async fn try_fetch(source_url: &str, timeout_secs: u64) -> Result<Option<String>, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    let body = client
        .get(source_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(first_endpoint(&body))
}

/// Picks the first non-empty line and normalizes it to a scheme-qualified
/// endpoint.
fn first_endpoint(body: &str) -> Option<String> {
    let line = body.lines().map(str::trim).find(|l| !l.is_empty())?;
    if line.contains("://") {
        Some(line.to_string())
    } else {
        Some(format!("http://{line}"))
    }
}
