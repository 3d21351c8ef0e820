//! Bounded session provisioning.
//!
//! Each attempt builds a completely fresh session (new randomized identity,
//! new browser). Construction errors are retried with an explicit iterative
//! attempt counter up to the configured ceiling; once exceeded the failure
//! is terminal for the whole run and is not retried by any caller.

use std::future::Future;

use rtaslots_core::CrawlConfig;

use crate::driver::DriverSession;
use crate::error::CrawlError;
use crate::proxy;
use crate::session::SessionError;

/// Provision one browser session, retrying construction up to the configured
/// attempt ceiling.
///
/// The proxy endpoint is resolved once per call (best-effort); each
/// construction attempt randomizes the rest of the identity afresh.
///
/// # Errors
///
/// Returns [`CrawlError::ProvisionExhausted`] after the final failed attempt.
pub async fn provision(config: &CrawlConfig) -> Result<DriverSession, CrawlError> {
    let proxy = match config.proxy_source_url.as_deref() {
        Some(source_url) => proxy::fetch_proxy(source_url, config.proxy_fetch_timeout_secs).await,
        None => None,
    };

    provision_with(config.provision_attempts, || {
        DriverSession::connect(config, proxy.as_deref())
    })
    .await
}

/// Retry core: calls `build` until it succeeds or `max_attempts` builds have
/// failed.
pub(crate) async fn provision_with<S, F, Fut>(
    max_attempts: u32,
    mut build: F,
) -> Result<S, CrawlError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, SessionError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match build().await {
            Ok(session) => return Ok(session),
            Err(err) => {
                tracing::warn!(attempt, max_attempts, error = %err, "session construction failed");
                if attempt >= max_attempts {
                    return Err(CrawlError::ProvisionExhausted {
                        attempts: max_attempts,
                    });
                }
            }
        }
    }
}
