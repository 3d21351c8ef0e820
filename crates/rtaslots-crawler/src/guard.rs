//! Site access guard.
//!
//! The portal fronts its booking wizard with bot detection that answers
//! some sessions with a block page. The guard navigates to the entry URL,
//! lets the page settle for a jittered delay, and inspects the title for
//! the block marker. A blocked session is discarded and replaced with a
//! freshly provisioned one, up to the retry ceiling. Exhaustion is reported
//! as `success = false` rather than an error so the caller decides whether
//! to abort.

use std::future::Future;

use crate::error::CrawlError;
use crate::identity::settle_delay;
use crate::selectors::ACCESS_DENIED_MARKER;
use crate::session::Session;

/// Attempt to reach `url`, replacing blocked sessions along the way.
///
/// Returns the session that made the final attempt together with a success
/// flag. With `max_retries = N`, at most `N` navigations are made and at
/// most `N - 1` replacement sessions are provisioned.
///
/// # Errors
///
/// Only provisioning a replacement can fail here
/// ([`CrawlError::ProvisionExhausted`]); that failure aborts the run and the
/// previously blocked session has already been closed.
pub async fn try_access<S, P, Fut>(
    mut session: S,
    url: &str,
    max_retries: u32,
    settle_ms: (u64, u64),
    mut provision: P,
) -> Result<(S, bool), CrawlError>
where
    S: Session,
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<S, CrawlError>>,
{
    for attempt in 1..=max_retries {
        match attempt_access(&session, url, settle_ms).await {
            Ok(true) => return Ok((session, true)),
            Ok(false) => {
                tracing::warn!(attempt, max_retries, "portal answered with a block page");
            }
            Err(err) => {
                tracing::warn!(attempt, max_retries, error = %err, "entry navigation failed");
            }
        }

        if attempt == max_retries {
            break;
        }
        if let Err(err) = session.close().await {
            tracing::warn!(error = %err, "failed to close blocked session");
        }
        session = provision().await?;
    }

    Ok((session, false))
}

/// One navigation attempt: true when the landing page is not a block page.
async fn attempt_access<S: Session>(
    session: &S,
    url: &str,
    settle_ms: (u64, u64),
) -> Result<bool, crate::session::SessionError> {
    session.navigate(url).await?;
    settle_delay(settle_ms.0, settle_ms.1).await;
    let title = session.title().await?;
    Ok(!title.contains(ACCESS_DENIED_MARKER))
}
