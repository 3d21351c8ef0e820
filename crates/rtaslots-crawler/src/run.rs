//! Top-level run orchestration.
//!
//! One browser session carries the entire run: provision → access guard →
//! wizard → per-location week crawls. Failure scopes are kept explicit and
//! as narrow as possible — a location's error skips that location only,
//! while losing the location stage stops the outer loop with whatever was
//! already finalized. The session is closed exactly once on every exit
//! path, and page state is captured for diagnostics before a fatal error
//! propagates.

use std::collections::BTreeSet;

use rtaslots_core::{Aggregator, CrawlConfig, CrawlReport, Credentials};

use crate::driver::DriverSession;
use crate::error::CrawlError;
use crate::guard::try_access;
use crate::locations::list_locations;
use crate::provision::provision;
use crate::session::Session;
use crate::week::{crawl_location, CrawlPolicy};
use crate::wizard::Wizard;

/// Crawl every bookable location (optionally restricted to `filter`) and
/// return the aggregated report.
///
/// # Errors
///
/// Fatal conditions only: provisioning exhaustion, access-guard exhaustion,
/// or a wizard-step timeout. Per-location failures are logged and skipped.
pub async fn run_crawl(config: &CrawlConfig, filter: &[String]) -> Result<CrawlReport, CrawlError> {
    let (session, mut wizard) = open_location_stage(config).await?;
    let policy = CrawlPolicy::from_config(config);
    let outcome = crawl_all(&session, &mut wizard, &policy, filter).await;
    finish(session, outcome).await
}

/// Drive the wizard far enough to enumerate the bookable locations, then
/// release the session. Used by dry runs.
///
/// # Errors
///
/// Same fatal conditions as [`run_crawl`].
pub async fn list_available_locations(config: &CrawlConfig) -> Result<Vec<String>, CrawlError> {
    let (session, _wizard) = open_location_stage(config).await?;
    let outcome = list_locations(&session).await;
    finish(session, outcome).await
}

/// Provision a session, get past the access guard, and walk the wizard to
/// the location stage.
async fn open_location_stage(
    config: &CrawlConfig,
) -> Result<(DriverSession, Wizard), CrawlError> {
    let session = provision(config).await?;
    let (session, ok) = try_access(
        session,
        &config.entry_url,
        config.access_retries,
        (config.settle_min_ms, config.settle_max_ms),
        || provision(config),
    )
    .await?;
    if !ok {
        close_session(session).await;
        return Err(CrawlError::AccessBlocked {
            attempts: config.access_retries,
        });
    }

    match advance_wizard(&session, &config.credentials).await {
        Ok(wizard) => Ok((session, wizard)),
        Err(err) => {
            capture_diagnostics(&session).await;
            close_session(session).await;
            Err(err)
        }
    }
}

/// Walk every forward wizard edge, ending on the location stage.
async fn advance_wizard<S: Session>(
    session: &S,
    credentials: &Credentials,
) -> Result<Wizard, CrawlError> {
    let mut wizard = Wizard::new();
    wizard.login(session, credentials).await?;
    wizard.enter_booking(session).await?;
    wizard.select_test_type(session).await?;
    wizard.accept_terms(session).await?;
    wizard.choose_by_location(session).await?;
    Ok(wizard)
}

/// The outer location loop.
///
/// Locations are enumerated afresh on every stage (re-)entry because the
/// option source may be re-rendered; already-visited names are tracked
/// separately. Each finished location is recorded unconditionally — an
/// empty result still means "checked, nothing found".
async fn crawl_all<S: Session>(
    session: &S,
    wizard: &mut Wizard,
    policy: &CrawlPolicy,
    filter: &[String],
) -> Result<CrawlReport, CrawlError> {
    let mut aggregator = Aggregator::new();
    let mut visited: BTreeSet<String> = BTreeSet::new();

    loop {
        let available = list_locations(session).await?;
        if visited.is_empty() {
            tracing::info!(count = available.len(), "enumerated bookable locations");
        }
        let next = available.into_iter().find(|name| {
            !visited.contains(name) && (filter.is_empty() || filter.iter().any(|f| f == name))
        });
        let Some(name) = next else { break };
        visited.insert(name.clone());

        match crawl_location(session, &name, policy).await {
            Ok(slots) => {
                tracing::info!(location = %name, days = slots.len(), "finished location");
                aggregator.record(name.as_str(), slots);
            }
            Err(err) => {
                tracing::error!(location = %name, error = %err, "failed to crawl location; skipping");
            }
        }

        if let Err(err) = wizard.return_to_location_stage(session).await {
            tracing::error!(
                error = %err,
                "cannot return to the location stage; stopping with what was collected"
            );
            break;
        }
    }

    Ok(aggregator.finalize())
}

/// Capture diagnostics if needed, then release the session exactly once.
async fn finish<S: Session, T>(
    session: S,
    outcome: Result<T, CrawlError>,
) -> Result<T, CrawlError> {
    if outcome.is_err() {
        capture_diagnostics(&session).await;
    }
    close_session(session).await;
    outcome
}

/// Best-effort capture of the current page state for post-mortems.
async fn capture_diagnostics<S: Session>(session: &S) {
    let url = session
        .current_url()
        .await
        .unwrap_or_else(|_| "<unavailable>".to_string());
    let title = session
        .title()
        .await
        .unwrap_or_else(|_| "<unavailable>".to_string());
    let snippet = match session.page_source().await {
        Ok(source) => source.chars().take(2048).collect::<String>(),
        Err(_) => "<unavailable>".to_string(),
    };
    tracing::error!(%url, %title, source_snippet = %snippet, "captured page state after failure");
}

async fn close_session<S: Session>(session: S) {
    if let Err(err) = session.close().await {
        tracing::warn!(error = %err, "failed to close the browser session");
    }
}
