//! The per-location week crawl loop.
//!
//! For one selected location the loop alternates extraction and pagination:
//! extract the current week, merge it into the location's accumulated
//! result, consult the no-timeslot modal, then either stop or advance to
//! the next week. Two terminations exist and are mutually exclusive by
//! construction — the stop-threshold check runs before any advance attempt:
//!
//! * **graceful-empty** — the portal signalled "no timeslots" for the
//!   configured number of consecutive weeks;
//! * **exhausted-pagination** — the next-week control is absent or never
//!   becomes interactable.
//!
//! Both sub-cases of the modal ("no slots this week", "no slots at this
//! location") count identically; a week without the signal resets the
//! counter. The signal is an expected condition, never an error.

use rtaslots_core::{CrawlConfig, DaySlots, MergePolicy};

use crate::error::CrawlError;
use crate::extract::extract_week;
use crate::identity::settle_delay;
use crate::selectors;
use crate::session::{Locator, Session};

/// Knobs governing one location's crawl loop.
#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    /// Consecutive no-timeslot weeks after which the location is considered
    /// exhausted.
    pub stop_threshold: u32,
    /// How a recurring weekday label is folded across week windows.
    pub merge: MergePolicy,
    pub settle_min_ms: u64,
    pub settle_max_ms: u64,
}

impl CrawlPolicy {
    #[must_use]
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            stop_threshold: config.stop_threshold,
            merge: config.week_merge,
            settle_min_ms: config.settle_min_ms,
            settle_max_ms: config.settle_max_ms,
        }
    }
}

enum WeekAdvance {
    Advanced,
    Exhausted,
}

/// Crawl every reachable week for `location` and return its accumulated
/// day→slots result. The result may be empty — that still means the
/// location was checked.
///
/// # Errors
///
/// Any error here is per-location: the caller logs it, skips the location,
/// and continues with the next one.
pub async fn crawl_location<S: Session>(
    session: &S,
    location: &str,
    policy: &CrawlPolicy,
) -> Result<DaySlots, CrawlError> {
    select_location(session, location).await?;

    let mut result = DaySlots::new();
    let mut empty_weeks: u32 = 0;

    loop {
        let extract = extract_week(session).await?;
        tracing::info!(
            location,
            week = %extract.week_label,
            days = extract.days.len(),
            "extracted week"
        );
        policy.merge.merge(&mut result, extract.days);

        if no_timeslot_signal(session).await? {
            empty_weeks += 1;
            tracing::info!(location, empty_weeks, "portal signalled no timeslots");
            if empty_weeks >= policy.stop_threshold {
                tracing::info!(location, "stopping: consecutive empty weeks reached the threshold");
                break;
            }
        } else {
            empty_weeks = 0;
        }

        match advance_week(session).await? {
            WeekAdvance::Advanced => {
                settle_delay(policy.settle_min_ms, policy.settle_max_ms).await;
            }
            WeekAdvance::Exhausted => {
                tracing::info!(location, "stopping: no further weeks are reachable");
                break;
            }
        }
    }

    Ok(result)
}

/// Pick the location in the dropdown by exact visible name and open its
/// week view.
async fn select_location<S: Session>(session: &S, location: &str) -> Result<(), CrawlError> {
    session
        .select_by_visible_text(&Locator::id(selectors::LOCATION_SELECT_ID), location)
        .await
        .map_err(|source| CrawlError::LocationSelect {
            location: location.to_string(),
            source,
        })?;
    session
        .click(&Locator::id(selectors::NEXT_BUTTON_ID))
        .await?;
    session
        .wait_present(&Locator::xpath(selectors::WEEK_TITLE_XPATH))
        .await?;
    Ok(())
}

/// True when the no-timeslot modal is present with either of its messages.
async fn no_timeslot_signal<S: Session>(session: &S) -> Result<bool, CrawlError> {
    let texts = session
        .read_texts(&Locator::xpath(selectors::NO_TIMESLOT_DIALOG_XPATH))
        .await?;
    for text in texts.into_iter().flatten() {
        if text.contains(selectors::NO_SLOTS_WEEK_MARKER)
            || text.contains(selectors::NO_SLOTS_LOCATION_MARKER)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Click through to the next week, or report pagination exhausted when the
/// control is absent or never interactable within the bounded wait.
async fn advance_week<S: Session>(session: &S) -> Result<WeekAdvance, CrawlError> {
    match session
        .click(&Locator::id(selectors::NEXT_WEEK_BUTTON_ID))
        .await
    {
        Ok(()) => {}
        Err(err) if err.is_unavailable() => return Ok(WeekAdvance::Exhausted),
        Err(err) => return Err(err.into()),
    }
    session
        .wait_present(&Locator::xpath(selectors::WEEK_TITLE_XPATH))
        .await?;
    Ok(WeekAdvance::Advanced)
}

#[cfg(test)]
#[path = "week_test.rs"]
mod tests;
