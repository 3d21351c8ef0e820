//! Location enumeration.
//!
//! The dropdown's option source may be re-rendered every time the location
//! stage is entered, so callers must enumerate again on every (re-)entry
//! rather than cache the first read.

use crate::error::CrawlError;
use crate::selectors;
use crate::session::{LocationOption, Locator, Session};

/// Read the currently selectable locations, in source order.
///
/// # Errors
///
/// Fails if the dropdown cannot be found or read.
pub async fn list_locations<S: Session>(session: &S) -> Result<Vec<String>, CrawlError> {
    let options = session
        .select_options(&Locator::id(selectors::LOCATION_SELECT_ID))
        .await?;
    Ok(filter_options(options))
}

/// Drops the placeholder sentinel and disabled entries, trims the rest.
/// Order is preserved and duplicates pass through: two options with the
/// same name are two list entries.
fn filter_options(options: Vec<LocationOption>) -> Vec<String> {
    options
        .into_iter()
        .filter(|option| option.enabled)
        .map(|option| option.text.trim().to_string())
        .filter(|name| {
            !name.is_empty() && !name.eq_ignore_ascii_case(selectors::LOCATION_PLACEHOLDER)
        })
        .collect()
}
