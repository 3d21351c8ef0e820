//! Week-window slot extraction.
//!
//! The week view renders one column per weekday; a day's bookable times are
//! anchor elements inside cells whose class carries the day's three-letter
//! abbreviation. The week's display label is read for traceability only —
//! it is never used as a key.

use rtaslots_core::DaySlots;

use crate::error::CrawlError;
use crate::selectors;
use crate::session::{Locator, Session};

/// One extracted week window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekExtract {
    pub week_label: String,
    pub days: DaySlots,
}

/// Extract the current week window.
///
/// Days with no slots are omitted (sparse mapping). A single slot that
/// cannot be read is logged and skipped; it never aborts the extraction.
/// Re-running on an unchanged window yields an identical result.
///
/// # Errors
///
/// Fails if the week title or the day markers cannot be located.
pub async fn extract_week<S: Session>(session: &S) -> Result<WeekExtract, CrawlError> {
    let week_label = session
        .read_text(&Locator::xpath(selectors::WEEK_TITLE_XPATH))
        .await?
        .trim()
        .to_string();

    let day_reads = session
        .read_texts(&Locator::xpath(selectors::DAY_LABEL_XPATH))
        .await?;

    let mut days = DaySlots::new();
    for read in day_reads {
        let marker = match read {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(week = %week_label, error = %err, "skipping unreadable day marker");
                continue;
            }
        };
        let Some(abbr) = day_abbreviation(&marker) else {
            continue;
        };

        let slot_reads = session
            .read_texts(&Locator::css(selectors::day_slot_css(&abbr)))
            .await?;
        let mut slots = Vec::new();
        for slot in slot_reads {
            match slot {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        slots.push(text.to_string());
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        week = %week_label,
                        day = %marker,
                        error = %err,
                        "skipping unreadable time slot"
                    );
                }
            }
        }

        if !slots.is_empty() {
            days.insert(full_day_name(&abbr), slots);
        }
    }

    Ok(WeekExtract { week_label, days })
}

/// Derives the lowercase three-letter abbreviation from a day marker such
/// as `"Mon 12"`. Markers with fewer than three leading letters carry no
/// weekday and are ignored.
fn day_abbreviation(marker: &str) -> Option<String> {
    let letters: String = marker
        .trim()
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .take(3)
        .collect::<String>()
        .to_ascii_lowercase();
    (letters.len() == 3).then_some(letters)
}

/// Expands a day abbreviation to its full name; unknown abbreviations are
/// capitalized as-is.
fn full_day_name(abbr: &str) -> String {
    match abbr {
        "mon" => "Monday".to_string(),
        "tue" => "Tuesday".to_string(),
        "wed" => "Wednesday".to_string(),
        "thu" => "Thursday".to_string(),
        "fri" => "Friday".to_string(),
        "sat" => "Saturday".to_string(),
        "sun" => "Sunday".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}
