//! Element selectors and page markers for the booking portal.

// Login stage
pub const LICENSE_INPUT_ID: &str = "widget_cardNumber";
pub const PASSWORD_INPUT_ID: &str = "widget_password";
pub const LOGIN_NEXT_XPATH: &str = "//span[@id='nextButton_label']";

// Post-login dashboard
pub const BOOK_TEST_XPATH: &str =
    "//a[@class='general-btn' and contains(@href, 'tbsloginredirect')]";

// Test type stage
pub const CAR_RADIO_ID: &str = "CAR";
pub const DRIVING_TEST_RADIO_ID: &str = "c1tt3";
pub const NEXT_BUTTON_ID: &str = "nextButton";

// Eligibility terms stage
pub const TERMS_CHECKBOX_ID: &str = "checkTerms";

// Location stage
pub const LOCATION_MODE_RADIO_ID: &str = "rms_batLocLocSel";
pub const LOCATION_SELECT_ID: &str = "rms_batLocationSelect2";
pub const ANOTHER_LOCATION_LINK_ID: &str = "anotherLocationLink";

/// Placeholder entry of the location dropdown, compared case-insensitively
/// against trimmed option text.
pub const LOCATION_PLACEHOLDER: &str = "choose...";

// Week view
pub const WEEK_TITLE_XPATH: &str = "//span[@class='title']";
pub const DAY_LABEL_XPATH: &str = "//span[@class='d']";
pub const NEXT_WEEK_BUTTON_ID: &str = "nextWeekButton";
pub const NO_TIMESLOT_DIALOG_XPATH: &str = "//div[@role='alertdialog']";

/// Slot anchors for one weekday, keyed by the day's three-letter lowercase
/// abbreviation in the cell's class.
#[must_use]
pub fn day_slot_css(abbr: &str) -> String {
    format!("td.rms_{abbr} a.available")
}

// Page markers
pub const ACCESS_DENIED_MARKER: &str = "Access Denied";
pub const NO_SLOTS_WEEK_MARKER: &str = "There are no timeslots available for this week.";
pub const NO_SLOTS_LOCATION_MARKER: &str = "There are no timeslots available at this location.";
