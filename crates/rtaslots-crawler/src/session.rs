//! The automation-session seam.
//!
//! Every engine component (wizard, enumerator, week loop, extractor) is
//! generic over [`Session`] rather than talking to a webdriver directly, so
//! the whole state machine can be exercised against a scripted in-memory
//! session in tests. The one production implementation is
//! [`crate::driver::DriverSession`].
//!
//! Waits are bounded by the timeout the implementation was configured with;
//! there is no timeout escalation beyond that single per-action bound.

use std::fmt;

use thiserror::Error;

/// How an element is addressed on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(v) => write!(f, "id={v}"),
            Locator::Css(v) => write!(f, "css={v}"),
            Locator::XPath(v) => write!(f, "xpath={v}"),
        }
    }
}

/// One entry of a select control: its visible text and whether it can be
/// chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationOption {
    pub text: String,
    pub enabled: bool,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("timed out waiting for {locator}")]
    Timeout { locator: String },

    #[error("no element matching {locator}")]
    NotFound { locator: String },

    #[error("element under {locator} went stale before it could be read")]
    Stale { locator: String },

    #[error("element {locator} is not a select control")]
    NotASelect { locator: String },

    #[error("webdriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),
}

impl SessionError {
    /// True when the failure means "the element never became available
    /// within the bounded wait" as opposed to a transport or protocol fault.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            SessionError::Timeout { .. } | SessionError::NotFound { .. }
        )
    }
}

/// The page-automation collaborator.
///
/// All methods that locate an element wait (bounded) for it to reach the
/// required condition first: `click` waits for visibility, `type_text` and
/// `read_text` likewise. `read_texts` reads whatever matches right now
/// without waiting, returning a per-element result so one stale element does
/// not poison the batch. `close` releases the underlying browser resource
/// and must be called exactly once per session.
#[allow(async_fn_in_trait)]
pub trait Session {
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Wait until an element matching `locator` is attached to the page.
    async fn wait_present(&self, locator: &Locator) -> Result<(), SessionError>;

    /// Wait until the element is visible, then click it.
    async fn click(&self, locator: &Locator) -> Result<(), SessionError>;

    /// Wait until the element is visible, then send `text` to it.
    async fn type_text(&self, locator: &Locator, text: &str) -> Result<(), SessionError>;

    /// Wait until the select control is visible, then choose the option
    /// whose visible text equals `text` exactly.
    async fn select_by_visible_text(
        &self,
        locator: &Locator,
        text: &str,
    ) -> Result<(), SessionError>;

    /// Wait until the select control is present, then list its options in
    /// source order.
    async fn select_options(&self, locator: &Locator)
        -> Result<Vec<LocationOption>, SessionError>;

    /// Wait until the element is visible, then read its text.
    async fn read_text(&self, locator: &Locator) -> Result<String, SessionError>;

    /// Read the text of every element currently matching `locator`, without
    /// waiting. The outer error covers the lookup; inner errors cover
    /// individual elements that could not be read.
    async fn read_texts(
        &self,
        locator: &Locator,
    ) -> Result<Vec<Result<String, SessionError>>, SessionError>;

    async fn title(&self) -> Result<String, SessionError>;

    async fn current_url(&self) -> Result<String, SessionError>;

    async fn page_source(&self) -> Result<String, SessionError>;

    async fn close(self) -> Result<(), SessionError>;
}
