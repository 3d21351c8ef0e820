//! The pre-booking wizard state machine.
//!
//! The portal forces a fixed sequence of steps before slot data becomes
//! visible: credentials, booking entry, test type, eligibility terms, then
//! the location stage. Transitions are strictly forward and caller-driven;
//! the only backward edge is [`Wizard::return_to_location_stage`], used
//! after a location's crawl finishes. A bounded wait timing out on any step
//! is fatal for the whole run — the wizard's shape is assumed stable, so
//! retries live in the provisioning and access-guard layers, not here.

use rtaslots_core::Credentials;

use crate::error::CrawlError;
use crate::selectors;
use crate::session::{Locator, Session, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Unauthenticated,
    Authenticated,
    BookingEntry,
    TestTypeSelected,
    TermsAccepted,
    LocationStage,
}

#[derive(Debug)]
pub struct Wizard {
    state: WizardState,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: WizardState::Unauthenticated,
        }
    }

    #[must_use]
    pub fn state(&self) -> WizardState {
        self.state
    }

    fn expect(&self, step: &'static str, expected: WizardState) -> Result<(), CrawlError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(CrawlError::WizardOutOfOrder {
                step,
                state: self.state,
            })
        }
    }

    /// Submit credentials on the login page and advance to `Authenticated`.
    ///
    /// # Errors
    ///
    /// [`CrawlError::WizardTimeout`] if any control never becomes
    /// interactable; [`CrawlError::WizardOutOfOrder`] if called out of
    /// sequence.
    pub async fn login<S: Session>(
        &mut self,
        session: &S,
        credentials: &Credentials,
    ) -> Result<(), CrawlError> {
        const STEP: &str = "login";
        self.expect(STEP, WizardState::Unauthenticated)?;
        session
            .type_text(
                &Locator::id(selectors::LICENSE_INPUT_ID),
                &credentials.license_number,
            )
            .await
            .map_err(fatal(STEP))?;
        session
            .type_text(
                &Locator::id(selectors::PASSWORD_INPUT_ID),
                &credentials.password,
            )
            .await
            .map_err(fatal(STEP))?;
        session
            .click(&Locator::xpath(selectors::LOGIN_NEXT_XPATH))
            .await
            .map_err(fatal(STEP))?;
        self.state = WizardState::Authenticated;
        Ok(())
    }

    /// Follow the book-test entry link from the dashboard.
    pub async fn enter_booking<S: Session>(&mut self, session: &S) -> Result<(), CrawlError> {
        const STEP: &str = "enter_booking";
        self.expect(STEP, WizardState::Authenticated)?;
        session
            .click(&Locator::xpath(selectors::BOOK_TEST_XPATH))
            .await
            .map_err(fatal(STEP))?;
        self.state = WizardState::BookingEntry;
        Ok(())
    }

    /// Pick the car driving test and move past the test-type page.
    pub async fn select_test_type<S: Session>(&mut self, session: &S) -> Result<(), CrawlError> {
        const STEP: &str = "select_test_type";
        self.expect(STEP, WizardState::BookingEntry)?;
        session
            .click(&Locator::id(selectors::CAR_RADIO_ID))
            .await
            .map_err(fatal(STEP))?;
        session
            .click(&Locator::id(selectors::DRIVING_TEST_RADIO_ID))
            .await
            .map_err(fatal(STEP))?;
        session
            .click(&Locator::id(selectors::NEXT_BUTTON_ID))
            .await
            .map_err(fatal(STEP))?;
        self.state = WizardState::TestTypeSelected;
        Ok(())
    }

    /// Accept the eligibility terms and move past them.
    pub async fn accept_terms<S: Session>(&mut self, session: &S) -> Result<(), CrawlError> {
        const STEP: &str = "accept_terms";
        self.expect(STEP, WizardState::TestTypeSelected)?;
        session
            .click(&Locator::id(selectors::TERMS_CHECKBOX_ID))
            .await
            .map_err(fatal(STEP))?;
        session
            .click(&Locator::id(selectors::NEXT_BUTTON_ID))
            .await
            .map_err(fatal(STEP))?;
        self.state = WizardState::TermsAccepted;
        Ok(())
    }

    /// Switch to browse-by-location mode and wait for the dropdown to load.
    pub async fn choose_by_location<S: Session>(&mut self, session: &S) -> Result<(), CrawlError> {
        const STEP: &str = "choose_by_location";
        self.expect(STEP, WizardState::TermsAccepted)?;
        session
            .click(&Locator::id(selectors::LOCATION_MODE_RADIO_ID))
            .await
            .map_err(fatal(STEP))?;
        session
            .wait_present(&Locator::id(selectors::LOCATION_SELECT_ID))
            .await
            .map_err(fatal(STEP))?;
        self.state = WizardState::LocationStage;
        Ok(())
    }

    /// The one backward edge: leave a finished location's week view and
    /// land back on the location dropdown.
    ///
    /// # Errors
    ///
    /// [`CrawlError::LocationStageLost`] — the run cannot enumerate further
    /// locations without this edge, so the caller must stop the outer loop.
    pub async fn return_to_location_stage<S: Session>(
        &mut self,
        session: &S,
    ) -> Result<(), CrawlError> {
        const STEP: &str = "return_to_location_stage";
        self.expect(STEP, WizardState::LocationStage)?;
        session
            .click(&Locator::id(selectors::ANOTHER_LOCATION_LINK_ID))
            .await
            .map_err(CrawlError::LocationStageLost)?;
        session
            .wait_present(&Locator::id(selectors::LOCATION_SELECT_ID))
            .await
            .map_err(CrawlError::LocationStageLost)?;
        Ok(())
    }
}

fn fatal(step: &'static str) -> impl Fn(SessionError) -> CrawlError {
    move |source| CrawlError::WizardTimeout { step, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeSession;

    fn credentials() -> Credentials {
        Credentials {
            license_number: "12345678".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn walks_every_forward_edge_in_order() {
        let session = FakeSession::builder().build();
        let mut wizard = Wizard::new();

        wizard.login(&session, &credentials()).await.unwrap();
        assert_eq!(wizard.state(), WizardState::Authenticated);
        wizard.enter_booking(&session).await.unwrap();
        wizard.select_test_type(&session).await.unwrap();
        wizard.accept_terms(&session).await.unwrap();
        wizard.choose_by_location(&session).await.unwrap();
        assert_eq!(wizard.state(), WizardState::LocationStage);

        let typed = session.typed();
        assert_eq!(typed[0].1, "12345678");
        assert_eq!(typed[1].1, "hunter2");
        let clicks = session.clicks();
        assert!(clicks.contains(&format!("id={}", selectors::TERMS_CHECKBOX_ID)));
        assert!(clicks.contains(&format!("id={}", selectors::LOCATION_MODE_RADIO_ID)));
    }

    #[tokio::test]
    async fn steps_cannot_be_skipped() {
        let session = FakeSession::builder().build();
        let mut wizard = Wizard::new();
        let result = wizard.accept_terms(&session).await;
        assert!(matches!(
            result,
            Err(CrawlError::WizardOutOfOrder {
                step: "accept_terms",
                state: WizardState::Unauthenticated,
            })
        ));
        // Nothing was clicked on the rejected step.
        assert!(session.clicks().is_empty());
    }

    #[tokio::test]
    async fn terms_checkbox_timeout_is_fatal() {
        let session = FakeSession::builder()
            .fail_click(&Locator::id(selectors::TERMS_CHECKBOX_ID))
            .build();
        let mut wizard = Wizard::new();
        wizard.login(&session, &credentials()).await.unwrap();
        wizard.enter_booking(&session).await.unwrap();
        wizard.select_test_type(&session).await.unwrap();

        let result = wizard.accept_terms(&session).await;
        assert!(matches!(
            result,
            Err(CrawlError::WizardTimeout {
                step: "accept_terms",
                ..
            })
        ));
        // The wizard must not advance past the failed step.
        assert_eq!(wizard.state(), WizardState::TestTypeSelected);
    }
}
