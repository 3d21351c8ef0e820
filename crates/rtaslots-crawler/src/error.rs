use thiserror::Error;

use crate::session::SessionError;
use crate::wizard::WizardState;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("session provisioning failed after {attempts} attempts")]
    ProvisionExhausted { attempts: u32 },

    #[error("access to the portal was still blocked after {attempts} attempts")]
    AccessBlocked { attempts: u32 },

    #[error("wizard step '{step}' failed: {source}")]
    WizardTimeout {
        step: &'static str,
        #[source]
        source: SessionError,
    },

    #[error("wizard step '{step}' attempted from state {state:?}")]
    WizardOutOfOrder {
        step: &'static str,
        state: WizardState,
    },

    #[error("could not select location \"{location}\": {source}")]
    LocationSelect {
        location: String,
        #[source]
        source: SessionError,
    },

    #[error("could not return to the location stage: {0}")]
    LocationStageLost(#[source] SessionError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
