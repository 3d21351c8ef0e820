pub mod driver;
pub mod error;
pub mod extract;
pub mod guard;
pub mod locations;
pub mod provision;
pub mod proxy;
pub mod run;
pub mod selectors;
pub mod session;
pub mod week;
pub mod wizard;

mod identity;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::CrawlError;
pub use run::{list_available_locations, run_crawl};
pub use session::{Locator, LocationOption, Session, SessionError};
pub use week::CrawlPolicy;
pub use wizard::WizardState;
