//! Client-held interaction state.
//!
//! - `wizard`: The four-step guided finder and deep-link hydration
//! - `search_box`: Keyword search issued on every edit
//! - `sequence`: Tickets that keep stale responses off the screen

pub mod search_box;
pub mod sequence;
pub mod wizard;

pub use search_box::SearchBox;
pub use sequence::{QueryTicket, RequestSequence, Ticket};
pub use wizard::{DeepLink, Wizard, WizardSelection, WizardStep};
