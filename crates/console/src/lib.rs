//! `tallerpro-console`: the page controllers of the TallerPro console and
//! the context they are built from.
//!
//! Rendering is left to whatever front end drives these controllers; this
//! crate owns state transitions, reload discipline and error presentation.

pub mod config;
pub mod credential_cache;
pub mod form_modal;
pub mod list_page;
pub mod seams;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, ConsoleConfig};
pub use credential_cache::SqliteCredentialStore;
pub use form_modal::{FormModalController, ModalState, SubmitOutcome};
pub use list_page::{DeleteOutcome, ListFailure, ListPageController, ListState};
pub use seams::{Confirmation, Preconfirmed, ReloadTarget};
pub use state::AppState;
