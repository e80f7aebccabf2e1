//! Shared data model for the combobox validator.
//!
//! - `choice`: selectable options and the ordered, id-unique candidate set
//! - `config`: recognized widget options and the JSON-backed loader
//! - `errors`: validation errors shown to users and selection faults raised
//!   by host collaborators

mod choice;
pub mod config;
mod errors;

pub use choice::{CandidateSet, Choice};
pub use config::{ClearBehavior, ComboboxConfig, ConfigError, MatchPolicy};
pub use errors::{SelectionFault, ValidationError};

use serde::{Deserialize, Serialize};

/// The three phases of the combobox input state machine.
///
/// `Empty` is the initial phase and the target of every clear. There is no
/// terminal phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Empty,
    /// Text present, not backed by an explicit dropdown pick.
    Typing,
    /// Text equals the label of the choice picked from the dropdown.
    Confirmed,
}
