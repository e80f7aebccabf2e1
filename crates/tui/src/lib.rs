//! # Combobox TUI Library
//!
//! Terminal rendition of the combobox input validator: a text input with a
//! filtered dropdown that only accepts values explicitly picked from it.
//!
//! ## Key Features
//!
//! - Combobox state machine (`Empty`, `Typing`, `Confirmed`) with bold
//!   rendering for confirmed values
//! - Submit forms for each call site, with call-site specific messages
//! - Stale candidate fetches dropped by generation
//! - Headless script replay for scripted checks
//!
//! ## Architecture
//!
//! State lives in `*State` structs that never touch the terminal; `*Component`
//! structs render that state with ratatui. The runtime owns the terminal and
//! routes input and fetch completions into the form.

pub mod replay;
mod ui;

use std::time::Duration;

use anyhow::Result;
use combobox_engine::CandidatePool;
use combobox_types::{Choice, ComboboxConfig};

pub use ui::components::{
    CallSite, ComboboxComponent, ComboboxEvent, ComboboxState, EMPTY_DISPLAY, FormEffect, SubmitFormComponent,
    SubmitFormState, SubmitOutcome, UnknownCallSite,
};
pub use ui::theme::{NordTheme, Theme};

/// Runs the interactive submit form until the user quits.
///
/// # Errors
///
/// Fails when the terminal cannot be put into raw mode or drawn to.
pub async fn run(
    pool: CandidatePool,
    site: CallSite,
    config: ComboboxConfig,
    committed: Option<Choice>,
    fetch_latency: Option<Duration>,
) -> Result<()> {
    ui::runtime::run_app(ui::runtime::RuntimeOptions {
        site,
        config,
        pool,
        committed,
        fetch_latency,
    })
    .await
}
