pub mod combobox;
pub mod common;
pub mod form;

pub use combobox::{ComboboxComponent, ComboboxEvent, ComboboxState};
pub use form::{CallSite, EMPTY_DISPLAY, FormEffect, SubmitFormComponent, SubmitFormState, SubmitOutcome, UnknownCallSite};
