mod call_site;
mod form_component;
mod state;

pub use call_site::{CallSite, UnknownCallSite};
pub use form_component::{SubmitFormComponent, desired_form_height};
pub use state::{EMPTY_DISPLAY, FormEffect, SubmitFormState, SubmitOutcome};
