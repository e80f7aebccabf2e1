//! Theme styling for the combobox UI.
//!
//! Semantic roles live in `roles`; `nord` maps the Nord palette onto them and
//! `helpers` builds the ratatui styles shared by the combobox and its forms.
//! Prefer these helpers over hard-coded colors.

pub mod helpers;
pub mod nord;
pub mod roles;

pub use nord::NordTheme;
pub use roles::{Theme, ThemeRoles};
