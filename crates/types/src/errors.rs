//! Error taxonomy for the combobox validator.

use thiserror::Error;

/// User-facing rejection returned when a form tries to submit the combobox.
///
/// The widget itself does not know which field it backs, so the `Display`
/// text is generic. Forms render the call-site specific message with
/// [`ValidationError::render`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Text is present (or required) but no dropdown choice backs it.
    #[error("value must be selected in the dropdown")]
    MustSelectFromDropdown,
}

impl ValidationError {
    /// Render the message shown under the form, for example
    /// `Business Service must be selected in the dropdown or clear input before submitting`.
    pub fn render(&self, field_label: &str, hint: Option<&str>) -> String {
        match self {
            Self::MustSelectFromDropdown => {
                let mut message = format!("{field_label} must be selected in the dropdown");
                if let Some(hint) = hint.filter(|h| !h.is_empty()) {
                    message.push(' ');
                    message.push_str(hint);
                }
                message
            }
        }
    }
}

/// Contract violation raised by a host that selects an option the dropdown
/// never offered. Not meant to be shown to end users.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectionFault {
    #[error("choice '{id}' is not offered by the dropdown")]
    InvalidSelection { id: String },
}

impl SelectionFault {
    pub fn invalid(id: impl Into<String>) -> Self {
        Self::InvalidSelection { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_call_site_messages() {
        let err = ValidationError::MustSelectFromDropdown;
        assert_eq!(
            err.render("Business Service", Some("or clear input before submitting")),
            "Business Service must be selected in the dropdown or clear input before submitting"
        );
        assert_eq!(err.render("Business Service", None), "Business Service must be selected in the dropdown");
        assert_eq!(err.render("Role", Some("")), "Role must be selected in the dropdown");
    }

    #[test]
    fn selection_fault_names_the_choice() {
        let fault = SelectionFault::invalid("nonexistent.service");
        assert_eq!(fault.to_string(), "choice 'nonexistent.service' is not offered by the dropdown");
    }
}
