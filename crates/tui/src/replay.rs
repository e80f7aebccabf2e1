//! Headless replay of scripted form interactions.
//!
//! A script is a list of events applied in order to one submit form. After
//! each event the form is snapshotted into a [`StepReport`], so a transcript
//! shows exactly what the user would have seen: the text, whether it renders
//! bold, the dropdown offer, the error message and the committed display.

use std::path::Path;

use anyhow::{Context, Result};
use combobox_types::{Choice, Phase};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ui::components::form::{SubmitFormState, SubmitOutcome};

/// One scripted user action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ScriptEvent {
    /// Replace the whole text.
    Type { text: String },
    /// Append at the end of the current text.
    Append { text: String },
    Backspace {
        #[serde(default = "one")]
        count: usize,
    },
    /// Pick the offered choice whose label (or id) equals `label`.
    Select { label: String },
    Focus,
    Blur,
    Clear,
    ToggleShowAll,
    Submit,
    /// Reopen the form after a successful submit or a cancel.
    Reopen,
    Cancel,
}

fn one() -> usize {
    1
}

impl ScriptEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Type { .. } => "type",
            Self::Append { .. } => "append",
            Self::Backspace { .. } => "backspace",
            Self::Select { .. } => "select",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Clear => "clear",
            Self::ToggleShowAll => "toggle-show-all",
            Self::Submit => "submit",
            Self::Reopen => "reopen",
            Self::Cancel => "cancel",
        }
    }
}

/// Snapshot of the form after one event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub action: String,
    pub text: String,
    pub bold: bool,
    pub phase: Phase,
    /// Labels offered by the dropdown, empty while it is hidden.
    pub dropdown: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Host faults, such as selecting something the dropdown did not offer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
    pub open: bool,
    pub display: String,
}

impl StepReport {
    fn capture(action: &str, form: &SubmitFormState, fault: Option<String>) -> Self {
        let combobox = form.combobox();
        let dropdown = if combobox.is_dropdown_visible() {
            combobox.filtered().iter().map(|c| c.label.clone()).collect()
        } else {
            Vec::new()
        };
        Self {
            action: action.to_string(),
            text: combobox.text().to_string(),
            bold: combobox.is_bold(),
            phase: combobox.phase(),
            dropdown,
            error: form.error_message().map(str::to_string),
            fault,
            open: form.is_open(),
            display: form.display().to_string(),
        }
    }
}

/// Load a script from YAML or JSON, chosen by file extension.
pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read script {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let events: Vec<ScriptEvent> = if is_json {
        serde_json::from_str(&content).with_context(|| format!("parse script {}", path.display()))?
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("parse script {}", path.display()))?
    };
    debug!(path = %path.display(), events = events.len(), "script loaded");
    Ok(events)
}

/// Apply one event. Returns the fault message when the event was refused.
pub fn apply(form: &mut SubmitFormState, event: &ScriptEvent) -> Option<String> {
    let combobox = form.combobox_mut();
    match event {
        ScriptEvent::Type { text } => combobox.on_type(text.as_str()),
        ScriptEvent::Append { text } => {
            combobox.move_cursor_end();
            combobox.insert_str(text);
        }
        ScriptEvent::Backspace { count } => {
            combobox.move_cursor_end();
            for _ in 0..*count {
                if !combobox.backspace() {
                    break;
                }
            }
        }
        ScriptEvent::Select { label } => {
            let offered: Option<Choice> = combobox
                .filtered()
                .iter()
                .find(|c| c.label == *label || c.id == *label)
                .cloned();
            let choice = offered.unwrap_or_else(|| Choice::plain(label.as_str()));
            if let Err(fault) = combobox.on_select(&choice) {
                return Some(fault.to_string());
            }
            if !form.site().has_submit_button() {
                form.submit();
            }
        }
        ScriptEvent::Focus => combobox.on_focus(),
        ScriptEvent::Blur => combobox.on_blur(),
        ScriptEvent::Clear => combobox.on_clear(),
        ScriptEvent::ToggleShowAll => {
            if !form.toggle_show_all() {
                return Some(format!("{} has no show-all toggle", form.site()));
            }
        }
        ScriptEvent::Submit => {
            if let SubmitOutcome::Rejected(message) = form.submit() {
                debug!(%message, "scripted submit rejected");
            }
        }
        ScriptEvent::Reopen => form.open(),
        ScriptEvent::Cancel => form.cancel(),
    }
    None
}

/// Run a whole script against the form, one report per event.
pub fn replay(form: &mut SubmitFormState, events: &[ScriptEvent]) -> Vec<StepReport> {
    events
        .iter()
        .map(|event| {
            let fault = apply(form, event);
            StepReport::capture(event.name(), form, fault)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::form::CallSite;
    use combobox_engine::CandidatePool;
    use combobox_types::ComboboxConfig;

    fn form() -> SubmitFormState {
        let pool = CandidatePool::from(vec![Choice::plain("athenz.zms"), Choice::plain("athenz.zts")])
            .with_associated(["athenz.zms", "athenz.zts"]);
        let mut form = SubmitFormState::new(CallSite::ManageDomainsBusinessService, &ComboboxConfig::default(), pool);
        form.open();
        form
    }

    #[test]
    fn parses_yaml_script() {
        let script = r#"
- action: type
  text: zms
- action: select
  label: athenz.zms
- action: backspace
- action: toggle-show-all
- action: submit
"#;
        let events: Vec<ScriptEvent> = serde_yaml::from_str(script).expect("script");
        assert_eq!(events[0], ScriptEvent::Type { text: "zms".into() });
        assert_eq!(events[2], ScriptEvent::Backspace { count: 1 });
        assert_eq!(events[3], ScriptEvent::ToggleShowAll);
    }

    #[test]
    fn transcript_tracks_each_step() {
        let mut form = form();
        let events = vec![
            ScriptEvent::Type { text: "zts".into() },
            ScriptEvent::Select { label: "athenz.zts".into() },
            ScriptEvent::Submit,
        ];
        let reports = replay(&mut form, &events);

        assert_eq!(reports[0].dropdown, vec!["athenz.zts".to_string()]);
        assert!(!reports[0].bold);
        assert!(reports[1].bold);
        assert_eq!(reports[1].phase, Phase::Confirmed);
        assert!(!reports[2].open);
        assert_eq!(reports[2].display, "athenz.zts");
    }

    #[test]
    fn selecting_unoffered_label_reports_fault() {
        let mut form = form();
        let reports = replay(
            &mut form,
            &[
                ScriptEvent::Type { text: "zms".into() },
                ScriptEvent::Select { label: "athenz.zts".into() },
            ],
        );
        assert!(reports[1].fault.as_deref().is_some_and(|f| f.contains("athenz.zts")));
        assert_eq!(reports[1].text, "zms");
    }

    #[test]
    fn toggle_without_checkbox_reports_fault() {
        let pool = CandidatePool::from(vec![Choice::plain("admin")]);
        let mut roles = SubmitFormState::new(CallSite::HistoryRoles, &ComboboxConfig::default(), pool);
        roles.open();
        let fault = apply(&mut roles, &ScriptEvent::ToggleShowAll);
        assert_eq!(fault.as_deref(), Some("history-roles has no show-all toggle"));
    }
}
