//! Submit form hosting a single combobox.
//!
//! The form owns the committed value, the rendered rejection message and the
//! optional "show all" checkbox. The combobox decides whether its state is
//! submittable; the form turns the answer into the call-site message.

use combobox_engine::CandidatePool;
use combobox_types::{Choice, ComboboxConfig};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, info};

use super::call_site::CallSite;
use crate::ui::components::combobox::{ComboboxEvent, ComboboxState};

/// Text shown for a field that has no committed value.
pub const EMPTY_DISPLAY: &str = "add";

/// Result of a submit attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The value was stored; `None` means it was cleared.
    Committed(Option<Choice>),
    /// Submission blocked; carries the message shown to the user.
    Rejected(String),
}

/// Side effects a key press asks the host to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormEffect {
    None,
    /// Candidates should be refreshed for the current text.
    FetchCandidates,
    Submitted(SubmitOutcome),
    Closed,
}

#[derive(Debug, Clone)]
pub struct SubmitFormState {
    site: CallSite,
    /// Focus flag for the form container
    focus: FocusFlag,
    f_show_all: FocusFlag,
    f_submit: FocusFlag,
    /// Focus cycle over the checkbox, input and submit button
    focus_ring: Focus,
    combobox: ComboboxState,
    committed: Option<Choice>,
    error_message: Option<String>,
    open: bool,
    pub last_area: Rect,
}

impl SubmitFormState {
    pub fn new(site: CallSite, base_config: &ComboboxConfig, pool: CandidatePool) -> Self {
        let name = site.name();
        Self {
            site,
            focus: FocusFlag::named(&format!("form.{name}")),
            f_show_all: FocusFlag::named(&format!("form.{name}.show_all")),
            f_submit: FocusFlag::named(&format!("form.{name}.submit")),
            focus_ring: Focus::default(),
            combobox: ComboboxState::new(&format!("form.{name}.input"), site.config(base_config)).with_pool(pool),
            committed: None,
            error_message: None,
            open: false,
            last_area: Rect::default(),
        }
    }

    /// Start with a value already committed, as a domain that has one would.
    pub fn with_committed(mut self, choice: Option<Choice>) -> Self {
        self.committed = choice;
        self
    }

    // ===== SELECTORS =====

    pub fn site(&self) -> CallSite {
        self.site
    }

    pub fn combobox(&self) -> &ComboboxState {
        &self.combobox
    }

    pub fn combobox_mut(&mut self) -> &mut ComboboxState {
        &mut self.combobox
    }

    pub fn committed(&self) -> Option<&Choice> {
        self.committed.as_ref()
    }

    /// What the page shows for the field: the committed label or `add`.
    pub fn display(&self) -> &str {
        self.committed.as_ref().map(|c| c.label.as_str()).unwrap_or(EMPTY_DISPLAY)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Checkbox state; checked means the restriction is lifted.
    pub fn show_all(&self) -> bool {
        !self.combobox.restrict_to_known_set()
    }

    pub fn is_submit_focused(&self) -> bool {
        self.f_submit.get()
    }

    pub fn is_show_all_focused(&self) -> bool {
        self.f_show_all.get()
    }

    // ===== FOCUS =====

    /// Rebuild the focus cycle so it matches the current layout. Called
    /// before every render and before focus moves.
    pub fn rebuild_focus(&mut self) {
        let old = std::mem::take(&mut self.focus_ring);
        let ring = FocusBuilder::rebuild_for(&*self, Some(old));
        self.focus_ring = ring;
    }

    /// Move focus along the cycle with Tab (`forward`) or BackTab.
    pub fn cycle_focus(&mut self, forward: bool) {
        self.rebuild_focus();
        if forward {
            self.focus_ring.next();
        } else {
            self.focus_ring.prev();
        }
        self.sync_combobox_focus();
        debug!(site = %self.site, focused = ?self.focus_ring.focused_name(), "form focus moved");
    }

    /// The combobox opens or closes its dropdown with its focus.
    fn sync_combobox_focus(&mut self) {
        if self.combobox.is_focused() {
            self.combobox.on_focus();
        } else {
            self.combobox.on_blur();
        }
    }

    fn release_focus(&mut self) {
        self.focus_ring.none();
        self.combobox.on_blur();
    }

    // ===== ACTIONS =====

    /// Open the form, mounting the combobox with the committed value.
    pub fn open(&mut self) {
        self.combobox.on_clear();
        if let Some(choice) = self.committed.clone() {
            self.combobox.restore_confirmed(choice);
        }
        self.error_message = None;
        self.open = true;
        self.rebuild_focus();
        self.focus_ring.focus(&self.combobox);
        self.combobox.on_focus();
        debug!(site = %self.site, "form opened");
    }

    /// Close without committing.
    pub fn cancel(&mut self) {
        self.open = false;
        self.error_message = None;
        self.release_focus();
    }

    /// Flip the "show all" checkbox. Returns `false` when the site has none.
    pub fn toggle_show_all(&mut self) -> bool {
        if !self.site.has_show_all_toggle() {
            return false;
        }
        let restrict = self.combobox.restrict_to_known_set();
        self.combobox.set_restrict_to_known_set(!restrict);
        true
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        match self.combobox.validate() {
            Ok(value) => {
                info!(
                    site = %self.site,
                    value = value.as_ref().map(|c| c.id.as_str()).unwrap_or(""),
                    "form value committed"
                );
                self.committed = value.clone();
                self.error_message = None;
                self.open = false;
                self.release_focus();
                SubmitOutcome::Committed(value)
            }
            Err(error) => {
                let message = error.render(self.site.field_label(), self.site.hint());
                debug!(site = %self.site, text = %self.combobox.text(), "form submission rejected");
                self.error_message = Some(message.clone());
                SubmitOutcome::Rejected(message)
            }
        }
    }

    /// Route a key press while the form is open.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormEffect {
        if !self.open || key.kind == KeyEventKind::Release {
            return FormEffect::None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.toggle_effect(),
            KeyCode::Char('s') if ctrl => FormEffect::Submitted(self.submit()),
            KeyCode::Esc if !self.combobox.is_dropdown_visible() => {
                self.cancel();
                FormEffect::Closed
            }
            KeyCode::Tab => {
                self.cycle_focus(true);
                FormEffect::None
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                FormEffect::None
            }
            _ if self.f_submit.get() => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => FormEffect::Submitted(self.submit()),
                _ => FormEffect::None,
            },
            _ if self.f_show_all.get() => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.toggle_effect(),
                _ => FormEffect::None,
            },
            _ => match self.combobox.handle_key(key) {
                ComboboxEvent::TextChanged | ComboboxEvent::Cleared => FormEffect::FetchCandidates,
                ComboboxEvent::SubmitRequested => FormEffect::Submitted(self.submit()),
                ComboboxEvent::Selected(_) if !self.site.has_submit_button() => FormEffect::Submitted(self.submit()),
                ComboboxEvent::Selected(_) | ComboboxEvent::Blurred | ComboboxEvent::Handled | ComboboxEvent::Ignored => {
                    FormEffect::None
                }
            },
        }
    }

    fn toggle_effect(&mut self) -> FormEffect {
        if self.toggle_show_all() {
            FormEffect::FetchCandidates
        } else {
            FormEffect::None
        }
    }
}

impl HasFocus for SubmitFormState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        if self.site.has_show_all_toggle() {
            builder.leaf_widget(&self.f_show_all);
        }
        builder.leaf_widget(&self.combobox);
        if self.site.has_submit_button() {
            builder.leaf_widget(&self.f_submit);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> CandidatePool {
        CandidatePool::from(vec![Choice::plain("PolicyEnforcementService.GLB"), Choice::plain("athenz.zms")])
            .with_associated(["athenz.zms"])
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn closed_form_ignores_keys() {
        let mut form = SubmitFormState::new(CallSite::DomainBusinessService, &ComboboxConfig::default(), services());
        assert_eq!(form.handle_key(key(KeyCode::Char('x'))), FormEffect::None);
        assert_eq!(form.display(), EMPTY_DISPLAY);
    }

    #[test]
    fn typing_requests_fetch_and_enter_submits() {
        let mut form = SubmitFormState::new(CallSite::ManageDomainsBusinessService, &ComboboxConfig::default(), services());
        form.open();
        assert_eq!(form.handle_key(key(KeyCode::Char('z'))), FormEffect::FetchCandidates);
        assert!(form.combobox().is_dropdown_visible());

        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEffect::None);
        let effect = form.handle_key(key(KeyCode::Enter));
        assert_eq!(
            effect,
            FormEffect::Submitted(SubmitOutcome::Rejected(
                "Business Service must be selected in the dropdown".into()
            ))
        );
        assert!(form.is_open());
    }

    #[test]
    fn ctrl_a_toggles_only_where_supported() {
        let mut form = SubmitFormState::new(CallSite::DomainBusinessService, &ComboboxConfig::default(), services());
        form.open();
        assert!(!form.show_all());
        assert_eq!(form.handle_key(ctrl('a')), FormEffect::FetchCandidates);
        assert!(form.show_all());

        let mut roles = SubmitFormState::new(CallSite::HistoryRoles, &ComboboxConfig::default(), services());
        roles.open();
        assert_eq!(roles.handle_key(ctrl('a')), FormEffect::None);
    }

    #[test]
    fn tab_cycles_input_submit_and_checkbox() {
        let mut form = SubmitFormState::new(CallSite::ManageDomainsBusinessService, &ComboboxConfig::default(), services());
        form.open();
        assert!(form.combobox().is_focused());

        form.handle_key(key(KeyCode::Tab));
        assert!(form.is_submit_focused());
        assert!(!form.combobox().is_focused());
        assert!(!form.combobox().is_dropdown_visible());

        form.handle_key(key(KeyCode::Tab));
        assert!(form.is_show_all_focused());
        assert!(!form.is_submit_focused());
        assert_eq!(form.handle_key(key(KeyCode::Char(' '))), FormEffect::FetchCandidates);
        assert!(form.show_all());
        assert_eq!(form.combobox().text(), "");

        form.handle_key(key(KeyCode::Tab));
        assert!(form.combobox().is_focused());
        assert!(!form.is_show_all_focused());

        form.handle_key(key(KeyCode::BackTab));
        assert!(form.is_show_all_focused());
    }

    #[test]
    fn filter_sites_apply_on_pick_without_submit_button() {
        let mut roles = SubmitFormState::new(CallSite::HistoryRoles, &ComboboxConfig::default(), services());
        roles.open();
        roles.handle_key(key(KeyCode::Tab));
        assert!(roles.combobox().is_focused());
        assert!(!roles.is_submit_focused());

        roles.handle_key(key(KeyCode::Char('z')));
        roles.handle_key(key(KeyCode::Char('m')));
        let effect = roles.handle_key(key(KeyCode::Enter));
        assert_eq!(
            effect,
            FormEffect::Submitted(SubmitOutcome::Committed(Some(Choice::plain("athenz.zms"))))
        );
        assert!(!roles.is_open());
        assert_eq!(roles.display(), "athenz.zms");
    }

    #[test]
    fn config_forbidding_empty_blocks_clearing_submit() {
        let strict = ComboboxConfig::default().with_allow_empty_submit(false);
        let mut form = SubmitFormState::new(CallSite::DomainBusinessService, &strict, services());
        form.open();
        assert!(!form.combobox().config().allow_empty_submit);
        assert_eq!(
            form.submit(),
            SubmitOutcome::Rejected(
                "Business Service must be selected in the dropdown or clear input before submitting".into()
            )
        );
        assert!(form.is_open());
    }

    #[test]
    fn escape_cancels_without_committing() {
        let mut form = SubmitFormState::new(CallSite::WorkflowDomain, &ComboboxConfig::default(), services())
            .with_committed(Some(Choice::plain("athenz.zms")));
        form.open();
        assert_eq!(form.combobox().text(), "athenz.zms");
        assert!(form.combobox().is_bold());

        form.handle_key(ctrl('u'));
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEffect::Closed);
        assert!(!form.is_open());
        assert_eq!(form.display(), "athenz.zms");
    }
}
