//! Combobox input state machine.
//!
//! The state owns the typed text, the explicitly confirmed choice, the
//! candidate pool and the filtered dropdown. It enforces one rule above all
//! others: a choice is confirmed only by picking it from the dropdown, and
//! the confirmation survives only while the text equals the choice label.
//!
//! Phases move `Empty -> Typing -> Confirmed`; any divergent edit drops a
//! confirmed input back to `Typing`, and clearing returns to `Empty` from
//! anywhere. Blur never changes the text and never confirms it.

use combobox_engine::{CandidatePool, FetchCoordinator, FetchError, FetchRequest, FetchTicket, filter_candidates};
use combobox_types::{CandidateSet, Choice, ClearBehavior, ComboboxConfig, Phase, SelectionFault, ValidationError};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::ui::components::common::TextInputState;

#[derive(Debug, Clone)]
pub struct ComboboxState {
    config: ComboboxConfig,
    /// Focus flag for the input leaf
    focus: FocusFlag,
    /// Typed text and cursor
    input: TextInputState,
    /// Choice picked from the dropdown; `Some` only while `input == label`
    confirmed: Option<Choice>,
    /// Candidate universe plus association marks
    pool: CandidatePool,
    /// Candidates offered for the current text, in candidate order
    filtered: Vec<Choice>,
    dropdown_open: bool,
    /// Highlighted row within `filtered`
    highlighted: usize,
    coordinator: FetchCoordinator,
    loading: bool,
    /// Last rendered area, used for focus hit testing
    pub last_area: Rect,
}

impl ComboboxState {
    pub fn new(name: &str, config: ComboboxConfig) -> Self {
        let mut state = Self {
            config,
            focus: FocusFlag::named(name),
            input: TextInputState::new(),
            confirmed: None,
            pool: CandidatePool::default(),
            filtered: Vec::new(),
            dropdown_open: false,
            highlighted: 0,
            coordinator: FetchCoordinator::new(),
            loading: false,
            last_area: Rect::default(),
        };
        state.refilter();
        state
    }

    pub fn with_pool(mut self, pool: CandidatePool) -> Self {
        self.set_pool(pool);
        self
    }

    // ===== SELECTORS =====

    pub fn text(&self) -> &str {
        self.input.input()
    }

    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    pub fn text_before_cursor(&self) -> &str {
        self.input.before_cursor()
    }

    pub fn confirmed(&self) -> Option<&Choice> {
        self.confirmed.as_ref()
    }

    /// Whether the input renders with the confirmed (bold) style.
    pub fn is_bold(&self) -> bool {
        self.confirmed.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.confirmed.is_some() {
            Phase::Confirmed
        } else if self.input.is_empty() {
            Phase::Empty
        } else {
            Phase::Typing
        }
    }

    pub fn filtered(&self) -> &[Choice] {
        &self.filtered
    }

    pub fn is_dropdown_visible(&self) -> bool {
        self.dropdown_open && !self.filtered.is_empty()
    }

    pub fn highlighted(&self) -> Option<&Choice> {
        self.filtered.get(self.highlighted)
    }

    pub fn highlighted_index(&self) -> usize {
        self.highlighted
    }

    pub fn is_focused(&self) -> bool {
        self.focus.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    pub fn restrict_to_known_set(&self) -> bool {
        self.config.restrict_to_known_set
    }

    /// Candidates currently in scope, before text filtering.
    pub fn visible_candidates(&self) -> CandidateSet {
        self.pool.visible(self.config.restrict_to_known_set)
    }

    // ===== EVENTS =====

    /// Replace the whole text, as a paste or programmatic edit would.
    pub fn on_type(&mut self, new_text: impl Into<String>) {
        self.input.set_input(new_text);
        self.text_changed();
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert_char(c);
        self.text_changed();
    }

    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.input.insert_str(s);
        self.text_changed();
    }

    /// Returns whether a character was removed.
    pub fn backspace(&mut self) -> bool {
        let changed = self.input.backspace();
        if changed {
            self.text_changed();
        }
        changed
    }

    /// Returns whether a character was removed.
    pub fn delete(&mut self) -> bool {
        let changed = self.input.delete();
        if changed {
            self.text_changed();
        }
        changed
    }

    pub fn move_cursor_left(&mut self) {
        self.input.move_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.input.move_right();
    }

    pub fn move_cursor_home(&mut self) {
        self.input.move_home();
    }

    pub fn move_cursor_end(&mut self) {
        self.input.move_end();
    }

    /// Pick a choice from the dropdown.
    ///
    /// The choice must be one of the currently offered candidates; anything
    /// else is a host bug and leaves the state untouched.
    pub fn on_select(&mut self, choice: &Choice) -> Result<(), SelectionFault> {
        if !self.filtered.contains(choice) {
            warn!(choice_id = %choice.id, text = %self.input.input(), "selection not offered by dropdown");
            return Err(SelectionFault::invalid(&choice.id));
        }
        self.input.set_input(choice.label.clone());
        self.confirmed = Some(choice.clone());
        self.refilter();
        self.dropdown_open = false;
        debug!(choice_id = %choice.id, "combobox selection confirmed");
        Ok(())
    }

    /// Select the highlighted row, if the dropdown is showing one.
    pub fn select_highlighted(&mut self) -> Option<Choice> {
        if !self.is_dropdown_visible() {
            return None;
        }
        let choice = self.highlighted()?.clone();
        self.on_select(&choice).ok()?;
        Some(choice)
    }

    pub fn on_focus(&mut self) {
        self.focus.set(true);
        self.dropdown_open = !self.filtered.is_empty();
    }

    /// Losing focus keeps the text exactly as typed.
    pub fn on_blur(&mut self) {
        self.focus.set(false);
        self.dropdown_open = false;
    }

    /// Hide the dropdown without touching focus or text.
    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    pub fn on_clear(&mut self) {
        self.input.clear();
        self.confirmed = None;
        self.refilter();
        self.dropdown_open = false;
    }

    pub fn highlight_next(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        if !self.dropdown_open {
            self.dropdown_open = true;
            return;
        }
        self.highlighted = (self.highlighted + 1) % self.filtered.len();
    }

    pub fn highlight_prev(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        if !self.dropdown_open {
            self.dropdown_open = true;
            return;
        }
        let len = self.filtered.len();
        self.highlighted = (self.highlighted + len - 1) % len;
    }

    /// Restore a previously committed value as confirmed, for example when a
    /// form reopens showing its current value.
    pub fn restore_confirmed(&mut self, choice: Choice) {
        self.input.set_input(choice.label.clone());
        self.confirmed = Some(choice);
        self.refilter();
        self.dropdown_open = false;
    }

    // ===== SUBMISSION =====

    /// Decide whether the current state may be submitted. Never mutates.
    pub fn validate_for_submit(&self, allow_empty: bool) -> Result<Option<Choice>, ValidationError> {
        if self.input.is_empty() {
            return if allow_empty {
                Ok(None)
            } else {
                Err(ValidationError::MustSelectFromDropdown)
            };
        }
        match &self.confirmed {
            Some(choice) => Ok(Some(choice.clone())),
            None => Err(ValidationError::MustSelectFromDropdown),
        }
    }

    /// [`Self::validate_for_submit`] with the configured empty policy.
    pub fn validate(&self) -> Result<Option<Choice>, ValidationError> {
        self.validate_for_submit(self.config.allow_empty_submit)
    }

    // ===== CANDIDATES =====

    /// Replace the pool and refilter immediately.
    pub fn set_pool(&mut self, pool: CandidatePool) {
        self.pool = pool;
        self.refilter();
    }

    /// Replace the candidates with a set that is entirely known.
    pub fn set_candidates(&mut self, set: CandidateSet) {
        self.set_pool(CandidatePool::all_known(set));
    }

    /// Toggle the known-set restriction; the dropdown refilters right away.
    pub fn set_restrict_to_known_set(&mut self, restrict: bool) {
        if self.config.restrict_to_known_set == restrict {
            return;
        }
        self.config.restrict_to_known_set = restrict;
        self.refilter();
        if self.focus.get() && self.confirmed.is_none() {
            self.dropdown_open = !self.filtered.is_empty();
        }
        debug!(restrict, offered = self.filtered.len(), "known-set restriction changed");
    }

    /// Start a fetch for the current text, superseding any in flight.
    pub fn begin_fetch(&mut self) -> (FetchTicket, FetchRequest) {
        let query = self.input.input().to_string();
        let ticket = self.coordinator.issue(query.clone());
        self.loading = true;
        (ticket, FetchRequest::new(query).with_policy(self.config.match_policy))
    }

    /// Apply a completed fetch. Returns `false` when the ticket was superseded
    /// and the result was dropped.
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, pool: CandidatePool) -> bool {
        if !self.coordinator.accept(ticket) {
            return false;
        }
        self.loading = false;
        self.set_pool(pool);
        if self.focus.get() && self.confirmed.is_none() {
            self.dropdown_open = !self.filtered.is_empty();
        }
        true
    }

    /// Record a failed fetch. Stale failures are ignored; current ones keep
    /// the previous candidates.
    pub fn apply_fetch_error(&mut self, ticket: &FetchTicket, error: &FetchError) -> bool {
        if !self.coordinator.accept(ticket) {
            return false;
        }
        self.loading = false;
        warn!(generation = ticket.generation, error = %error, "keeping previous candidates after failed fetch");
        true
    }

    // ===== INTERNALS =====

    fn text_changed(&mut self) {
        if let Some(choice) = &self.confirmed
            && choice.label != self.input.input()
        {
            debug!(choice_id = %choice.id, "edit diverged from confirmed label");
            self.confirmed = None;
        }
        self.refilter();
        self.dropdown_open = self.focus.get() && !self.filtered.is_empty();
    }

    fn refilter(&mut self) {
        let text = self.input.input();
        self.filtered = if text.is_empty() && self.config.clear_behavior == ClearBehavior::ShowNone {
            Vec::new()
        } else {
            filter_candidates(&self.visible_candidates(), text, self.config.match_policy)
        };
        if self.highlighted >= self.filtered.len() {
            self.highlighted = 0;
        }
    }
}

impl HasFocus for ComboboxState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}
