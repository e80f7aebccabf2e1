//! Modal rendering for a submit form.
//!
//! Layout, top to bottom: optional "show all" checkbox, the combobox with its
//! dropdown, the error message, then the submit button and key hints. When the
//! form is closed only the field's current display value is drawn.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use super::state::SubmitFormState;
use crate::ui::components::combobox::ComboboxComponent;
use crate::ui::theme::{
    Theme,
    helpers::{block, button_primary_style},
};

const HINTS: &str = "Enter select/submit  Tab move  Ctrl+U clear  Esc close";
const FILTER_HINTS: &str = "Enter apply  Ctrl+U clear  Esc close";
const SHOW_ALL_HINT: &str = "  Space/Ctrl+A toggle";

#[derive(Debug, Default)]
pub struct SubmitFormComponent {
    combobox: ComboboxComponent,
}

impl SubmitFormComponent {
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &mut SubmitFormState, theme: &dyn Theme) {
        state.last_area = area;
        if !state.is_open() {
            self.render_summary(frame, area, state, theme);
            return;
        }

        let site = state.site();
        let outer = block(theme, Some(site.field_label()), true);
        let inner = outer.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(outer, area);

        let checkbox_rows = if site.has_show_all_toggle() { 1 } else { 0 };
        let combobox_rows = ComboboxComponent::desired_height(state.combobox());
        let [checkbox_area, combobox_area, error_area, footer_area] = Layout::vertical([
            Constraint::Length(checkbox_rows),
            Constraint::Length(combobox_rows),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        if site.has_show_all_toggle() {
            let mark = if state.show_all() { "[x]" } else { "[ ]" };
            let mut mark_style = theme.accent_emphasis_style();
            if state.is_show_all_focused() {
                mark_style = mark_style.add_modifier(Modifier::REVERSED);
            }
            let line = Line::from(vec![
                Span::styled(mark, mark_style),
                Span::styled(" Show all business services", theme.text_primary_style()),
            ]);
            frame.render_widget(Paragraph::new(line), checkbox_area);
        }

        self.combobox
            .render(frame, combobox_area, state.combobox_mut(), theme, site.field_label());

        if let Some(message) = state.error_message() {
            frame.render_widget(
                Paragraph::new(Span::styled(message.to_string(), theme.status_error())),
                error_area,
            );
        }

        let mut spans = Vec::new();
        let mut hints = if site.has_submit_button() {
            let mut button_style = button_primary_style(theme, true);
            if state.is_submit_focused() {
                button_style = button_style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(" Submit ", button_style));
            spans.push(Span::raw("  "));
            HINTS.to_string()
        } else {
            FILTER_HINTS.to_string()
        };
        if site.has_show_all_toggle() {
            hints.push_str(SHOW_ALL_HINT);
        }
        spans.push(Span::styled(hints, theme.text_muted_style()));
        frame.render_widget(Paragraph::new(Line::from(spans)), footer_area);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, state: &SubmitFormState, theme: &dyn Theme) {
        let style = if state.committed().is_some() {
            theme.status_success()
        } else {
            theme.text_muted_style()
        };
        let line = Line::from(vec![
            Span::styled(format!("{}: ", state.site().field_label()), theme.text_secondary_style()),
            Span::styled(state.display().to_string(), style),
            Span::styled("  (Enter to edit, q to quit)", theme.text_muted_style()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Height the open form needs for its current content.
pub fn desired_form_height(state: &SubmitFormState) -> u16 {
    let checkbox_rows = if state.site().has_show_all_toggle() { 1 } else { 0 };
    2 + checkbox_rows + ComboboxComponent::desired_height(state.combobox()) + 2
}
