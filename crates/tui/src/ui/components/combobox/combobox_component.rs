//! Terminal rendering for the combobox.
//!
//! The input renders inside a bordered block; confirmed text is bold. The
//! dropdown, when visible, renders directly beneath the input and highlights
//! the active row.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::state::ComboboxState;
use crate::ui::theme::{
    Theme,
    helpers::{block, input_style},
};

/// Maximum dropdown rows shown at once.
const MAX_DROPDOWN_ROWS: usize = 6;
const PLACEHOLDER: &str = "Type to search";

#[derive(Debug, Default)]
pub struct ComboboxComponent;

impl ComboboxComponent {
    /// Rows needed to draw the input plus the visible dropdown.
    pub fn desired_height(state: &ComboboxState) -> u16 {
        let dropdown = if state.is_dropdown_visible() {
            state.filtered().len().min(MAX_DROPDOWN_ROWS) as u16 + 2
        } else {
            0
        };
        3 + dropdown
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &mut ComboboxState, theme: &dyn Theme, title: &str) {
        let [input_area, dropdown_area] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
        state.last_area = input_area;

        let focused = state.is_focused();
        let title = if state.is_loading() { format!("{title} …") } else { title.to_string() };
        let input_block = block(theme, Some(title.as_str()), focused);
        let inner = input_block.inner(input_area);

        let line = if state.text().is_empty() {
            Line::from(Span::styled(PLACEHOLDER, theme.text_muted_style()))
        } else {
            Line::from(Span::styled(state.text().to_string(), input_style(theme, state.is_bold())))
        };
        frame.render_widget(Paragraph::new(line).block(input_block), input_area);

        if focused {
            let offset = state.text_before_cursor().width() as u16;
            let x = inner.x.saturating_add(offset).min(inner.right().saturating_sub(1));
            frame.set_cursor_position((x, inner.y));
        }

        if state.is_dropdown_visible() && dropdown_area.height > 2 {
            self.render_dropdown(frame, dropdown_area, state, theme);
        }
    }

    fn render_dropdown(&self, frame: &mut Frame, area: Rect, state: &ComboboxState, theme: &dyn Theme) {
        let rows = state.filtered().len().min(MAX_DROPDOWN_ROWS) as u16;
        let height = (rows + 2).min(area.height);
        let rect = Rect { height, ..area };

        let items: Vec<ListItem> = state
            .filtered()
            .iter()
            .map(|choice| ListItem::new(Line::from(choice.label.clone())).style(theme.text_primary_style()))
            .collect();
        let list = List::new(items)
            .block(block(theme, None, true))
            .highlight_style(theme.selection_style());
        let mut list_state = ListState::default().with_selected(Some(state.highlighted_index()));

        frame.render_widget(Clear, rect);
        frame.render_stateful_widget(list, rect, &mut list_state);
    }
}
