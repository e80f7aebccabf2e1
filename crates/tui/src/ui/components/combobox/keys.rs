use combobox_types::Choice;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::ComboboxState;

/// What a key press did to the combobox, so the host can react (refetch,
/// move focus, submit).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComboboxEvent {
    /// Text changed; hosts typically dispatch a candidate fetch.
    TextChanged,
    Selected(Choice),
    Cleared,
    /// Focus left the input (Tab).
    Blurred,
    /// Enter with no dropdown row to pick.
    SubmitRequested,
    /// Cursor or highlight moved, dropdown toggled.
    Handled,
    Ignored,
}

impl ComboboxState {
    /// Route a terminal key press to the state machine.
    pub fn handle_key(&mut self, key: KeyEvent) -> ComboboxEvent {
        if key.kind == KeyEventKind::Release {
            return ComboboxEvent::Ignored;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                self.on_clear();
                ComboboxEvent::Cleared
            }
            KeyCode::Char(_) if ctrl => ComboboxEvent::Ignored,
            KeyCode::Char(c) => {
                self.insert_char(c);
                ComboboxEvent::TextChanged
            }
            KeyCode::Backspace => edit_event(self.backspace()),
            KeyCode::Delete => edit_event(self.delete()),
            KeyCode::Left => {
                self.move_cursor_left();
                ComboboxEvent::Handled
            }
            KeyCode::Right => {
                self.move_cursor_right();
                ComboboxEvent::Handled
            }
            KeyCode::Home => {
                self.move_cursor_home();
                ComboboxEvent::Handled
            }
            KeyCode::End => {
                self.move_cursor_end();
                ComboboxEvent::Handled
            }
            KeyCode::Down => {
                self.highlight_next();
                ComboboxEvent::Handled
            }
            KeyCode::Up => {
                self.highlight_prev();
                ComboboxEvent::Handled
            }
            KeyCode::Enter => match self.select_highlighted() {
                Some(choice) => ComboboxEvent::Selected(choice),
                None => ComboboxEvent::SubmitRequested,
            },
            KeyCode::Esc if self.is_dropdown_visible() => {
                self.close_dropdown();
                ComboboxEvent::Handled
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.on_blur();
                ComboboxEvent::Blurred
            }
            _ => ComboboxEvent::Ignored,
        }
    }
}

fn edit_event(changed: bool) -> ComboboxEvent {
    if changed {
        ComboboxEvent::TextChanged
    } else {
        ComboboxEvent::Handled
    }
}
