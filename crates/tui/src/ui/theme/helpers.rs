use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers.
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Style for the combobox text. Bold marks a confirmed dropdown pick and
/// nothing else.
pub fn input_style<T: Theme + ?Sized>(theme: &T, confirmed: bool) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    let style = Style::default().bg(surface).fg(text);
    if confirmed {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// Primary button style (filled accent background).
pub fn button_primary_style<T: Theme + ?Sized>(theme: &T, enabled: bool) -> Style {
    if enabled {
        let ThemeRoles {
            accent_primary, background, ..
        } = *theme.roles();
        Style::default().bg(accent_primary).fg(background).add_modifier(Modifier::BOLD)
    } else {
        let ThemeRoles {
            surface_muted, text_muted, ..
        } = *theme.roles();
        Style::default().bg(surface_muted).fg(text_muted)
    }
}
