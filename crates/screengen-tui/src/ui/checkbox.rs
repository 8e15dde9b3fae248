use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme;

pub(crate) fn checkbox_marker(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

pub(crate) fn checkbox_line(label: &str, checked: bool, focused: bool) -> Line<'static> {
    let marker_style = if focused {
        theme::focus_prompt()
    } else {
        Style::default()
    };
    let label_style = if focused {
        Style::default().add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(format!("{} ", checkbox_marker(checked)), marker_style),
        Span::styled(label.to_string(), label_style),
    ])
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier};

    use super::{checkbox_line, checkbox_marker};

    #[test]
    fn marker_reflects_checked_state() {
        assert_eq!(checkbox_marker(true), "[x]");
        assert_eq!(checkbox_marker(false), "[ ]");
    }

    #[test]
    fn focused_checkbox_is_highlighted() {
        let line = checkbox_line("Also create test class", true, true);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content.as_ref(), "[x] ");
        assert_eq!(line.spans[0].style.fg, Some(Color::Blue));
        assert!(
            line.spans[1]
                .style
                .add_modifier
                .contains(Modifier::UNDERLINED)
        );

        let line = checkbox_line("Also create test class", false, false);
        assert_eq!(line.spans[0].content.as_ref(), "[ ] ");
        assert_eq!(line.spans[0].style.fg, None);
    }
}
