use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Clear;

use crate::centered_rect;
use crate::theme;
use crate::ui::text::{key_hint_height, key_hint_paragraph, wrapped_paragraph};

const WIDTH_PCT: u16 = 80;
const HEIGHT_PCT: u16 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModalKind {
    Success,
    Error,
}

impl ModalKind {
    fn title(self) -> Line<'static> {
        match self {
            Self::Success => Line::from(Span::styled("Success", theme::success_prompt())),
            Self::Error => Line::from(Span::styled("Error", theme::error_prompt())),
        }
    }
}

/// Draws a centered message box over the dialog, with `footer` in a key
/// strip just outside it when the screen has room.
pub(crate) fn render_modal(frame: &mut Frame<'_>, kind: ModalKind, message: &str, footer: &str) {
    let screen = frame.area();
    let modal = centered_rect(WIDTH_PCT, HEIGHT_PCT, screen);
    let footer_height = key_hint_height(modal.width, footer);
    let (body, footer_area) = match footer_outside(screen, modal, footer_height) {
        Some(footer_area) => (modal, footer_area),
        None => {
            let [body, footer_area] =
                Layout::vertical([Constraint::Min(3), Constraint::Length(footer_height)])
                    .areas(modal);
            (body, footer_area)
        }
    };

    frame.render_widget(Clear, body);
    frame.render_widget(
        wrapped_paragraph(message_text(message)).block(theme::chrome(kind.title())),
        body,
    );
    frame.render_widget(Clear, footer_area);
    frame.render_widget(
        key_hint_paragraph(footer).block(theme::key_block()),
        footer_area,
    );
}

/// Room directly below the modal, else directly above it.
fn footer_outside(screen: Rect, modal: Rect, height: u16) -> Option<Rect> {
    let below = modal.bottom();
    if below.saturating_add(height) <= screen.bottom() {
        return Some(Rect { y: below, height, ..modal });
    }

    modal
        .y
        .checked_sub(height)
        .filter(|above| *above >= screen.y)
        .map(|above| Rect { y: above, height, ..modal })
}

fn message_text(message: &str) -> Text<'static> {
    let lines: Vec<Line<'static>> = message
        .trim_end()
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();
    if lines.is_empty() {
        Text::from(Line::default())
    } else {
        Text::from(lines)
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use super::{ModalKind, footer_outside, message_text, render_modal};

    #[test]
    fn message_text_drops_trailing_newline() {
        let text = message_text("Created:\nLoginScreen.java\n");
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[0].spans[0].content.as_ref(), "Created:");
        assert_eq!(text.lines[1].spans[0].content.as_ref(), "LoginScreen.java");
    }

    #[test]
    fn message_text_keeps_one_line_for_empty_message() {
        let text = message_text("");
        assert_eq!(text.lines.len(), 1);
        assert!(text.lines[0].spans.is_empty());
    }

    #[test]
    fn footer_goes_below_when_there_is_room() {
        let screen = Rect::new(0, 0, 100, 40);
        let modal = Rect::new(10, 10, 80, 20);
        assert_eq!(
            footer_outside(screen, modal, 3),
            Some(Rect::new(10, 30, 80, 3))
        );
    }

    #[test]
    fn footer_goes_above_within_offset_screen() {
        let screen = Rect::new(10, 20, 80, 20);
        let modal = Rect::new(15, 28, 60, 12);
        assert_eq!(
            footer_outside(screen, modal, 4),
            Some(Rect::new(15, 24, 60, 4))
        );
    }

    #[test]
    fn footer_has_no_outside_slot_on_cramped_screen() {
        let screen = Rect::new(10, 20, 80, 10);
        let modal = Rect::new(15, 22, 60, 8);
        assert_eq!(footer_outside(screen, modal, 3), None);
    }

    #[test]
    fn error_modal_shows_title_message_and_footer() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");
        terminal
            .draw(|frame| {
                render_modal(
                    frame,
                    ModalKind::Error,
                    "Generation failed.",
                    "Enter/Esc: back to editing",
                )
            })
            .expect("draw");

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Error"));
        assert!(rendered.contains("Generation failed."));
        assert!(rendered.contains("Enter/Esc: back to editing"));
    }
}
