use ratatui::layout::Alignment;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::theme;

pub(crate) fn wrapped_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    Paragraph::new(text).wrap(Wrap { trim: false })
}

pub(crate) fn key_hint_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    wrapped_paragraph(text).alignment(Alignment::Center)
}

pub(crate) fn key_hint_height(total_width: u16, text: &str) -> u16 {
    let content_width = total_width.saturating_sub(2).max(1) as usize;
    let lines = wrapped_line_count(text, content_width);
    lines.saturating_add(2).max(3)
}

/// Picks the first hint that fits on one footer line, else the last one.
pub(crate) fn fitting_hint<'a>(total_width: u16, hints: &[&'a str]) -> &'a str {
    let content_width = total_width.saturating_sub(2) as usize;
    hints
        .iter()
        .copied()
        .find(|hint| hint.chars().count() <= content_width)
        .or_else(|| hints.last().copied())
        .unwrap_or_default()
}

pub(crate) fn focus_line(message: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(message.into(), theme::focus_prompt()))
}

pub(crate) fn label_value_line(
    label: impl Into<String>,
    value: impl Into<String>,
) -> Line<'static> {
    let label = label.into();
    let value = value.into();
    Line::from(vec![
        Span::styled(format!("{label}: "), theme::secondary_text()),
        Span::raw(value),
    ])
}

fn wrapped_line_count(text: &str, width: usize) -> u16 {
    text.split('\n')
        .map(|line| wrapped_line_count_single(line, width))
        .fold(0u16, u16::saturating_add)
        .max(1)
}

/// Rows one line occupies when hard-wrapped at `width` cells. Tabs take four.
fn wrapped_line_count_single(line: &str, width: usize) -> u16 {
    let cells: usize = line
        .chars()
        .map(|ch| if ch == '\t' { 4 } else { 1 })
        .sum();
    let rows = cells.div_ceil(width.max(1)).max(1);
    u16::try_from(rows).unwrap_or(u16::MAX)
}
