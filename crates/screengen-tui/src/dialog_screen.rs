use crossterm::event::{Event, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use screengen_app::{App, DialogState, FocusTarget, ScreenDialog};
use screengen_core::tree::{DirHandle, ProjectTree, WritableTree};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use tui_tree_widget::Tree;

use crate::UiExit;
use crate::keymap;
use crate::preview::{preview_items, preview_state};
use crate::theme;
use crate::ui::checkbox::checkbox_line;
use crate::ui::modal::{ModalKind, render_modal};
use crate::ui::text::{
    fitting_hint, focus_line, key_hint_height, key_hint_paragraph, label_value_line,
    wrapped_paragraph,
};

const CHECKBOX_LABEL: &str = "Also create test class";

pub(crate) struct DialogScreen {
    dialog: ScreenDialog,
    name_input: Input,
    focus: FocusTarget,
}

impl DialogScreen {
    pub(crate) fn new<T: ProjectTree + ?Sized>(
        app: &App<'_>,
        tree: &T,
        screen_dir: DirHandle,
    ) -> Self {
        let mut dialog = ScreenDialog::new(screen_dir);
        dialog.revalidate(app, tree);
        Self {
            dialog,
            name_input: Input::default(),
            focus: FocusTarget::Name,
        }
    }

    pub(crate) fn on_key(
        &mut self,
        key: KeyEvent,
        app: &App<'_>,
        tree: &mut dyn WritableTree,
    ) -> Option<UiExit> {
        match self.dialog.state() {
            DialogState::Done(result) => {
                if keymap::is_confirm(key) || keymap::is_back(key) {
                    return Some(UiExit::Created(result.clone()));
                }
                return None;
            }
            DialogState::Failed(_) => {
                if keymap::is_confirm(key) || keymap::is_back(key) {
                    self.dialog.reset_after_failure(app, &*tree);
                    self.focus = FocusTarget::Name;
                }
                return None;
            }
            DialogState::Editing | DialogState::Validating | DialogState::Committing => {}
        }

        if keymap::is_back(key) {
            return Some(UiExit::Canceled);
        }

        if keymap::is_focus_switch(key) {
            self.focus = match self.focus {
                FocusTarget::Name => FocusTarget::CreateTest,
                FocusTarget::CreateTest => FocusTarget::Name,
            };
            return None;
        }

        if keymap::is_confirm(key) {
            self.dialog.confirm(app, tree);
            if let Some(issue) = self.dialog.issue() {
                self.focus = issue.focus;
            }
            return None;
        }

        match self.focus {
            FocusTarget::CreateTest => {
                if keymap::is_toggle(key) {
                    self.dialog.toggle_create_test(app, &*tree);
                }
            }
            FocusTarget::Name => {
                if self.name_input.handle_event(&Event::Key(key)).is_some()
                    && self.name_input.value() != self.dialog.input()
                {
                    let value = self.name_input.value().to_string();
                    self.dialog.set_input(app, &*tree, value);
                }
            }
        }

        None
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        let area = frame.area();
        let key_text = fitting_hint(
            area.width,
            &[
                "Enter: create    Tab: switch focus    Space: toggle test class    Esc/Ctrl-C: cancel",
                "Enter create | Tab focus | Space toggle | Esc cancel",
            ],
        );
        let footer_height = key_hint_height(area.width, key_text);
        let [header, name, checkbox, message, preview, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let header_text = Text::from(vec![
            focus_line("Create a screen class"),
            label_value_line("Directory", self.dialog.screen_dir().to_string()),
        ]);
        frame.render_widget(
            wrapped_paragraph(header_text).block(theme::chrome("screengen")),
            header,
        );

        self.render_name(frame, name);

        let checkbox_widget = Paragraph::new(checkbox_line(
            CHECKBOX_LABEL,
            self.dialog.create_test(),
            self.focus == FocusTarget::CreateTest,
        ))
        .block(theme::focused_chrome(
            "Options",
            self.focus == FocusTarget::CreateTest,
        ));
        frame.render_widget(checkbox_widget, checkbox);

        frame.render_widget(
            wrapped_paragraph(self.message_text()).block(theme::chrome("Validation")),
            message,
        );

        self.render_preview(frame, preview);

        frame.render_widget(
            key_hint_paragraph(key_text).block(theme::key_block()),
            footer,
        );

        match self.dialog.state() {
            DialogState::Done(result) => {
                let mut message = String::from("Created:\n");
                message.push_str(&format!("{}\n", result.screen_path.display()));
                if let Some(test_path) = &result.test_path {
                    message.push_str(&format!("{}\n", test_path.display()));
                }
                render_modal(frame, ModalKind::Success, &message, "Enter/Esc: close");
            }
            DialogState::Failed(error) => {
                let message = format!("Generation failed.\n\n{error}");
                render_modal(frame, ModalKind::Error, &message, "Enter/Esc: back to editing");
            }
            DialogState::Editing | DialogState::Validating | DialogState::Committing => {}
        }
    }

    fn render_name(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == FocusTarget::Name;
        frame.render_widget(theme::focused_chrome("Screen name", focused), area);

        let inner = area.inner(Margin {
            vertical: 1,
            horizontal: 1,
        });
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        let scroll = self.name_input.visual_scroll(width);
        let input = Paragraph::new(self.name_input.value()).scroll((0, scroll as u16));
        frame.render_widget(input, inner);

        if focused && matches!(self.dialog.state(), DialogState::Editing) {
            let visual = self.name_input.visual_cursor();
            let relative = visual.saturating_sub(scroll).min(width.saturating_sub(1));
            frame.set_cursor_position((inner.x + relative as u16, inner.y));
        }
    }

    fn message_text(&self) -> Text<'static> {
        if let Some(issue) = self.dialog.issue() {
            return Text::from(Line::from(Span::styled(
                issue.message.clone(),
                theme::error_prompt(),
            )));
        }

        let Some(plan) = self.dialog.plan() else {
            return Text::from("");
        };

        let mut lines = vec![Line::from(Span::styled(
            format!(
                "Ready: {} and {}",
                plan.names.screen_class(),
                if plan.test.is_some() {
                    plan.names.test_class()
                } else {
                    "no test class"
                }
            ),
            theme::success_prompt(),
        ))];
        lines.extend(
            plan.warnings
                .iter()
                .map(|warning| Line::from(Span::styled(warning.clone(), theme::warning_prompt()))),
        );
        Text::from(lines)
    }

    fn render_preview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = theme::chrome("Files to generate");
        let Some(plan) = self.dialog.plan() else {
            frame.render_widget(
                wrapped_paragraph("Nothing to generate until the name is valid.")
                    .style(theme::secondary_text())
                    .block(block),
                area,
            );
            return;
        };

        let items = match preview_items(plan) {
            Ok(items) => items,
            Err(error) => {
                frame.render_widget(
                    wrapped_paragraph(format!("Preview unavailable: {error}")).block(block),
                    area,
                );
                return;
            }
        };

        let mut state = preview_state(&items);
        match Tree::new(&items) {
            Ok(tree) => {
                let tree = tree.block(block).highlight_style(theme::tree_highlight());
                frame.render_stateful_widget(tree, area, &mut state);
            }
            Err(error) => frame.render_widget(
                wrapped_paragraph(format!("Preview unavailable: {error}")).block(block),
                area,
            ),
        }
    }
}
