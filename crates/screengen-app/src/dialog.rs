use screengen_core::collision::ArtifactKind;
use screengen_core::tree::{DirHandle, ProjectTree, WritableTree};

use crate::App;
use crate::error::GenerationError;
use crate::generate::{GenerationResult, ScreenPlan, ScreenRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Name,
    CreateTest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub message: String,
    pub focus: FocusTarget,
}

impl ValidationIssue {
    fn from_error(error: &GenerationError) -> Self {
        let focus = match error {
            GenerationError::Collision(collision) if collision.kind == ArtifactKind::Test => {
                FocusTarget::CreateTest
            }
            GenerationError::Resolution(_) => FocusTarget::CreateTest,
            _ => FocusTarget::Name,
        };

        Self {
            message: error.to_string(),
            focus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Editing,
    Validating,
    Committing,
    Done(GenerationResult),
    Failed(String),
}

/// Name field plus "also create test class" checkbox, validated after every
/// edit and committed at most once per confirmation.
#[derive(Debug, Clone)]
pub struct ScreenDialog {
    screen_dir: DirHandle,
    input: String,
    create_test: bool,
    state: DialogState,
    plan: Option<ScreenPlan>,
    issue: Option<ValidationIssue>,
}

impl ScreenDialog {
    pub fn new(screen_dir: DirHandle) -> Self {
        Self {
            screen_dir,
            input: String::new(),
            create_test: true,
            state: DialogState::Editing,
            plan: None,
            issue: None,
        }
    }

    pub fn screen_dir(&self) -> &DirHandle {
        &self.screen_dir
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn create_test(&self) -> bool {
        self.create_test
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn plan(&self) -> Option<&ScreenPlan> {
        self.plan.as_ref()
    }

    pub fn issue(&self) -> Option<&ValidationIssue> {
        self.issue.as_ref()
    }

    pub fn can_confirm(&self) -> bool {
        self.state == DialogState::Editing && self.issue.is_none() && self.plan.is_some()
    }

    pub fn request(&self) -> ScreenRequest {
        ScreenRequest {
            screen_dir: self.screen_dir.clone(),
            raw_name: self.input.clone(),
            create_test: self.create_test,
        }
    }

    pub fn set_input<T: ProjectTree + ?Sized>(
        &mut self,
        app: &App<'_>,
        tree: &T,
        value: impl Into<String>,
    ) {
        if self.state != DialogState::Editing {
            return;
        }
        self.input = value.into();
        self.revalidate(app, tree);
    }

    pub fn set_create_test<T: ProjectTree + ?Sized>(
        &mut self,
        app: &App<'_>,
        tree: &T,
        create_test: bool,
    ) {
        if self.state != DialogState::Editing {
            return;
        }
        self.create_test = create_test;
        self.revalidate(app, tree);
    }

    pub fn toggle_create_test<T: ProjectTree + ?Sized>(&mut self, app: &App<'_>, tree: &T) {
        let create_test = !self.create_test;
        self.set_create_test(app, tree, create_test);
    }

    /// Read-only; leaves the dialog in `Editing`.
    pub fn revalidate<T: ProjectTree + ?Sized>(&mut self, app: &App<'_>, tree: &T) {
        self.state = DialogState::Validating;
        match app.validate_screen(tree, &self.request()) {
            Ok(plan) => {
                self.plan = Some(plan);
                self.issue = None;
            }
            Err(error) => {
                self.plan = None;
                self.issue = Some(ValidationIssue::from_error(&error));
            }
        }
        self.state = DialogState::Editing;
    }

    /// Validates against the current tree and commits when clean.
    pub fn confirm(&mut self, app: &App<'_>, tree: &mut dyn WritableTree) -> &DialogState {
        if self.state != DialogState::Editing {
            return &self.state;
        }

        self.revalidate(app, &*tree);
        if self.issue.is_some() {
            return &self.state;
        }

        self.state = DialogState::Committing;
        self.state = match app.generate_screen(tree, &self.request()) {
            Ok(result) => DialogState::Done(result),
            Err(error) => DialogState::Failed(error.to_string()),
        };
        &self.state
    }

    /// Returns to editing after a failed commit, re-checking the tree that
    /// the failed attempt may have changed.
    pub fn reset_after_failure<T: ProjectTree + ?Sized>(&mut self, app: &App<'_>, tree: &T) {
        if !matches!(self.state, DialogState::Failed(_)) {
            return;
        }
        self.state = DialogState::Editing;
        self.revalidate(app, tree);
    }
}

#[cfg(test)]
mod tests {
    use screengen_core::config::ScreengenConfig;
    use screengen_core::memory_tree::MemoryTree;
    use screengen_core::template::TemplateSet;

    use super::*;
    use crate::NoDiagnostics;

    fn app(templates: &TemplateSet) -> App<'_> {
        App::new(templates, &NoDiagnostics, ScreengenConfig::default())
            .with_user("qa")
            .with_date("2026-03-04")
    }

    #[test]
    fn new_dialog_creates_test_by_default_and_cannot_confirm_before_validation() {
        let dialog = ScreenDialog::new(DirHandle::new("/project"));
        assert!(dialog.create_test());
        assert_eq!(dialog.state(), &DialogState::Editing);
        assert!(!dialog.can_confirm());
    }

    #[test]
    fn every_edit_revalidates_without_touching_the_tree() {
        let templates = TemplateSet::builtin();
        let app = app(&templates);
        let tree = MemoryTree::with_content_root("/project");
        let before = tree.clone();
        let mut dialog = ScreenDialog::new(DirHandle::new("/project"));

        dialog.set_input(&app, &tree, "");
        assert_eq!(
            dialog.issue().map(|issue| issue.message.as_str()),
            Some("Please enter a screen name.")
        );

        dialog.set_input(&app, &tree, "login");
        assert!(dialog.issue().is_none());
        assert!(dialog.can_confirm());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_collision_moves_focus_to_checkbox_and_clears_when_unchecked() {
        let templates = TemplateSet::builtin();
        let app = app(&templates);
        let tree = MemoryTree::with_content_root("/project")
            .with_file("/project/src/test/java/com/dt/tests/LoginTest.java", "");
        let mut dialog = ScreenDialog::new(DirHandle::new("/project"));

        dialog.set_input(&app, &tree, "login");
        assert_eq!(
            dialog.issue().map(|issue| issue.focus),
            Some(FocusTarget::CreateTest)
        );

        dialog.toggle_create_test(&app, &tree);
        assert!(!dialog.create_test());
        assert!(dialog.issue().is_none());
    }

    #[test]
    fn confirm_commits_once_and_ignores_later_edits() {
        let templates = TemplateSet::builtin();
        let app = app(&templates);
        let mut tree = MemoryTree::with_content_root("/project");
        let mut dialog = ScreenDialog::new(DirHandle::new("/project"));

        dialog.set_input(&app, &tree, "home");
        let state = dialog.confirm(&app, &mut tree).clone();

        let DialogState::Done(result) = state else {
            panic!("expected the commit to finish");
        };
        assert_eq!(
            result.test_path.as_deref(),
            Some(std::path::Path::new(
                "/project/src/test/java/com/dt/tests/HomeTest.java"
            ))
        );

        let files = tree.file_paths().len();
        dialog.set_input(&app, &tree, "other");
        dialog.confirm(&app, &mut tree);
        assert_eq!(dialog.input(), "home");
        assert_eq!(tree.file_paths().len(), files);
    }

    #[test]
    fn failed_commit_can_return_to_editing() {
        let templates = TemplateSet::builtin();
        let app = app(&templates);
        let mut tree = MemoryTree::with_content_root("/project")
            .with_dir("/project/screens")
            .with_locked_dir("/project/screens");
        let mut dialog = ScreenDialog::new(DirHandle::new("/project/screens"));

        dialog.set_input(&app, &tree, "cart");
        assert!(matches!(
            dialog.confirm(&app, &mut tree),
            DialogState::Failed(_)
        ));

        dialog.reset_after_failure(&app, &tree);
        assert_eq!(dialog.state(), &DialogState::Editing);
        assert!(dialog.can_confirm());
    }
}
