pub mod dialog;
pub mod error;
pub mod generate;

use std::path::Path;

use anyhow::{Context, Result};
use screengen_core::config::{ScreengenConfig, TemplatesConfig};
use screengen_core::project::{Workspace, open_workspace};
use screengen_core::template::{TemplateRenderer, TemplateSet};
use screengen_core::time::today_utc;

pub use dialog::{DialogState, FocusTarget, ScreenDialog, ValidationIssue};
pub use error::GenerationError;
pub use generate::{GenerationResult, ScreenPlan, ScreenRequest, TestPlan};

/// Receives progress lines from validation and generation.
pub trait DiagnosticsSink {
    fn record(&self, entry: &str);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl DiagnosticsSink for NoDiagnostics {
    fn record(&self, _entry: &str) {}
}

pub struct App<'a> {
    pub templates: &'a dyn TemplateRenderer,
    pub diagnostics: &'a dyn DiagnosticsSink,
    pub config: ScreengenConfig,
    pub user: String,
    pub date: String,
}

impl<'a> App<'a> {
    pub fn new(
        templates: &'a dyn TemplateRenderer,
        diagnostics: &'a dyn DiagnosticsSink,
        config: ScreengenConfig,
    ) -> Self {
        let user = resolve_author(&config.templates);
        Self {
            templates,
            diagnostics,
            config,
            user,
            date: today_utc(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    fn record(&self, entry: impl AsRef<str>) {
        self.diagnostics.record(entry.as_ref());
    }
}

/// Project root and configuration for a target directory.
pub fn load_workspace(target: &Path, project_root: Option<&Path>) -> Result<Workspace> {
    open_workspace(target, project_root).with_context(|| {
        format!(
            "failed to load screengen configuration for {}",
            target.display()
        )
    })
}

/// Template set for `workspace`, anchored at its project root.
pub fn templates_for(workspace: &Workspace) -> TemplateSet {
    TemplateSet::for_project(&workspace.config.templates, &workspace.project_root)
}

/// Configured author, else the login name from the environment.
pub fn resolve_author(templates: &TemplatesConfig) -> String {
    if let Some(author) = &templates.author {
        return author.clone();
    }

    ["USER", "USERNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}
