use std::cell::RefCell;

use screengen_app::{App, DiagnosticsSink};
use screengen_core::config::ScreengenConfig;
use screengen_core::template::{
    RenderError, Substitutions, TemplateId, TemplateRenderer, TemplateSet,
};

/// Renders the built-in templates and remembers every call.
#[derive(Default)]
pub struct RecordingRenderer {
    inner: TemplateSet,
    calls: RefCell<Vec<(TemplateId, Substitutions)>>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<(TemplateId, Substitutions)> {
        self.calls.borrow().clone()
    }

    #[allow(dead_code)]
    pub fn rendered(&self, id: TemplateId) -> Vec<Substitutions> {
        self.calls
            .borrow()
            .iter()
            .filter(|(called, _)| *called == id)
            .map(|(_, substitutions)| substitutions.clone())
            .collect()
    }
}

impl TemplateRenderer for RecordingRenderer {
    fn render(&self, id: TemplateId, substitutions: &Substitutions) -> Result<String, RenderError> {
        self.calls.borrow_mut().push((id, substitutions.clone()));
        self.inner.render(id, substitutions)
    }
}

#[derive(Default)]
pub struct RecordingDiagnostics {
    entries: RefCell<Vec<String>>,
}

impl RecordingDiagnostics {
    #[allow(dead_code)]
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn record(&self, entry: &str) {
        self.entries.borrow_mut().push(entry.to_string());
    }
}

pub fn app<'a>(renderer: &'a RecordingRenderer, diagnostics: &'a RecordingDiagnostics) -> App<'a> {
    App::new(renderer, diagnostics, ScreengenConfig::default())
        .with_user("qa")
        .with_date("2026-03-04")
}
