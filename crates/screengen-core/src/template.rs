use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::config::TemplatesConfig;
use crate::transaction::WriteTransaction;
use crate::tree::{DirHandle, TreeError, is_single_segment};

const BUILTIN_SCREEN: &str = include_str!("../templates/screen.java.tmpl");
const BUILTIN_TEST: &str = include_str!("../templates/test.java.tmpl");

pub type Substitutions = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Screen,
    Test,
}

impl TemplateId {
    pub const ALL: [TemplateId; 2] = [TemplateId::Screen, TemplateId::Test];

    /// File name looked up inside a template override directory.
    pub fn override_file_name(self) -> &'static str {
        match self {
            Self::Screen => "screen.tmpl",
            Self::Test => "test.tmpl",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            Self::Screen => BUILTIN_SCREEN,
            Self::Test => BUILTIN_TEST,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Screen => write!(f, "screen"),
            Self::Test => write!(f, "test"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("'{file_name}' is not a valid file name")]
    IllegalFileName { file_name: String },
    #[error("failed to read {template} template at {path}: {source}")]
    ReadTemplate {
        template: TemplateId,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Write(#[from] TreeError),
}

pub trait TemplateRenderer {
    fn render(&self, id: TemplateId, substitutions: &Substitutions) -> Result<String, RenderError>;
}

/// Built-in templates, optionally overridden per template from a directory.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    directory: Option<PathBuf>,
}

impl TemplateSet {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
        }
    }

    /// Template set for a project; a relative directory is resolved against
    /// `project_root`.
    pub fn for_project(config: &TemplatesConfig, project_root: &Path) -> Self {
        match &config.directory {
            Some(directory) if directory.is_relative() => {
                Self::with_directory(project_root.join(directory))
            }
            Some(directory) => Self::with_directory(directory),
            None => Self::builtin(),
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn override_path(&self, id: TemplateId) -> Option<PathBuf> {
        self.directory
            .as_ref()
            .map(|directory| directory.join(id.override_file_name()))
            .filter(|path| path.is_file())
    }

    pub fn describe_source(&self, id: TemplateId) -> String {
        match self.override_path(id) {
            Some(path) => path.display().to_string(),
            None => format!("built-in {id} template"),
        }
    }

    pub fn source(&self, id: TemplateId) -> Result<Cow<'static, str>, RenderError> {
        let Some(path) = self.override_path(id) else {
            return Ok(Cow::Borrowed(id.builtin()));
        };

        fs::read_to_string(&path)
            .map(Cow::Owned)
            .map_err(|source| RenderError::ReadTemplate {
                template: id,
                path,
                source,
            })
    }
}

impl TemplateRenderer for TemplateSet {
    fn render(&self, id: TemplateId, substitutions: &Substitutions) -> Result<String, RenderError> {
        let source = self.source(id)?;
        Ok(fill_placeholders(&source, substitutions))
    }
}

/// Replaces `${KEY}` placeholders. Unknown keys are left as written.
pub fn fill_placeholders(text: &str, substitutions: &Substitutions) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER
        .get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

    placeholder
        .replace_all(text, |caps: &regex::Captures<'_>| {
            substitutions
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn validate_file_name(file_name: &str) -> Result<(), RenderError> {
    let illegal = !is_single_segment(file_name)
        || file_name.ends_with(['.', ' '])
        || file_name
            .chars()
            .any(|character| character.is_control() || "<>:\"|?*".contains(character));

    if illegal {
        return Err(RenderError::IllegalFileName {
            file_name: file_name.to_string(),
        });
    }
    Ok(())
}

/// Renders `id` and writes it as a new file `file_name` inside `dir`.
pub fn materialize(
    transaction: &mut WriteTransaction<'_>,
    renderer: &dyn TemplateRenderer,
    id: TemplateId,
    file_name: &str,
    substitutions: &Substitutions,
    dir: &DirHandle,
) -> Result<PathBuf, RenderError> {
    validate_file_name(file_name)?;
    let contents = renderer.render(id, substitutions)?;
    Ok(transaction.write_new_file(dir, file_name, &contents)?)
}
