use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::names::{DEFAULT_DIGIT_PREFIX, default_reserved_words, is_identifier};

pub const PROJECT_CONFIG_FILE: &str = "screengen.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScreengenConfig {
    pub version: u32,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
}

impl Default for ScreengenConfig {
    fn default() -> Self {
        Self {
            version: 1,
            naming: NamingConfig::default(),
            layout: LayoutConfig::default(),
            templates: TemplatesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingConfig {
    pub screen_suffix: String,
    pub test_suffix: String,
    pub digit_prefix: String,
    pub max_input_length: usize,
    pub reserved_words: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            screen_suffix: "Screen".to_string(),
            test_suffix: "Test".to_string(),
            digit_prefix: DEFAULT_DIGIT_PREFIX.to_string(),
            max_input_length: 80,
            reserved_words: default_reserved_words(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub file_extension: String,
    pub test_package: String,
    pub test_root: String,
    pub test_roots: Vec<String>,
    pub source_roots: Vec<String>,
    pub project_markers: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            file_extension: "java".to_string(),
            test_package: "com/dt/tests".to_string(),
            test_root: "src/test/java".to_string(),
            test_roots: Vec::new(),
            source_roots: vec!["src/main/java".to_string(), "src/test/java".to_string()],
            project_markers: [
                "settings.gradle.kts",
                "settings.gradle",
                "build.gradle.kts",
                "build.gradle",
                "pom.xml",
                ".git",
            ]
            .iter()
            .map(|marker| (*marker).to_string())
            .collect(),
        }
    }
}

impl LayoutConfig {
    pub fn test_package_segments(&self) -> Vec<String> {
        path_segments(&self.test_package)
    }

    pub fn test_root_segments(&self) -> Vec<String> {
        path_segments(&self.test_root)
    }

    pub fn test_package_name(&self) -> String {
        self.test_package_segments().join(".")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub directory: Option<PathBuf>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Project(PathBuf),
    User(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Project(path) => format!("project config {}", path.display()),
            Self::User(path) => format!("user config {}", path.display()),
            Self::Defaults => "built-in defaults".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

/// Splits a `/`-separated path into its non-blank segments.
pub fn path_segments(value: &str) -> Vec<String> {
    value
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("screengen")
        .join("config.toml"))
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_FILE)
}

pub fn load_config(path: &Path) -> Result<ScreengenConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: ScreengenConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

/// Project config wins over the user config; defaults apply when neither exists.
pub fn load_effective_config(
    project_root: Option<&Path>,
) -> Result<(ScreengenConfig, ConfigSource), ConfigError> {
    if let Some(root) = project_root {
        let path = project_config_path(root);
        if path.is_file() {
            return Ok((load_config(&path)?, ConfigSource::Project(path)));
        }
    }

    let user_path = resolve_config_path()?;
    if user_path.is_file() {
        return Ok((load_config(&user_path)?, ConfigSource::User(user_path)));
    }

    Ok((ScreengenConfig::default(), ConfigSource::Defaults))
}

pub fn validate_config(config: &ScreengenConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(invalid("version must be 1"));
    }

    let naming = &config.naming;
    for (field, suffix) in [
        ("screen_suffix", &naming.screen_suffix),
        ("test_suffix", &naming.test_suffix),
    ] {
        if suffix.is_empty() {
            return Err(invalid(format!("naming.{field} must be non-empty")));
        }
        if !is_identifier(&format!("A{suffix}")) {
            return Err(invalid(format!(
                "naming.{field} '{suffix}' may only contain letters, digits, and underscore"
            )));
        }
    }

    if naming.screen_suffix == naming.test_suffix {
        return Err(invalid(
            "naming.screen_suffix and naming.test_suffix must differ",
        ));
    }

    let mut prefix = naming.digit_prefix.chars();
    match (prefix.next(), prefix.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {}
        _ => {
            return Err(invalid(
                "naming.digit_prefix must be a single ASCII letter",
            ));
        }
    }

    if naming.max_input_length == 0 {
        return Err(invalid("naming.max_input_length must be greater than 0"));
    }

    let layout = &config.layout;
    let extension = layout.file_extension.as_str();
    if extension.is_empty()
        || extension
            .chars()
            .any(|character| matches!(character, '.' | '/' | '\\') || character.is_whitespace())
    {
        return Err(invalid(format!(
            "layout.file_extension '{extension}' must be a bare extension such as \"java\""
        )));
    }

    let package = layout.test_package_segments();
    if package.is_empty() {
        return Err(invalid("layout.test_package must contain at least one segment"));
    }
    if let Some(segment) = package.iter().find(|segment| !is_identifier(segment)) {
        return Err(invalid(format!(
            "layout.test_package segment '{segment}' is not a valid package name"
        )));
    }

    if layout.test_root_segments().is_empty() {
        return Err(invalid("layout.test_root must contain at least one segment"));
    }

    for (index, root) in layout.test_roots.iter().enumerate() {
        if path_segments(root).is_empty() {
            return Err(invalid(format!("layout.test_roots[{index}] must be non-empty")));
        }
    }

    if let Some(author) = &config.templates.author
        && author.trim().is_empty()
    {
        return Err(invalid("templates.author must be non-empty when set"));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_config_from_toml(raw: &str) -> Result<ScreengenConfig, ConfigError> {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        fs::write(file.path(), raw).expect("write temp config");
        load_config(file.path())
    }

    #[test]
    fn accepts_minimal_config_with_defaults() {
        let config = load_config_from_toml("version = 1\n").expect("valid config");
        assert_eq!(config, ScreengenConfig::default());
        assert_eq!(config.layout.test_package_segments(), ["com", "dt", "tests"]);
        assert_eq!(config.layout.test_root_segments(), ["src", "test", "java"]);
    }

    #[test]
    fn accepts_partial_overrides() {
        let raw = r#"
version = 1

[naming]
screen_suffix = "Page"

[layout]
file_extension = "kt"
test_package = "org/acme/ui"
test_roots = ["app/src/androidTest/java"]

[templates]
author = "qa-team"
"#;

        let config = load_config_from_toml(raw).expect("valid config");
        assert_eq!(config.naming.screen_suffix, "Page");
        assert_eq!(config.naming.test_suffix, "Test");
        assert_eq!(config.layout.file_extension, "kt");
        assert_eq!(config.layout.test_package_name(), "org.acme.ui");
        assert_eq!(config.layout.test_root, "src/test/java");
        assert_eq!(config.templates.author.as_deref(), Some("qa-team"));
    }

    #[test]
    fn rejects_unknown_version() {
        let error = load_config_from_toml("version = 2\n").expect_err("config should fail");
        assert!(error.to_string().contains("version must be 1"));
    }

    #[test]
    fn rejects_suffix_with_symbols() {
        let raw = r#"
version = 1

[naming]
test_suffix = "Te-st"
"#;
        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(error.to_string().contains("naming.test_suffix"));
    }

    #[test]
    fn rejects_identical_suffixes() {
        let raw = r#"
version = 1

[naming]
screen_suffix = "Test"
"#;
        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(error.to_string().contains("must differ"));
    }

    #[test]
    fn rejects_multi_letter_digit_prefix() {
        let raw = r#"
version = 1

[naming]
digit_prefix = "Sc"
"#;
        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(error.to_string().contains("single ASCII letter"));
    }

    #[test]
    fn rejects_dotted_extension() {
        let raw = r#"
version = 1

[layout]
file_extension = ".java"
"#;
        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(error.to_string().contains("bare extension"));
    }

    #[test]
    fn rejects_package_segment_that_is_not_an_identifier() {
        let raw = r#"
version = 1

[layout]
test_package = "com/1dt/tests"
"#;
        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(error.to_string().contains("'1dt'"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let error = load_config_from_toml("version = ").expect_err("config should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn project_config_takes_precedence() {
        let temp = tempfile::tempdir().expect("temp dir");
        fs::write(
            project_config_path(temp.path()),
            "version = 1\n[layout]\nfile_extension = \"kt\"\n",
        )
        .expect("write project config");

        let (config, source) = load_effective_config(Some(temp.path())).expect("config");
        assert_eq!(config.layout.file_extension, "kt");
        assert_eq!(
            source,
            ConfigSource::Project(temp.path().join(PROJECT_CONFIG_FILE))
        );
    }

    #[test]
    fn path_segments_drops_blank_parts() {
        assert_eq!(path_segments("/com//dt/tests/"), ["com", "dt", "tests"]);
        assert!(path_segments(" / ").is_empty());
    }
}
