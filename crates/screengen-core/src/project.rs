use std::path::{Path, PathBuf};

use crate::config::{
    ConfigError, ConfigSource, LayoutConfig, PROJECT_CONFIG_FILE, ScreengenConfig, load_config,
    load_effective_config, path_segments, project_config_path,
};
use crate::names::is_identifier;
use crate::tree::{DirHandle, ProjectTree};

/// Project root plus the configuration that applies to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub project_root: PathBuf,
    /// False when no project marker was found and `start` was used as the root.
    pub root_discovered: bool,
    pub config: ScreengenConfig,
    pub config_source: ConfigSource,
}

/// Resolves the project root for `start` and loads its configuration.
///
/// Markers come from the user config (or defaults); a `screengen.toml` in the
/// resolved root then replaces it.
pub fn open_workspace(start: &Path, project_root: Option<&Path>) -> Result<Workspace, ConfigError> {
    let (user_config, user_source) = load_effective_config(None)?;

    let (project_root, root_discovered) = match project_root {
        Some(root) => (root.to_path_buf(), true),
        None => {
            let mut markers = user_config.layout.project_markers.clone();
            markers.push(PROJECT_CONFIG_FILE.to_string());
            match discover_project_root(start, &markers) {
                Some(root) => (root, true),
                None => (start.to_path_buf(), false),
            }
        }
    };

    let project_config = project_config_path(&project_root);
    let (config, config_source) = if project_config.is_file() {
        (
            load_config(&project_config)?,
            ConfigSource::Project(project_config),
        )
    } else {
        (user_config, user_source)
    };

    Ok(Workspace {
        project_root,
        root_discovered,
        config,
        config_source,
    })
}

/// Nearest ancestor of `start` (inclusive) holding one of the project markers.
pub fn discover_project_root(start: &Path, markers: &[String]) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| markers.iter().any(|marker| candidate.join(marker).exists()))
        .map(Path::to_path_buf)
}

/// Dotted package name of `dir`, relative to the source root that contains it.
///
/// `Some("")` means the default package; `None` means `dir` is outside every
/// known source root or a segment is not a valid package name.
pub fn package_name_for<T: ProjectTree + ?Sized>(
    tree: &T,
    layout: &LayoutConfig,
    dir: &DirHandle,
) -> Option<String> {
    let mut roots: Vec<PathBuf> = tree
        .registered_test_roots()
        .into_iter()
        .map(|root| root.path().to_path_buf())
        .collect();

    for content_root in tree.content_roots() {
        for source_root in layout.source_roots.iter().chain([&layout.test_root]) {
            let path = path_segments(source_root)
                .iter()
                .fold(content_root.path().to_path_buf(), |path, segment| {
                    path.join(segment)
                });
            roots.push(path);
        }
    }

    // Deepest root wins so nested roots resolve to the shortest package.
    roots.sort_by_key(|root| std::cmp::Reverse(root.components().count()));

    let relative = roots
        .iter()
        .find_map(|root| dir.path().strip_prefix(root).ok())?;

    let mut segments = Vec::new();
    for component in relative.components() {
        let segment = component.as_os_str().to_str()?;
        if !is_identifier(segment) {
            return None;
        }
        segments.push(segment.to_string());
    }

    Some(segments.join("."))
}

pub fn package_declaration(package: &str) -> String {
    if package.is_empty() {
        String::new()
    } else {
        format!("package {package};\n\n")
    }
}
