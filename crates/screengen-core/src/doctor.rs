use std::fmt;
use std::path::Path;

use crate::config::{
    ConfigSource, PROJECT_CONFIG_FILE, ScreengenConfig, load_effective_config,
    resolve_config_path,
};
use crate::project::discover_project_root;
use crate::resolver::TestRootLocator;
use crate::template::{TemplateId, TemplateSet};
use crate::tree::{FsTree, ProjectTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

const PROJECT_CHECKS: &[&str] = &[
    "project root found",
    "test source root present",
    "test package present",
];

/// Read-only health report for `start_dir`. Nothing on disk is created.
pub fn run_doctor(start_dir: &Path, project_root: Option<&Path>) -> DoctorReport {
    let mut checks = Vec::new();

    match resolve_config_path() {
        Ok(path) if path.is_file() => checks.push(pass_check(
            "user config path resolves",
            format!("found at {}", path.display()),
        )),
        Ok(path) => checks.push(pass_check(
            "user config path resolves",
            format!("not present, would be read from {}", path.display()),
        )),
        Err(error) => checks.push(fail_check("user config path resolves", error.to_string())),
    }

    let (root, discovered) = match project_root {
        Some(root) => (root.to_path_buf(), true),
        None => {
            let mut markers = ScreengenConfig::default().layout.project_markers;
            markers.push(PROJECT_CONFIG_FILE.to_string());
            match discover_project_root(start_dir, &markers) {
                Some(root) => (root, true),
                None => (start_dir.to_path_buf(), false),
            }
        }
    };

    let config = match load_effective_config(Some(&root)) {
        Ok((config, source)) => {
            checks.push(pass_check(
                "config parses and validates",
                describe_source(&source),
            ));
            config
        }
        Err(error) => {
            checks.push(fail_check("config parses and validates", error.to_string()));
            checks.push(skipped_check("templates readable", "config is invalid"));
            push_skipped_checks(&mut checks, PROJECT_CHECKS, "config is invalid");
            return DoctorReport { checks };
        }
    };

    checks.push(check_templates(&TemplateSet::for_project(&config.templates, &root)));

    checks.push(if discovered {
        pass_check("project root found", root.display().to_string())
    } else {
        fail_check(
            "project root found",
            format!(
                "no project marker above {}, using it as the root",
                start_dir.display()
            ),
        )
    });

    let tree = FsTree::new(&root, &config.layout);
    if tree.content_roots().is_empty() {
        push_skipped_checks(
            &mut checks,
            &PROJECT_CHECKS[1..],
            "project root is not a directory",
        );
        return DoctorReport { checks };
    }

    let locator = TestRootLocator::new(&tree, &config.layout);
    let Some(test_root) = locator.find_test_root() else {
        checks.push(fail_check(
            "test source root present",
            format!(
                "missing, will be created at {}",
                root.join(&config.layout.test_root).display()
            ),
        ));
        checks.push(skipped_check(
            "test package present",
            "test source root is missing",
        ));
        return DoctorReport { checks };
    };
    checks.push(pass_check("test source root present", test_root.to_string()));

    let package = config.layout.test_package_segments();
    checks.push(match locator.find_package_dir(&test_root, &package) {
        Some(dir) => pass_check("test package present", dir.to_string()),
        None => fail_check(
            "test package present",
            format!(
                "missing, {} will be created on first generation",
                config.layout.test_package_name()
            ),
        ),
    });

    DoctorReport { checks }
}

fn describe_source(source: &ConfigSource) -> String {
    format!("using {}", source.describe())
}

fn check_templates(templates: &TemplateSet) -> DoctorCheck {
    let mut sources = Vec::new();
    for id in TemplateId::ALL {
        if let Err(error) = templates.source(id) {
            return fail_check("templates readable", error.to_string());
        }
        sources.push(format!("{id}: {}", templates.describe_source(id)));
    }
    pass_check("templates readable", sources.join(", "))
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn skipped_check(name: &str, reason: &str) -> DoctorCheck {
    fail_check(name, format!("skipped because {reason}"))
}

fn push_skipped_checks(checks: &mut Vec<DoctorCheck>, names: &[&str], reason: &str) {
    checks.extend(
        names
            .iter()
            .copied()
            .map(|name| skipped_check(name, reason)),
    );
}
