use std::path::PathBuf;

use screengen_core::collision::{
    TestTarget, check_screen_collision, inspect_test_target, test_collision,
};
use screengen_core::names::{ClassNames, lower_first_char};
use screengen_core::project::{package_declaration, package_name_for};
use screengen_core::resolver::{ResolutionError, TestRootBuilder};
use screengen_core::template::{Substitutions, TemplateId, materialize};
use screengen_core::transaction::{JournalEntry, WriteTransaction, run_write_transaction};
use screengen_core::tree::{DirHandle, ProjectTree, WritableTree};

use crate::App;
use crate::error::GenerationError;

pub const COMMIT_LABEL: &str = "Create screen";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenRequest {
    pub screen_dir: DirHandle,
    pub raw_name: String,
    pub create_test: bool,
}

/// Outcome of a successful validation pass. Nothing has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenPlan {
    pub names: ClassNames,
    pub screen_dir: DirHandle,
    pub screen_file_name: String,
    pub screen_path: PathBuf,
    /// `None` when the screen directory is outside every source root.
    pub screen_package: Option<String>,
    pub test: Option<TestPlan>,
    /// Non-blocking notes, e.g. directories that the commit will create.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    pub file_name: String,
    pub target: TestTarget,
    /// Where the file lands once missing directories are created.
    pub planned_path: PathBuf,
}

impl TestPlan {
    pub fn creates_directories(&self) -> bool {
        !matches!(self.target, TestTarget::Ready { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub names: ClassNames,
    pub screen_path: PathBuf,
    pub test_path: Option<PathBuf>,
    pub label: String,
    pub journal: Vec<JournalEntry>,
}

impl GenerationResult {
    pub fn created_dirs(&self) -> impl Iterator<Item = &PathBuf> {
        self.journal.iter().filter_map(|entry| match entry {
            JournalEntry::CreatedDir(path) => Some(path),
            JournalEntry::WroteFile(_) => None,
        })
    }
}

impl<'a> App<'a> {
    /// Full validation without side effects. Safe to run on every keystroke.
    pub fn validate_screen<T: ProjectTree + ?Sized>(
        &self,
        tree: &T,
        request: &ScreenRequest,
    ) -> Result<ScreenPlan, GenerationError> {
        let result = self.plan_screen(tree, request);
        match &result {
            Ok(plan) => self.record(format!(
                "validation ok: name={:?} screen={} test={}",
                request.raw_name,
                plan.screen_path.display(),
                plan.test
                    .as_ref()
                    .map(|test| test.planned_path.display().to_string())
                    .unwrap_or_else(|| "none".to_string())
            )),
            Err(error) => self.record(format!(
                "validation failed: name={:?} error={error}",
                request.raw_name
            )),
        }
        result
    }

    /// Re-validates, then writes the screen file and, when requested, the test
    /// file inside one write transaction.
    pub fn generate_screen(
        &self,
        tree: &mut dyn WritableTree,
        request: &ScreenRequest,
    ) -> Result<GenerationResult, GenerationError> {
        self.record(format!("transaction begin: {COMMIT_LABEL}"));

        let committed = run_write_transaction(tree, COMMIT_LABEL, |transaction| {
            self.commit(transaction, request)
        });

        let committed = match committed {
            Ok(committed) => committed,
            Err(aborted) => {
                self.record_journal(&aborted.journal);
                self.record(format!("transaction aborted: {}", aborted.error));
                return Err(aborted.error);
            }
        };

        self.record_journal(&committed.journal);
        self.record(format!("transaction end: {}", committed.label));

        let (names, screen_path, test_path) = committed.value;
        Ok(GenerationResult {
            names,
            screen_path,
            test_path,
            label: committed.label,
            journal: committed.journal,
        })
    }

    fn record_journal(&self, journal: &[JournalEntry]) {
        for entry in journal {
            match entry {
                JournalEntry::CreatedDir(path) => {
                    self.record(format!("created directory {}", path.display()))
                }
                JournalEntry::WroteFile(path) => {
                    self.record(format!("wrote file {}", path.display()))
                }
            }
        }
    }

    fn plan_screen<T: ProjectTree + ?Sized>(
        &self,
        tree: &T,
        request: &ScreenRequest,
    ) -> Result<ScreenPlan, GenerationError> {
        let layout = &self.config.layout;
        let names = ClassNames::derive(&request.raw_name, &self.config.naming)?;

        let screen_file_name = names.screen_file_name(&layout.file_extension);
        if let Some(collision) = check_screen_collision(tree, &request.screen_dir, &screen_file_name)
        {
            return Err(GenerationError::Collision(collision));
        }

        let mut warnings = Vec::new();
        let screen_package = package_name_for(tree, layout, &request.screen_dir);
        if screen_package.is_none() {
            warnings.push(format!(
                "{} is not inside a source root; {} is generated without a package declaration.",
                request.screen_dir,
                names.screen_class()
            ));
        }

        let test = if request.create_test {
            let file_name = names.test_file_name(&layout.file_extension);
            let target = inspect_test_target(tree, layout, &file_name);
            let planned_path = match &target {
                TestTarget::Collides(collision) => {
                    return Err(GenerationError::Collision(collision.clone()));
                }
                TestTarget::Ready { package_dir } => package_dir.file_path(&file_name),
                TestTarget::PackageMissing { test_root } => {
                    warnings.push(format!(
                        "Test package {} will be created under {test_root}.",
                        layout.test_package_name()
                    ));
                    let package_dir = join_segments(
                        test_root.path().to_path_buf(),
                        &layout.test_package_segments(),
                    );
                    package_dir.join(&file_name)
                }
                TestTarget::TestRootMissing => {
                    let content_root = tree.content_roots().into_iter().next().ok_or_else(|| {
                        ResolutionError::NoContentRoot {
                            test_root: layout.test_root.clone(),
                        }
                    })?;
                    let test_root = join_segments(
                        content_root.path().to_path_buf(),
                        &layout.test_root_segments(),
                    );
                    warnings.push(format!(
                        "Test source root not found; it will be created at {}.",
                        test_root.display()
                    ));
                    join_segments(test_root, &layout.test_package_segments()).join(&file_name)
                }
            };

            if screen_package.as_deref() == Some("") && !layout.test_package_name().is_empty() {
                warnings.push(format!(
                    "{} is in the default package and cannot be imported by {}.",
                    names.screen_class(),
                    names.test_class()
                ));
            }

            Some(TestPlan {
                file_name,
                target,
                planned_path,
            })
        } else {
            None
        };

        Ok(ScreenPlan {
            screen_path: request.screen_dir.file_path(&screen_file_name),
            screen_dir: request.screen_dir.clone(),
            screen_file_name,
            screen_package,
            names,
            test,
            warnings,
        })
    }

    fn commit(
        &self,
        transaction: &mut WriteTransaction<'_>,
        request: &ScreenRequest,
    ) -> Result<(ClassNames, PathBuf, Option<PathBuf>), GenerationError> {
        let plan = self.plan_screen(transaction.tree(), request)?;

        let substitutions = self.screen_substitutions(&plan);
        let screen_path = materialize(
            transaction,
            self.templates,
            TemplateId::Screen,
            &plan.screen_file_name,
            &substitutions,
            &plan.screen_dir,
        )?;

        let test_path = match &plan.test {
            Some(test) => Some(self.write_test(transaction, &plan, test).map_err(|source| {
                GenerationError::Partial {
                    screen: screen_path.clone(),
                    source: Box::new(source),
                }
            })?),
            None => None,
        };

        Ok((plan.names, screen_path, test_path))
    }

    fn write_test(
        &self,
        transaction: &mut WriteTransaction<'_>,
        plan: &ScreenPlan,
        test: &TestPlan,
    ) -> Result<PathBuf, GenerationError> {
        let layout = &self.config.layout;
        let package = layout.test_package_segments();

        let package_dir = {
            let mut builder = TestRootBuilder::new(transaction, layout);
            let test_root = builder.get_or_create_test_root()?;
            builder.ensure_package_dir(&test_root, &package)?
        };

        if transaction.file_exists(&package_dir, &test.file_name) {
            return Err(GenerationError::Collision(test_collision(
                &package_dir,
                &package,
                &test.file_name,
            )));
        }

        let test_package = package_name_for(transaction.tree(), layout, &package_dir)
            .unwrap_or_else(|| layout.test_package_name());
        let substitutions = self.test_substitutions(plan, &test_package);

        Ok(materialize(
            transaction,
            self.templates,
            TemplateId::Test,
            &test.file_name,
            &substitutions,
            &package_dir,
        )?)
    }

    pub fn screen_substitutions(&self, plan: &ScreenPlan) -> Substitutions {
        let package = plan.screen_package.clone().unwrap_or_default();
        let mut substitutions = self.common_substitutions(plan, &package);
        substitutions.insert("CLASS_NAME".into(), plan.names.screen_class().to_string());
        substitutions
    }

    pub fn test_substitutions(&self, plan: &ScreenPlan, test_package: &str) -> Substitutions {
        let mut substitutions = self.common_substitutions(plan, test_package);
        substitutions.insert("CLASS_NAME".into(), plan.names.test_class().to_string());
        substitutions.insert("SCREEN_CLASS".into(), plan.names.screen_class().to_string());

        let screen_import = match plan.screen_package.as_deref() {
            Some(screen_package) if !screen_package.is_empty() && screen_package != test_package => {
                format!("import {screen_package}.{};\n\n", plan.names.screen_class())
            }
            _ => String::new(),
        };
        substitutions.insert("SCREEN_IMPORT".into(), screen_import);
        substitutions
    }

    fn common_substitutions(&self, plan: &ScreenPlan, package: &str) -> Substitutions {
        let names = &plan.names;
        Substitutions::from([
            (
                "VARIABLE_NAME".to_string(),
                lower_first_char(names.screen_class()),
            ),
            ("BASE_NAME".to_string(), names.base_name().to_string()),
            (
                "BASE_NAME_LOWER".to_string(),
                lower_first_char(names.base_name()),
            ),
            ("PACKAGE_NAME".to_string(), package.to_string()),
            (
                "PACKAGE_DECLARATION".to_string(),
                package_declaration(package),
            ),
            ("USER".to_string(), self.user.clone()),
            ("DATE".to_string(), self.date.clone()),
        ])
    }
}

fn join_segments(base: PathBuf, segments: &[String]) -> PathBuf {
    segments
        .iter()
        .fold(base, |path, segment| path.join(segment))
}
