use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{LayoutConfig, path_segments};

/// Handle to a directory inside a project tree.
///
/// Handles are resolved fresh for every validation pass and again at commit
/// time; holding one does not guarantee the directory still exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirHandle(PathBuf);

impl DirHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.0.join(file_name)
    }

    fn child(&self, name: &str) -> Self {
        Self(self.0.join(name))
    }
}

impl fmt::Display for DirHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("'{name}' is not a single path segment")]
    InvalidName { name: String },
    #[error("{path} already exists and is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("{path} already exists")]
    AlreadyExists { path: PathBuf },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read-only view of a project tree.
pub trait ProjectTree {
    fn content_roots(&self) -> Vec<DirHandle>;

    /// Directories the project already classifies as test source roots.
    fn registered_test_roots(&self) -> Vec<DirHandle>;

    fn child_dir(&self, dir: &DirHandle, name: &str) -> Option<DirHandle>;

    /// Whether a file with exactly this name exists directly inside `dir`.
    fn file_exists(&self, dir: &DirHandle, name: &str) -> bool;
}

/// Mutating operations. Only reachable through a [`crate::transaction::WriteTransaction`].
pub trait WritableTree: ProjectTree {
    fn create_child_dir(&mut self, dir: &DirHandle, name: &str) -> Result<DirHandle, TreeError>;

    fn write_new_file(
        &mut self,
        dir: &DirHandle,
        name: &str,
        contents: &str,
    ) -> Result<PathBuf, TreeError>;
}

pub fn is_single_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).components().count() == 1
}

/// Project tree backed by the local file system.
#[derive(Debug, Clone)]
pub struct FsTree {
    project_root: PathBuf,
    test_roots: Vec<PathBuf>,
}

impl FsTree {
    pub fn new(project_root: impl Into<PathBuf>, layout: &LayoutConfig) -> Self {
        let project_root = project_root.into();
        let test_roots = layout
            .test_roots
            .iter()
            .map(|root| {
                path_segments(root)
                    .iter()
                    .fold(project_root.clone(), |path, segment| path.join(segment))
            })
            .collect();

        Self {
            project_root,
            test_roots,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl ProjectTree for FsTree {
    fn content_roots(&self) -> Vec<DirHandle> {
        if self.project_root.is_dir() {
            vec![DirHandle::new(&self.project_root)]
        } else {
            Vec::new()
        }
    }

    fn registered_test_roots(&self) -> Vec<DirHandle> {
        self.test_roots
            .iter()
            .filter(|path| path.is_dir())
            .map(DirHandle::new)
            .collect()
    }

    fn child_dir(&self, dir: &DirHandle, name: &str) -> Option<DirHandle> {
        if !is_single_segment(name) {
            return None;
        }
        let child = dir.child(name);
        child.path().is_dir().then_some(child)
    }

    fn file_exists(&self, dir: &DirHandle, name: &str) -> bool {
        is_single_segment(name) && dir.file_path(name).is_file()
    }
}

impl WritableTree for FsTree {
    fn create_child_dir(&mut self, dir: &DirHandle, name: &str) -> Result<DirHandle, TreeError> {
        if !is_single_segment(name) {
            return Err(TreeError::InvalidName {
                name: name.to_string(),
            });
        }

        let child = dir.child(name);
        match fs::create_dir(child.path()) {
            Ok(()) => Ok(child),
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                if child.path().is_dir() {
                    Ok(child)
                } else {
                    Err(TreeError::NotADirectory {
                        path: child.path().to_path_buf(),
                    })
                }
            }
            Err(source) => Err(TreeError::CreateDir {
                path: child.path().to_path_buf(),
                source,
            }),
        }
    }

    fn write_new_file(
        &mut self,
        dir: &DirHandle,
        name: &str,
        contents: &str,
    ) -> Result<PathBuf, TreeError> {
        if !is_single_segment(name) {
            return Err(TreeError::InvalidName {
                name: name.to_string(),
            });
        }

        let path = dir.file_path(name);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                return Err(TreeError::AlreadyExists { path });
            }
            Err(source) => return Err(TreeError::Write { path, source }),
        };

        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| TreeError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(root: &Path) -> FsTree {
        FsTree::new(root, &LayoutConfig::default())
    }

    #[test]
    fn single_segment_rejects_separators_and_dots() {
        assert!(is_single_segment("LoginScreen.java"));
        assert!(!is_single_segment(""));
        assert!(!is_single_segment(".."));
        assert!(!is_single_segment("a/b"));
        assert!(!is_single_segment("a\\b"));
    }

    #[test]
    fn child_dir_and_file_exists_do_not_confuse_kinds() {
        let temp = tempfile::tempdir().expect("temp dir");
        fs::create_dir(temp.path().join("src")).expect("src dir");
        fs::write(temp.path().join("README.md"), "hi").expect("readme");

        let tree = tree_for(temp.path());
        let root = DirHandle::new(temp.path());

        assert!(tree.child_dir(&root, "src").is_some());
        assert!(tree.child_dir(&root, "README.md").is_none());
        assert!(tree.file_exists(&root, "README.md"));
        assert!(!tree.file_exists(&root, "src"));
        assert!(!tree.file_exists(&root, "missing.md"));
    }

    #[test]
    fn create_child_dir_is_idempotent_and_rejects_files() {
        let temp = tempfile::tempdir().expect("temp dir");
        fs::write(temp.path().join("blocked"), "").expect("file");

        let mut tree = tree_for(temp.path());
        let root = DirHandle::new(temp.path());

        let first = tree.create_child_dir(&root, "src").expect("create");
        let second = tree.create_child_dir(&root, "src").expect("reuse");
        assert_eq!(first, second);

        let error = tree
            .create_child_dir(&root, "blocked")
            .expect_err("file in the way");
        assert!(matches!(error, TreeError::NotADirectory { .. }));
    }

    #[test]
    fn write_new_file_refuses_to_overwrite() {
        let temp = tempfile::tempdir().expect("temp dir");
        let mut tree = tree_for(temp.path());
        let root = DirHandle::new(temp.path());

        let path = tree
            .write_new_file(&root, "HomeScreen.java", "class HomeScreen {}")
            .expect("write");
        assert_eq!(
            fs::read_to_string(&path).expect("read back"),
            "class HomeScreen {}"
        );

        let error = tree
            .write_new_file(&root, "HomeScreen.java", "other")
            .expect_err("existing file");
        assert!(matches!(error, TreeError::AlreadyExists { .. }));
        assert_eq!(
            fs::read_to_string(&path).expect("read back"),
            "class HomeScreen {}"
        );
    }

    #[test]
    fn registered_test_roots_only_lists_existing_directories() {
        let temp = tempfile::tempdir().expect("temp dir");
        fs::create_dir_all(temp.path().join("app/src/androidTest/java")).expect("test root");

        let layout = LayoutConfig {
            test_roots: vec![
                "app/src/androidTest/java".to_string(),
                "missing/root".to_string(),
            ],
            ..LayoutConfig::default()
        };
        let tree = FsTree::new(temp.path(), &layout);

        assert_eq!(
            tree.registered_test_roots(),
            vec![DirHandle::new(temp.path().join("app/src/androidTest/java"))]
        );
        assert_eq!(tree.content_roots(), vec![DirHandle::new(temp.path())]);
    }
}
