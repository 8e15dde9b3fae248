use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::tree::{DirHandle, ProjectTree, TreeError, WritableTree, is_single_segment};

/// In-memory project tree for tests and dry runs.
///
/// Paths are plain keys; nothing touches the disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTree {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    content_roots: Vec<PathBuf>,
    test_roots: Vec<PathBuf>,
    locked: BTreeSet<PathBuf>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut tree = Self::new();
        tree.add_dir(&root);
        tree.content_roots.push(root);
        tree
    }

    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.add_dir(path.as_ref());
        self
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, contents: &str) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path.to_path_buf(), contents.to_string());
        self
    }

    pub fn with_test_root(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.add_dir(path);
        self.test_roots.push(path.to_path_buf());
        self
    }

    /// Makes every create/write directly inside `path` fail with a permission error.
    pub fn with_locked_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.locked.insert(path.as_ref().to_path_buf());
        self
    }

    pub fn contains_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.contains(path.as_ref())
    }

    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.keys().cloned().collect()
    }

    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    fn add_dir(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn check_unlocked(&self, dir: &DirHandle, target: &Path) -> Result<(), io::Error> {
        if self.locked.contains(dir.path()) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", target.display()),
            ));
        }
        Ok(())
    }
}

impl ProjectTree for MemoryTree {
    fn content_roots(&self) -> Vec<DirHandle> {
        self.content_roots
            .iter()
            .filter(|root| self.dirs.contains(*root))
            .map(DirHandle::new)
            .collect()
    }

    fn registered_test_roots(&self) -> Vec<DirHandle> {
        self.test_roots
            .iter()
            .filter(|root| self.dirs.contains(*root))
            .map(DirHandle::new)
            .collect()
    }

    fn child_dir(&self, dir: &DirHandle, name: &str) -> Option<DirHandle> {
        if !is_single_segment(name) {
            return None;
        }
        let path = dir.path().join(name);
        self.dirs.contains(&path).then(|| DirHandle::new(path))
    }

    fn file_exists(&self, dir: &DirHandle, name: &str) -> bool {
        is_single_segment(name) && self.files.contains_key(&dir.file_path(name))
    }
}

impl WritableTree for MemoryTree {
    fn create_child_dir(&mut self, dir: &DirHandle, name: &str) -> Result<DirHandle, TreeError> {
        if !is_single_segment(name) {
            return Err(TreeError::InvalidName {
                name: name.to_string(),
            });
        }

        let path = dir.path().join(name);
        if self.dirs.contains(&path) {
            return Ok(DirHandle::new(path));
        }
        if self.files.contains_key(&path) {
            return Err(TreeError::NotADirectory { path });
        }
        self.check_unlocked(dir, &path)
            .map_err(|source| TreeError::CreateDir {
                path: path.clone(),
                source,
            })?;

        self.add_dir(&path);
        Ok(DirHandle::new(path))
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
        if self.files.contains_key(&path) {
            return Err(TreeError::AlreadyExists { path });
        }
        if self.dirs.contains(&path) {
            return Err(TreeError::Write {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::IsADirectory, "a directory has this name"),
            });
        }
        self.check_unlocked(dir, &path)
            .map_err(|source| TreeError::Write {
                path: path.clone(),
                source,
            })?;

        self.files.insert(path.clone(), contents.to_string());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_registers_ancestor_directories() {
        let tree = MemoryTree::with_content_root("/project")
            .with_file("/project/src/test/java/Existing.java", "");

        assert!(tree.contains_dir("/project/src"));
        assert!(tree.contains_dir("/project/src/test/java"));
        assert!(tree.file_exists(
            &DirHandle::new("/project/src/test/java"),
            "Existing.java"
        ));
    }

    #[test]
    fn locked_dir_rejects_children() {
        let mut tree = MemoryTree::with_content_root("/project").with_locked_dir("/project");
        let root = DirHandle::new("/project");

        let error = tree.create_child_dir(&root, "src").expect_err("locked");
        assert!(matches!(error, TreeError::CreateDir { .. }));
        assert!(!tree.contains_dir("/project/src"));

        let error = tree
            .write_new_file(&root, "A.java", "")
            .expect_err("locked");
        assert!(matches!(error, TreeError::Write { .. }));
    }

    #[test]
    fn create_child_dir_fails_when_file_has_the_name() {
        let mut tree = MemoryTree::with_content_root("/project").with_file("/project/src", "");
        let error = tree
            .create_child_dir(&DirHandle::new("/project"), "src")
            .expect_err("file in the way");
        assert!(matches!(error, TreeError::NotADirectory { .. }));
    }

    #[test]
    fn missing_roots_are_not_reported() {
        let tree = MemoryTree::new();
        assert!(tree.content_roots().is_empty());
        assert!(tree.registered_test_roots().is_empty());
    }
}
