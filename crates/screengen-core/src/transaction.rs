use std::path::PathBuf;

use crate::tree::{DirHandle, ProjectTree, TreeError, WritableTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    CreatedDir(PathBuf),
    WroteFile(PathBuf),
}

/// Exclusive write access to a tree for the duration of one commit.
///
/// Directory creation and file writes are only possible through this type,
/// so nothing on the validation path can mutate the tree.
pub struct WriteTransaction<'t> {
    tree: &'t mut dyn WritableTree,
    label: String,
    journal: Vec<JournalEntry>,
}

impl<'t> WriteTransaction<'t> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tree(&self) -> &dyn WritableTree {
        &*self.tree
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn child_dir(&self, dir: &DirHandle, name: &str) -> Option<DirHandle> {
        self.tree.child_dir(dir, name)
    }

    pub fn file_exists(&self, dir: &DirHandle, name: &str) -> bool {
        self.tree.file_exists(dir, name)
    }

    /// Returns the existing child or creates it.
    pub fn find_or_create_dir(
        &mut self,
        dir: &DirHandle,
        name: &str,
    ) -> Result<DirHandle, TreeError> {
        if let Some(existing) = self.tree.child_dir(dir, name) {
            return Ok(existing);
        }

        let created = self.tree.create_child_dir(dir, name)?;
        self.journal
            .push(JournalEntry::CreatedDir(created.path().to_path_buf()));
        Ok(created)
    }

    pub fn write_new_file(
        &mut self,
        dir: &DirHandle,
        name: &str,
        contents: &str,
    ) -> Result<PathBuf, TreeError> {
        let path = self.tree.write_new_file(dir, name, contents)?;
        self.journal.push(JournalEntry::WroteFile(path.clone()));
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<R> {
    pub value: R,
    pub label: String,
    pub journal: Vec<JournalEntry>,
}

/// A body error together with the changes that were kept before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aborted<E> {
    pub error: E,
    pub label: String,
    pub journal: Vec<JournalEntry>,
}

/// Runs `body` with exclusive write access to `tree`.
///
/// An error from `body` aborts the transaction. Changes made before the error
/// are kept and listed in the returned journal.
pub fn run_write_transaction<R, E, F>(
    tree: &mut dyn WritableTree,
    label: &str,
    body: F,
) -> Result<Committed<R>, Aborted<E>>
where
    F: FnOnce(&mut WriteTransaction<'_>) -> Result<R, E>,
{
    let mut transaction = WriteTransaction {
        tree,
        label: label.to_string(),
        journal: Vec::new(),
    };

    match body(&mut transaction) {
        Ok(value) => Ok(Committed {
            value,
            label: transaction.label,
            journal: transaction.journal,
        }),
        Err(error) => Err(Aborted {
            error,
            label: transaction.label,
            journal: transaction.journal,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_tree::MemoryTree;

    #[test]
    fn journal_records_only_new_directories_and_files() {
        let mut tree = MemoryTree::with_content_root("/project").with_dir("/project/src");
        let root = DirHandle::new("/project");

        let committed = run_write_transaction(&mut tree, "Create screen", |tx| {
            let src = tx.find_or_create_dir(&root, "src")?;
            let test = tx.find_or_create_dir(&src, "test")?;
            tx.write_new_file(&test, "A.java", "class A {}")?;
            Ok::<_, TreeError>(test)
        })
        .expect("transaction");

        assert_eq!(committed.label, "Create screen");
        assert_eq!(committed.value, DirHandle::new("/project/src/test"));
        assert_eq!(
            committed.journal,
            vec![
                JournalEntry::CreatedDir(PathBuf::from("/project/src/test")),
                JournalEntry::WroteFile(PathBuf::from("/project/src/test/A.java")),
            ]
        );
    }

    #[test]
    fn body_error_aborts_without_undoing_earlier_writes() {
        let mut tree = MemoryTree::with_content_root("/project");
        let root = DirHandle::new("/project");

        let aborted = run_write_transaction(&mut tree, "Create screen", |tx| {
            let dir = tx.find_or_create_dir(&root, "screens")?;
            tx.write_new_file(&dir, "A.java", "")?;
            tx.write_new_file(&dir, "A.java", "")?;
            Ok::<_, TreeError>(())
        })
        .expect_err("second write collides");

        assert!(matches!(aborted.error, TreeError::AlreadyExists { .. }));
        assert_eq!(aborted.label, "Create screen");
        assert_eq!(
            aborted.journal,
            vec![
                JournalEntry::CreatedDir(PathBuf::from("/project/screens")),
                JournalEntry::WroteFile(PathBuf::from("/project/screens/A.java")),
            ]
        );
        assert_eq!(tree.file_contents("/project/screens/A.java"), Some(""));
    }
}
