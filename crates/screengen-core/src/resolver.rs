use std::path::PathBuf;

use thiserror::Error;

use crate::config::LayoutConfig;
use crate::transaction::WriteTransaction;
use crate::tree::{DirHandle, ProjectTree, TreeError};

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Cannot find test source root ({test_root}): the project has no content root.")]
    NoContentRoot { test_root: String },
    #[error("Cannot create {path}: {source}")]
    CannotCreate {
        path: PathBuf,
        #[source]
        source: TreeError,
    },
}

/// Read-only lookups. Safe to call on every validation pass.
pub struct TestRootLocator<'a, T: ProjectTree + ?Sized> {
    tree: &'a T,
    layout: &'a LayoutConfig,
}

impl<'a, T: ProjectTree + ?Sized> TestRootLocator<'a, T> {
    pub fn new(tree: &'a T, layout: &'a LayoutConfig) -> Self {
        Self { tree, layout }
    }

    /// A registered test root first, then the conventional path under the
    /// first content root. Never creates anything.
    pub fn find_test_root(&self) -> Option<DirHandle> {
        locate_test_root(self.tree, self.layout)
    }

    pub fn find_package_dir(&self, root: &DirHandle, path: &[String]) -> Option<DirHandle> {
        find_dir_path(self.tree, root, path)
    }
}

/// Creating counterpart of [`TestRootLocator`]; only exists inside a write transaction.
pub struct TestRootBuilder<'tx, 't> {
    transaction: &'tx mut WriteTransaction<'t>,
    layout: &'tx LayoutConfig,
}

impl<'tx, 't> TestRootBuilder<'tx, 't> {
    pub fn new(transaction: &'tx mut WriteTransaction<'t>, layout: &'tx LayoutConfig) -> Self {
        Self {
            transaction,
            layout,
        }
    }

    pub fn get_or_create_test_root(&mut self) -> Result<DirHandle, ResolutionError> {
        if let Some(registered) = self.transaction.tree().registered_test_roots().into_iter().next()
        {
            return Ok(registered);
        }

        let content_root = self
            .transaction
            .tree()
            .content_roots()
            .into_iter()
            .next()
            .ok_or_else(|| ResolutionError::NoContentRoot {
                test_root: self.layout.test_root.clone(),
            })?;

        let segments = self.layout.test_root_segments();
        self.ensure_package_dir(&content_root, &segments)
    }

    /// Walks `path` under `root`, creating each missing segment in order.
    pub fn ensure_package_dir(
        &mut self,
        root: &DirHandle,
        path: &[String],
    ) -> Result<DirHandle, ResolutionError> {
        let mut current = root.clone();
        for segment in path {
            current = self
                .transaction
                .find_or_create_dir(&current, segment)
                .map_err(|source| ResolutionError::CannotCreate {
                    path: current.path().join(segment),
                    source,
                })?;
        }
        Ok(current)
    }
}

pub fn locate_test_root<T: ProjectTree + ?Sized>(
    tree: &T,
    layout: &LayoutConfig,
) -> Option<DirHandle> {
    if let Some(registered) = tree.registered_test_roots().into_iter().next() {
        return Some(registered);
    }

    let content_root = tree.content_roots().into_iter().next()?;
    find_dir_path(tree, &content_root, &layout.test_root_segments())
}

/// Returns `None` as soon as one segment is missing.
pub fn find_dir_path<T: ProjectTree + ?Sized>(
    tree: &T,
    root: &DirHandle,
    path: &[String],
) -> Option<DirHandle> {
    let mut current = root.clone();
    for segment in path {
        current = tree.child_dir(&current, segment)?;
    }
    Some(current)
}
