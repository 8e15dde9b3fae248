use std::fmt;
use std::path::PathBuf;

use crate::config::LayoutConfig;
use crate::resolver::TestRootLocator;
use crate::tree::{DirHandle, ProjectTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Screen,
    Test,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Screen => write!(f, "Screen"),
            Self::Test => write!(f, "Test"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    /// Name as shown to the user, e.g. `com/dt/tests/LoginTest.java`.
    pub display_name: String,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ArtifactKind::Screen => write!(f, "File already exists: {}", self.display_name),
            ArtifactKind::Test => write!(f, "Test file already exists: {}", self.display_name),
        }
    }
}

/// Where the test file would go, as seen without touching the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestTarget {
    Ready { package_dir: DirHandle },
    PackageMissing { test_root: DirHandle },
    TestRootMissing,
    Collides(Collision),
}

impl TestTarget {
    pub fn collision(&self) -> Option<&Collision> {
        match self {
            Self::Collides(collision) => Some(collision),
            _ => None,
        }
    }
}

pub fn file_collides<T: ProjectTree + ?Sized>(tree: &T, dir: &DirHandle, file_name: &str) -> bool {
    tree.file_exists(dir, file_name)
}

pub fn check_screen_collision<T: ProjectTree + ?Sized>(
    tree: &T,
    screen_dir: &DirHandle,
    file_name: &str,
) -> Option<Collision> {
    file_collides(tree, screen_dir, file_name).then(|| Collision {
        kind: ArtifactKind::Screen,
        path: screen_dir.file_path(file_name),
        display_name: file_name.to_string(),
    })
}

/// A missing package directory is not a collision; it is created at commit.
pub fn inspect_test_target<T: ProjectTree + ?Sized>(
    tree: &T,
    layout: &LayoutConfig,
    file_name: &str,
) -> TestTarget {
    let locator = TestRootLocator::new(tree, layout);
    let Some(test_root) = locator.find_test_root() else {
        return TestTarget::TestRootMissing;
    };

    let package = layout.test_package_segments();
    let Some(package_dir) = locator.find_package_dir(&test_root, &package) else {
        return TestTarget::PackageMissing { test_root };
    };

    if file_collides(tree, &package_dir, file_name) {
        return TestTarget::Collides(test_collision(&package_dir, &package, file_name));
    }

    TestTarget::Ready { package_dir }
}

pub fn test_collision(package_dir: &DirHandle, package: &[String], file_name: &str) -> Collision {
    let mut display_name = package.join("/");
    if !display_name.is_empty() {
        display_name.push('/');
    }
    display_name.push_str(file_name);

    Collision {
        kind: ArtifactKind::Test,
        path: package_dir.file_path(file_name),
        display_name,
    }
}
