use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use screengen_app::ScreenPlan;
use tui_tree_widget::{TreeItem, TreeState};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedFile {
    name: String,
    role: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedDir {
    is_new: bool,
    files: Vec<PlannedFile>,
}

/// Directories holding the files `plan` would write, keyed by path.
fn planned_dirs(plan: &ScreenPlan) -> BTreeMap<PathBuf, PlannedDir> {
    let mut dirs: BTreeMap<PathBuf, PlannedDir> = BTreeMap::new();
    dirs.entry(plan.screen_dir.path().to_path_buf())
        .or_insert_with(|| PlannedDir {
            is_new: false,
            files: Vec::new(),
        })
        .files
        .push(PlannedFile {
            name: plan.screen_file_name.clone(),
            role: "screen",
        });

    if let Some(test) = &plan.test {
        let parent = test
            .planned_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .to_path_buf();
        let dir = dirs.entry(parent).or_insert_with(|| PlannedDir {
            is_new: test.creates_directories(),
            files: Vec::new(),
        });
        dir.files.push(PlannedFile {
            name: test.file_name.clone(),
            role: "test",
        });
    }

    dirs
}

pub(crate) fn preview_items(plan: &ScreenPlan) -> io::Result<Vec<TreeItem<'static, String>>> {
    planned_dirs(plan)
        .into_iter()
        .map(|(path, dir)| {
            let id = path.display().to_string();
            let label = if dir.is_new {
                format!("{id} (new)")
            } else {
                id.clone()
            };
            let children = dir
                .files
                .iter()
                .map(|file| {
                    TreeItem::new_leaf(
                        format!("{id}/{}", file.name),
                        format!("{}  [{}]", file.name, file.role),
                    )
                })
                .collect();
            TreeItem::new(id, label, children)
        })
        .collect()
}

pub(crate) fn preview_state(items: &[TreeItem<'static, String>]) -> TreeState<String> {
    let mut state = TreeState::default();
    for item in items {
        state.open(vec![item.identifier().clone()]);
    }
    state
}
