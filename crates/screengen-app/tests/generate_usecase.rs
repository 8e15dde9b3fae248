mod support;

use std::path::PathBuf;

use screengen_app::{GenerationError, ScreenRequest};
use screengen_core::collision::ArtifactKind;
use screengen_core::memory_tree::MemoryTree;
use screengen_core::template::TemplateId;
use screengen_core::transaction::JournalEntry;
use screengen_core::tree::DirHandle;

use support::{RecordingDiagnostics, RecordingRenderer, app};

const SCREENS: &str = "/project/src/main/java/com/shop/screens";

fn login_request(create_test: bool) -> ScreenRequest {
    ScreenRequest {
        screen_dir: DirHandle::new(SCREENS),
        raw_name: "login".to_string(),
        create_test,
    }
}

#[test]
fn login_end_to_end_creates_screen_test_root_package_and_test() {
    let renderer = RecordingRenderer::default();
    let diagnostics = RecordingDiagnostics::default();
    let app = app(&renderer, &diagnostics);
    let mut tree = MemoryTree::with_content_root("/project").with_dir(SCREENS);

    let result = app
        .generate_screen(&mut tree, &login_request(true))
        .expect("generate");

    assert_eq!(
        result.screen_path,
        PathBuf::from(format!("{SCREENS}/LoginScreen.java"))
    );
    assert_eq!(
        result.test_path,
        Some(PathBuf::from(
            "/project/src/test/java/com/dt/tests/LoginTest.java"
        ))
    );
    assert_eq!(result.label, "Create screen");
    assert_eq!(result.created_dirs().count(), 5);

    let screen = tree
        .file_contents(&result.screen_path)
        .expect("screen written");
    assert!(screen.starts_with("package com.shop.screens;"));
    assert!(screen.contains("public class LoginScreen {"));

    let test = tree
        .file_contents("/project/src/test/java/com/dt/tests/LoginTest.java")
        .expect("test written");
    assert!(test.starts_with("package com.dt.tests;"));
    assert!(test.contains("import com.shop.screens.LoginScreen;"));
    assert!(test.contains("public class LoginTest {"));
    assert!(test.contains("private LoginScreen loginScreen;"));

    let entries = diagnostics.entries();
    assert!(entries.iter().any(|entry| entry == "transaction begin: Create screen"));
    assert!(entries.iter().any(|entry| entry == "transaction end: Create screen"));
}

#[test]
fn existing_screen_aborts_before_any_write() {
    let renderer = RecordingRenderer::default();
    let diagnostics = RecordingDiagnostics::default();
    let app = app(&renderer, &diagnostics);
    let mut tree = MemoryTree::with_content_root("/project")
        .with_file(format!("{SCREENS}/LoginScreen.java"), "// existing");
    let before = tree.clone();

    let error = app
        .generate_screen(&mut tree, &login_request(true))
        .expect_err("collision");

    let collision = error.collision().expect("collision error");
    assert_eq!(collision.kind, ArtifactKind::Screen);
    assert_eq!(error.to_string(), "File already exists: LoginScreen.java");
    assert_eq!(tree, before);
    assert!(renderer.calls().is_empty());
}

#[test]
fn without_test_only_the_screen_is_written() {
    let renderer = RecordingRenderer::default();
    let diagnostics = RecordingDiagnostics::default();
    let app = app(&renderer, &diagnostics);
    let mut tree = MemoryTree::with_content_root("/project").with_dir(SCREENS);

    let result = app
        .generate_screen(&mut tree, &login_request(false))
        .expect("generate");

    assert_eq!(result.test_path, None);
    assert_eq!(
        result.journal,
        vec![JournalEntry::WroteFile(result.screen_path.clone())]
    );
    assert!(!tree.contains_dir("/project/src/test"));
    assert_eq!(renderer.rendered(TemplateId::Test).len(), 0);
}

#[test]
fn locked_test_root_keeps_screen_and_reports_partial() {
    let renderer = RecordingRenderer::default();
    let diagnostics = RecordingDiagnostics::default();
    let app = app(&renderer, &diagnostics);
    let mut tree = MemoryTree::with_content_root("/project")
        .with_dir(SCREENS)
        .with_dir("/project/src/test/java")
        .with_locked_dir("/project/src/test/java");

    let error = app
        .generate_screen(&mut tree, &login_request(true))
        .expect_err("partial");

    let GenerationError::Partial { screen, source } = &error else {
        panic!("expected a partial failure, got {error}");
    };
    assert_eq!(screen, &PathBuf::from(format!("{SCREENS}/LoginScreen.java")));
    assert!(matches!(**source, GenerationError::Resolution(_)));
    assert!(tree.file_contents(screen).is_some());
    assert!(!tree.contains_dir("/project/src/test/java/com"));

    let entries = diagnostics.entries();
    let wrote = format!("wrote file {SCREENS}/LoginScreen.java");
    let wrote_at = entries
        .iter()
        .position(|entry| entry == &wrote)
        .expect("kept screen file is logged");
    let aborted_at = entries
        .iter()
        .position(|entry| entry.starts_with("transaction aborted: "))
        .expect("abort is logged");
    assert!(wrote_at < aborted_at);
    assert!(!entries.iter().any(|entry| entry.starts_with("transaction end")));
}

#[test]
fn test_collision_is_reported_at_validation_and_blocks_commit() {
    let renderer = RecordingRenderer::default();
    let diagnostics = RecordingDiagnostics::default();
    let app = app(&renderer, &diagnostics);
    let mut tree = MemoryTree::with_content_root("/project")
        .with_dir(SCREENS)
        .with_file("/project/src/test/java/com/dt/tests/LoginTest.java", "");

    let error = app
        .validate_screen(&tree, &login_request(true))
        .expect_err("test collision");
    assert_eq!(
        error.to_string(),
        "Test file already exists: com/dt/tests/LoginTest.java"
    );

    let error = app
        .generate_screen(&mut tree, &login_request(true))
        .expect_err("test collision at commit");
    assert!(!error.is_partial());
    assert!(
        tree.file_contents(format!("{SCREENS}/LoginScreen.java"))
            .is_none()
    );
}

#[test]
fn validation_has_no_side_effects_even_when_directories_are_missing() {
    let renderer = RecordingRenderer::default();
    let diagnostics = RecordingDiagnostics::default();
    let app = app(&renderer, &diagnostics);
    let tree = MemoryTree::with_content_root("/project").with_dir(SCREENS);
    let before = tree.clone();

    for name in ["login", "  order   detail ", "123abc", ""] {
        let mut request = login_request(true);
        request.raw_name = name.to_string();
        let _ = app.validate_screen(&tree, &request);
    }

    assert_eq!(tree, before);
    assert!(renderer.calls().is_empty());
}

#[test]
fn invalid_and_empty_names_never_reach_the_tree() {
    let renderer = RecordingRenderer::default();
    let diagnostics = RecordingDiagnostics::default();
    let app = app(&renderer, &diagnostics);
    let mut tree = MemoryTree::with_content_root("/project").with_dir(SCREENS);
    let before = tree.clone();

    for name in ["màn hình", "   ", "!!!"] {
        let mut request = login_request(true);
        request.raw_name = name.to_string();
        let error = app
            .generate_screen(&mut tree, &request)
            .expect_err("input error");
        assert!(matches!(error, GenerationError::Input(_)), "{name:?}");
    }

    assert_eq!(tree, before);
    assert!(
        diagnostics
            .entries()
            .iter()
            .all(|entry| !entry.starts_with("wrote file"))
    );
}
