use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use screengen_app::{
    App, DiagnosticsSink, ScreenPlan, ScreenRequest, load_workspace, templates_for,
};
use screengen_core::doctor::{CheckState, DoctorReport, run_doctor};
use screengen_core::tree::{DirHandle, FsTree};
use screengen_tui::UiExit;

use crate::cli::{Cli, Command, DoctorArgs, GenerateArgs, LocationArgs};

pub fn run_with_deps(cli: Cli, diagnostics: &dyn DiagnosticsSink, cwd: &Path) -> Result<()> {
    match cli.command {
        Some(Command::New(args)) => run_new_command(&args, diagnostics, cwd),
        Some(Command::Check(args)) => run_check_command(&args, diagnostics, cwd),
        Some(Command::Doctor(args)) => run_doctor_command(&args, diagnostics, cwd),
        None => run_root_command(&cli.location, diagnostics, cwd),
    }
}

fn run_root_command(
    location: &LocationArgs,
    diagnostics: &dyn DiagnosticsSink,
    cwd: &Path,
) -> Result<()> {
    let target = resolve_target(location, cwd)?;
    let workspace = load_workspace(&target, location.project_root.as_deref())?;
    diagnostics.record(&format!(
        "project root {} ({})",
        workspace.project_root.display(),
        workspace.config_source.describe()
    ));

    let templates = templates_for(&workspace);
    let app = App::new(&templates, diagnostics, workspace.config.clone());
    let mut tree = FsTree::new(&workspace.project_root, &workspace.config.layout);

    match screengen_tui::run_dialog(&app, &mut tree, DirHandle::new(&target))? {
        UiExit::Created(result) => {
            println!("Created {}", result.screen_path.display());
            if let Some(test_path) = &result.test_path {
                println!("Created {}", test_path.display());
            }
        }
        UiExit::Canceled => diagnostics.record("dialog canceled"),
    }

    Ok(())
}

fn run_new_command(
    args: &GenerateArgs,
    diagnostics: &dyn DiagnosticsSink,
    cwd: &Path,
) -> Result<()> {
    let target = resolve_target(&args.location, cwd)?;
    let workspace = load_workspace(&target, args.location.project_root.as_deref())?;
    let templates = templates_for(&workspace);
    let app = App::new(&templates, diagnostics, workspace.config.clone());
    let mut tree = FsTree::new(&workspace.project_root, &workspace.config.layout);
    let request = request_for(args, &target);

    if let Ok(plan) = app.validate_screen(&tree, &request) {
        for warning in &plan.warnings {
            eprintln!("warning: {warning}");
        }
    }

    let result = app.generate_screen(&mut tree, &request)?;
    println!("Created {}", result.screen_path.display());
    if let Some(test_path) = &result.test_path {
        println!("Created {}", test_path.display());
    }
    Ok(())
}

fn run_check_command(
    args: &GenerateArgs,
    diagnostics: &dyn DiagnosticsSink,
    cwd: &Path,
) -> Result<()> {
    let target = resolve_target(&args.location, cwd)?;
    let workspace = load_workspace(&target, args.location.project_root.as_deref())?;
    let templates = templates_for(&workspace);
    let app = App::new(&templates, diagnostics, workspace.config.clone());
    let tree = FsTree::new(&workspace.project_root, &workspace.config.layout);

    let plan = app.validate_screen(&tree, &request_for(args, &target))?;
    print_plan(&plan);
    Ok(())
}

fn run_doctor_command(
    args: &DoctorArgs,
    diagnostics: &dyn DiagnosticsSink,
    cwd: &Path,
) -> Result<()> {
    let report = run_doctor(cwd, args.project_root.as_deref());
    diagnostics.record(&format!("doctor: {}", report.summary()));
    print_doctor_report(&report);
    Ok(())
}

fn resolve_target(location: &LocationArgs, cwd: &Path) -> Result<PathBuf> {
    let target = match &location.target {
        Some(target) if target.is_absolute() => target.clone(),
        Some(target) => cwd.join(target),
        None => cwd.to_path_buf(),
    };

    if !target.is_dir() {
        bail!("target directory {} does not exist", target.display());
    }
    Ok(target)
}

fn request_for(args: &GenerateArgs, target: &Path) -> ScreenRequest {
    ScreenRequest {
        screen_dir: DirHandle::new(target),
        raw_name: args.name.clone(),
        create_test: !args.no_test,
    }
}

fn print_plan(plan: &ScreenPlan) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Artifact", "Class", "Path"]);
    table.add_row(vec![
        Cell::new("screen"),
        Cell::new(plan.names.screen_class()),
        Cell::new(plan.screen_path.display().to_string()),
    ]);

    if let Some(test) = &plan.test {
        let path = if test.creates_directories() {
            format!("{} (creates directories)", test.planned_path.display())
        } else {
            test.planned_path.display().to_string()
        };
        table.add_row(vec![
            Cell::new("test"),
            Cell::new(plan.names.test_class()),
            Cell::new(path),
        ]);
    }

    println!("{table}");
    for warning in &plan.warnings {
        println!("warning: {warning}");
    }
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        let status = Cell::new(check.state);
        let status = match check.state {
            CheckState::Pass => status,
            CheckState::Fail => status.fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(check.name.as_str()),
            status,
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}
