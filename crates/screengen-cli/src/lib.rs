pub mod cli;
pub mod diagnostics;
pub mod dispatch;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;
use crate::diagnostics::DiagnosticsSession;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let diagnostics = DiagnosticsSession::initialize(cli.diagnostics)?;
    if let Some(path) = diagnostics.path() {
        eprintln!("Diagnostics enabled: {}", path.display());
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    diagnostics.record(format!("cwd={}", cwd.display()));

    let result = dispatch::run_with_deps(cli, &diagnostics, &cwd);
    if let Err(error) = &result {
        diagnostics.record(format!("command failed: {error:#}"));
    }
    result
}
