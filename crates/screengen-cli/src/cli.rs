use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "screengen")]
#[command(bin_name = "screengen")]
#[command(version)]
#[command(about = "Generate screen classes and their test classes")]
pub struct Cli {
    #[arg(long, global = true, help = "Write a diagnostics log for this run")]
    pub diagnostics: bool,

    #[command(flatten)]
    pub location: LocationArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Create a screen class and, unless --no-test, its test class")]
    New(GenerateArgs),
    #[command(about = "Validate a screen name and print what would be generated")]
    Check(GenerateArgs),
    #[command(about = "Run configuration and project layout checks")]
    Doctor(DoctorArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    #[arg(long, value_name = "DIR", help = "Directory that receives the screen class")]
    pub target: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Project root, instead of searching for one")]
    pub project_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[arg(help = "Screen name, e.g. \"order detail\"")]
    pub name: String,

    #[command(flatten)]
    pub location: LocationArgs,

    #[arg(long, help = "Do not create the test class")]
    pub no_test: bool,
}

#[derive(Debug, Clone, Args)]
pub struct DoctorArgs {
    #[arg(long, value_name = "DIR", help = "Project root, instead of searching for one")]
    pub project_root: Option<PathBuf>,
}
