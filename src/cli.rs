use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "inspection-audit",
    version,
    about = "Verifies inspection-item conclusions in extracted medical-device test reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit an extracted report and write the findings.
    Check(CheckArgs),
    /// Print the normalized inspection-item rows of an extracted report.
    Rows(RowsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long)]
    pub input: PathBuf,

    /// Defaults to the input path with an `audit.json` extension.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the report to stdout instead of writing a file.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub fail_on_errors: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RowsArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,
}
