//! IFC Consolidate CLI - merge disclosed project CSV exports
//!
//! Run from the directory holding `Investment_Services/` and
//! `Advisory_Services/`:
//!
//! ```bash
//! ifc-consolidate IS                       # Investment: consolidated + unique files
//! ifc-consolidate AS                       # Advisory: consolidated file only
//! ifc-consolidate IS --date 2026-10-16     # Fix the date in file names
//! ifc-consolidate IS --summary run.json    # Also write a JSON run summary
//! ```

use clap::Parser;
use ifc_consolidate::logs::{log_error, LOG_SINK};
use ifc_consolidate::{parse_date, run, ConsolidateError, ProjectCategory, RunConfig};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ifc-consolidate")]
#[command(about = "Consolidate CSV files based on a specified IFC project type", long_about = None)]
struct Cli {
    /// Type IS or AS
    #[arg(value_name = "TYPE")]
    project_type: String,

    /// Directory containing <category>_Services (default: current directory)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Output subdirectory name (default: Consolidated_data_set)
    #[arg(long)]
    output_dir: Option<String>,

    /// Date used in output file names, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<String>,

    /// Input decoding: latin1 or auto
    #[arg(long)]
    input_encoding: Option<String>,

    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Process everything but write no CSV files
    #[arg(long)]
    dry_run: bool,

    /// Do not print progress
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOG_SINK.set_quiet(cli.quiet);

    if let Err(e) = execute(cli) {
        log_error(format!("Error: {}", e));
        if matches!(e, ConsolidateError::InvalidArgument(_)) {
            eprintln!("Usage: ifc-consolidate <IS|AS>");
        }
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<(), ConsolidateError> {
    // Validate the category before touching the filesystem
    let category = ProjectCategory::from_code(&cli.project_type)?;
    let config = build_config(category, &cli)?;

    let summary = run(&config)?;

    if let Some(path) = cli.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(&path, json)?;
        eprintln!("Summary written to: {}", path.display());
    }
    Ok(())
}

/// Defaults, then environment, then flags.
fn build_config(category: ProjectCategory, cli: &Cli) -> Result<RunConfig, ConsolidateError> {
    let mut config = RunConfig::new(category).with_env()?;

    if let Some(dir) = &cli.base_dir {
        config.base_dir = dir.clone();
    }
    if let Some(name) = &cli.output_dir {
        config.output_dir_name = name.clone();
    }
    if let Some(date) = &cli.date {
        config.date = parse_date(date)?;
    }
    if let Some(enc) = &cli.input_encoding {
        config.input_encoding = enc.parse()?;
    }
    config.dry_run = cli.dry_run;
    Ok(config)
}
