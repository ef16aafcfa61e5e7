//! Message contract catalog CLI.
//!
//! Provides the `msgmap` binary with subcommands for working with workspace
//! snapshots. `scan` produces the offline catalog file; `report` posts every
//! discovered contract to a catalog server, the way the live analyzer does.
//!
//! Both subcommands consume the same snapshot format, ensuring identical
//! discovery behavior from both entry points.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use msgmap_scan::{
    scan, CatalogEntry, ContractReporter, LiveAnalyzer, MarkerVocabulary, ReporterConfig,
    ScanOptions, Workspace,
};

/// Message contract catalog tools.
#[derive(Parser)]
#[command(name = "msgmap", about = "Message contract catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan a workspace snapshot into a catalog file.
    Scan {
        /// Path to the workspace snapshot exported by the host frontend.
        #[arg(short, long)]
        source: PathBuf,

        /// Output path for the catalog file.
        #[arg(short, long, default_value = "mmm.json")]
        destination: PathBuf,
    },
    /// Report every discovered contract to a catalog server.
    Report {
        /// Path to the workspace snapshot exported by the host frontend.
        #[arg(short, long)]
        source: PathBuf,

        /// Ingest base URL. Defaults to MSGMAP_BASE_URL, or the local
        /// catalog server when unset.
        #[arg(short, long)]
        base_url: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Scan {
            source,
            destination,
        } => run_scan(&source, &destination),
        Commands::Report { source, base_url } => run_report(&source, base_url.as_deref()),
    };
    process::exit(exit_code);
}

/// Execute the scan subcommand.
///
/// Returns exit code: 0 = success, 1 = scan failure, 3 = I/O or snapshot
/// error. The catalog file is written atomically: on any failure the
/// destination is left untouched.
fn run_scan(source: &Path, destination: &Path) -> i32 {
    let workspace = match Workspace::load(source) {
        Ok(ws) => ws,
        Err(e) => {
            report_error("failed to load workspace snapshot", &e);
            return 3;
        }
    };

    let catalog = match scan(&workspace, &ScanOptions::default()) {
        Ok(catalog) => catalog,
        Err(e) => {
            report_error("scan failed", &e);
            return 1;
        }
    };

    match write_catalog(&catalog, destination) {
        Ok(()) => {
            println!(
                "wrote {} contract(s) to {}",
                catalog.len(),
                destination.display()
            );
            0
        }
        Err(e) => {
            report_error("failed to write catalog", &e);
            3
        }
    }
}

/// Execute the report subcommand: the live path, driven over a snapshot.
///
/// Returns exit code: 0 = success, 1 = scan failure, 3 = snapshot error.
/// Transport failures are best-effort and logged, not exit-code material.
fn run_report(source: &Path, base_url: Option<&str>) -> i32 {
    let workspace = match Workspace::load(source) {
        Ok(ws) => ws,
        Err(e) => {
            report_error("failed to load workspace snapshot", &e);
            return 3;
        }
    };

    let config = match base_url {
        Some(url) => ReporterConfig::for_base_url(url),
        None => ReporterConfig::from_env(),
    };
    let analyzer = LiveAnalyzer::new(MarkerVocabulary::default(), ContractReporter::new(config));

    let mut reported = 0;
    for project in &workspace.projects {
        for unit in &project.units {
            match analyzer.analyze_unit(project, unit) {
                Ok(count) => reported += count,
                Err(e) => {
                    report_error("report run failed", &e);
                    return 1;
                }
            }
        }
    }
    println!("reported {} contract(s)", reported);
    0
}

/// Serializes the catalog (unindented JSON array) and writes it atomically:
/// temp file in the destination directory, then rename over the target.
fn write_catalog(catalog: &[CatalogEntry], destination: &Path) -> Result<(), std::io::Error> {
    let json = serde_json::to_vec(catalog)?;
    let dir = destination.parent().filter(|p| !p.as_os_str().is_empty());
    let mut file = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
    file.write_all(&json)?;
    file.persist(destination).map_err(|e| e.error)?;
    Ok(())
}

/// Prints the failure and its full source chain to stderr.
fn report_error(context: &str, error: &dyn std::error::Error) {
    eprintln!("Error: {}: {}", context, error);
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("Caused by: {}", cause);
        source = cause.source();
    }
}
