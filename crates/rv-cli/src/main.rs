//! Report Verdict CLI

use clap::{Parser, Subcommand};
use rv_core::{CheckRun, CheckSet, Report, Resolved};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "rv-check")]
#[command(about = "Verification checks for sandbox analysis reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a check file against a report
    Check {
        /// Path to the report JSON file
        #[arg(short, long)]
        report: PathBuf,

        /// Path to the check definition file
        #[arg(short, long)]
        checks: PathBuf,

        /// Scratch directory handed to verifiers
        #[arg(short, long, default_value = ".")]
        storage: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Resolve a slash-delimited path against a report
    Resolve {
        /// Path to the report JSON file
        #[arg(short, long)]
        report: PathBuf,

        /// Path to resolve, e.g. behavior/processes/calls
        #[arg(short, long)]
        path: String,
    },

    /// Show report size, fingerprint, and top-level sections
    Info {
        /// Path to the report JSON file
        #[arg(short, long)]
        report: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    match cli.command {
        Commands::Check {
            report,
            checks,
            storage,
            output,
        } => {
            cmd_check(report, checks, storage, output);
        }
        Commands::Resolve { report, path } => {
            cmd_resolve(report, path);
        }
        Commands::Info { report } => {
            cmd_info(report);
        }
    }
}

fn cmd_check(report_path: PathBuf, checks_path: PathBuf, storage: PathBuf, output: String) {
    info!("Checking report: {}", report_path.display());

    if !report_path.exists() {
        error!("Report not found: {}", report_path.display());
        std::process::exit(1);
    }
    if !checks_path.exists() {
        error!("Check file not found: {}", checks_path.display());
        std::process::exit(1);
    }

    let report = load_report(&report_path);
    let checks = match CheckSet::from_file(&checks_path) {
        Ok(checks) => checks,
        Err(e) => {
            error!("Failed to load checks: {}", e);
            std::process::exit(1);
        }
    };

    let run = CheckRun::execute(&checks, &report, &storage);
    info!("Evaluated {} checks", run.verdicts.len());

    match output.to_lowercase().as_str() {
        "json" => {
            let rendered =
                serde_json::to_string_pretty(&run).expect("Failed to serialize run");
            println!("{}", rendered);
        }
        _ => print_run(&run),
    }

    if !run.all_passed() {
        std::process::exit(1);
    }
}

fn print_run(run: &CheckRun) {
    println!("\nCheck Results\n{}", "=".repeat(50));

    for verdict in &run.verdicts {
        println!("\n{}: {}", verdict.name, verdict.outcome);
        println!("  {}", verdict.detail);
    }

    println!("\n{}", "=".repeat(50));
    println!(
        "{} passed, {} failed, {} errors",
        run.passed, run.failed, run.errors
    );
    if run.all_passed() {
        println!("All checks PASSED");
    } else {
        println!("Some checks FAILED");
    }
}

fn cmd_resolve(report_path: PathBuf, path: String) {
    if !report_path.exists() {
        error!("Report not found: {}", report_path.display());
        std::process::exit(1);
    }

    let report = load_report(&report_path);

    match report.resolve(&path) {
        Resolved::Missing => println!("No match for '{}'", path),
        Resolved::Node(value) => {
            println!(
                "{}",
                serde_json::to_string_pretty(value).expect("Failed to serialize value")
            );
        }
        Resolved::Flat(values) => {
            info!("Path flattened across {} values", values.len());
            println!(
                "{}",
                serde_json::to_string_pretty(&values).expect("Failed to serialize values")
            );
        }
    }
}

fn cmd_info(report_path: PathBuf) {
    if !report_path.exists() {
        error!("Report not found: {}", report_path.display());
        std::process::exit(1);
    }

    let report = load_report(&report_path);

    println!("\nReport Information\n{}", "=".repeat(50));
    println!("File: {}", report_path.display());
    println!("Size: {} bytes", report.raw().len());
    println!("SHA-256: {}", report.sha256());

    match report.value() {
        Value::Object(map) => {
            println!("\nTop-level sections:");
            for (name, value) in map {
                println!("  {}: {}", name, describe(value));
            }
        }
        other => println!("Top-level value: {}", describe(other)),
    }
}

fn load_report(path: &Path) -> Report {
    match Report::from_file(path) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to load report: {}", e);
            std::process::exit(1);
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("{} items", items.len()),
        Value::Object(map) => format!("{} entries", map.len()),
        other => other.to_string(),
    }
}
