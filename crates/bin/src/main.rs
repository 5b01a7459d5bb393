//! Rollover CLI binary.
//!
//! Runs the futures rollover pipeline stage by stage or end to end.

mod config;
mod pipeline;

use clap::{Parser, Subcommand};
use config::{PathArgs, Period, PipelineConfig};
use pipeline::PipelineError;
use rollover::{NseSector, SectorClassifier, SectorMap};
use rollover_output::{ExportFormat, Exporter, RunSummary, StageSummary};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollover")]
#[command(about = "Rollover: NSE futures rollover analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Average rollover metrics over the latest month's futures files
    Monthly,

    /// Average rollover metrics over the trailing window
    SixMonth,

    /// Extract EQ spot closes from a cash-market bhavcopy
    Spot {
        /// Which month's bhavcopy to read
        #[arg(long, value_enum, default_value_t = Period::Current)]
        period: Period,
    },

    /// Reconcile metric and spot tables into one row per symbol
    Merge,

    /// Tag reconciled rows with sectors and write the sectioned layout
    Layout,

    /// Run every stage in order
    Run {
        /// Also write the run summary as JSON
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },

    /// List sectors with their symbol counts
    Sectors {
        /// Look up the sector of one symbol instead
        #[arg(long)]
        symbol: Option<String>,
    },
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();
}

fn run() -> Result<(), PipelineError> {
    let cli = Cli::parse();
    let config = PipelineConfig::from_args(&cli.paths);

    match cli.command {
        Commands::Monthly => print_stage(&pipeline::window::monthly(&config)?),
        Commands::SixMonth => print_stage(&pipeline::window::six_month(&config)?),
        Commands::Spot { period } => print_stage(&pipeline::spot::spot(&config, period)?),
        Commands::Merge => print_stage(&pipeline::merge::merge(&config)?),
        Commands::Layout => print_stage(&pipeline::layout::layout(&config)?),
        Commands::Run { summary_json } => {
            let summary = run_all(&config)?;
            println!("\n{summary}");
            if let Some(path) = summary_json {
                summary.export_to_file(&path, ExportFormat::PrettyJson)?;
                println!("Summary written to {}", path.display());
            }
        }
        Commands::Sectors { symbol } => list_sectors(&config, symbol.as_deref())?,
    }

    Ok(())
}

/// Every stage in dependency order, stopping at the first failure.
fn run_all(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    let mut summary = RunSummary::default();

    summary.push(pipeline::window::monthly(config)?);
    summary.push(pipeline::window::six_month(config)?);
    summary.push(pipeline::spot::spot(config, Period::Current)?);
    if config.include_previous {
        summary.push(pipeline::spot::spot(config, Period::Previous)?);
    }
    summary.push(pipeline::merge::merge(config)?);
    summary.push(pipeline::layout::layout(config)?);

    Ok(summary)
}

fn print_stage(summary: &StageSummary) {
    println!("\n{summary}");
}

fn list_sectors(config: &PipelineConfig, symbol: Option<&str>) -> Result<(), PipelineError> {
    let map = pipeline::layout::sector_map(config)?;

    if let Some(symbol) = symbol {
        println!("{}: {}", symbol.trim().to_uppercase(), map.classify(symbol));
        return Ok(());
    }

    if config.sector_file.is_some() {
        print_counts("Sectors", &map);
        return Ok(());
    }

    println!("NSE Sectors:");
    println!("============\n");
    for sector in NseSector::all() {
        println!("{:<14} {:>4}", sector.name(), sector.symbols().len());
    }
    println!("\nTotal symbols: {}", map.len());
    Ok(())
}

fn print_counts(title: &str, map: &SectorMap) {
    println!("{title}:");
    println!("{}\n", "=".repeat(title.len() + 1));
    for (sector, count) in map.sector_counts() {
        println!("{sector:<14} {count:>4}");
    }
    println!("\nTotal symbols: {}", map.len());
}
