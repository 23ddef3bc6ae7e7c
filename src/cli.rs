use anyhow::{Context as _, Result};
use chunkguard::chunking::{ChunkPlan, ChunkSizeReport};
use chunkguard::config::{self, GuardSettings};
use chunkguard::dataset::Dataset;
use chunkguard::utils::fmt_bytes;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "chunkguard",
    version,
    about = "Warn about chunk plans whose chunks would use too much memory"
)]
pub struct Cli {
    /// Settings file. Defaults to <config dir>/chunkguard/config.json
    #[arg(long, global = true, env = "CHUNKGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn settings_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config::get_config_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate per-chunk memory for every data variable and warn about oversized chunks
    Check {
        /// Dataset descriptor (JSON with "dimensions" and "data_vars")
        #[arg(short, long)]
        dataset: PathBuf,

        /// Chunk plan as dim=length pairs, e.g. time=24,x=512,y=512
        #[arg(short, long, required_unless_present = "chunks_file")]
        chunks: Option<ChunkPlan>,

        /// Chunk plan as a JSON object file, e.g. {"time": 24}
        #[arg(long, conflicts_with = "chunks")]
        chunks_file: Option<PathBuf>,

        /// Warning threshold in bytes. Overrides CHUNKGUARD_MAX_CHUNK_BYTES and the settings file
        #[arg(long)]
        max_chunk_bytes: Option<u64>,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective settings as JSON
    Show,
    /// Store a new default warning threshold in bytes
    SetMaxChunkBytes { bytes: u64 },
    /// Store a directory for log files; omit to disable file logging
    SetLogDir { dir: Option<PathBuf> },
}

pub fn run_command(command: Commands, settings_path: &Path, settings: GuardSettings) -> Result<()> {
    match command {
        Commands::Check {
            dataset,
            chunks,
            chunks_file,
            max_chunk_bytes,
            json,
        } => handle_check(&dataset, chunks, chunks_file, max_chunk_bytes, json, &settings),
        Commands::Config { action } => handle_config(action, settings_path, settings),
    }
}

fn handle_check(
    dataset_path: &Path,
    chunks: Option<ChunkPlan>,
    chunks_file: Option<PathBuf>,
    max_chunk_bytes: Option<u64>,
    json: bool,
    settings: &GuardSettings,
) -> Result<()> {
    let dataset = Dataset::from_file(dataset_path)?;
    let plan = match (chunks, chunks_file) {
        (Some(plan), _) => plan,
        (None, Some(path)) => ChunkPlan::from_file(&path)?,
        (None, None) => anyhow::bail!("Either --chunks or --chunks-file is required"),
    };

    let checker = settings.checker(max_chunk_bytes);
    tracing::info!(
        dataset = %dataset_path.display(),
        plan = %plan,
        threshold_bytes = checker.max_chunk_bytes(),
        "Checking chunk sizes"
    );

    let report = checker
        .check(&dataset, &plan)
        .with_context(|| format!("Chunk size check failed for {}", dataset_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

fn handle_config(action: ConfigAction, path: &Path, mut settings: GuardSettings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            println!(
                "effective max_chunk_bytes: {}",
                settings.effective_max_chunk_bytes(None)
            );
            return Ok(());
        }
        ConfigAction::SetMaxChunkBytes { bytes } => {
            anyhow::ensure!(bytes > 0, "max_chunk_bytes must be greater than zero");
            settings.max_chunk_bytes = bytes;
        }
        ConfigAction::SetLogDir { dir } => settings.log_dir = dir,
    }

    config::save_config_to(&settings, path)?;
    println!("Settings saved to {}", path.display());
    Ok(())
}

/// Plain-text table of a report, one row per variable.
pub fn render_report(report: &ChunkSizeReport) -> String {
    let name_width = report
        .estimates
        .iter()
        .map(|e| e.variable.len())
        .chain(std::iter::once("variable".len()))
        .max()
        .unwrap_or_default();

    let header = format!(
        "{:<name_width$}  {:<12}  {:>10}  {:>14}  status",
        "variable", "dtype", "bytes/elem", "chunk size"
    );
    let rows = report.estimates.iter().map(|e| {
        let status = if e.exceeds { "OVER LIMIT" } else { "ok" };
        format!(
            "{:<name_width$}  {:<12}  {:>10}  {:>14}  {status}",
            e.variable,
            e.dtype.name(),
            e.bytes_per_element,
            fmt_bytes(e.chunk_bytes),
        )
    });
    let summary = format!(
        "{} element(s) per chunk, limit {} ({} over)",
        report.elements_per_chunk,
        fmt_bytes(report.threshold_bytes),
        report.oversized().count()
    );

    std::iter::once(header)
        .chain(rows)
        .chain(std::iter::once(summary))
        .map(|line| line + "\n")
        .collect()
}
