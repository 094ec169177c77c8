use std::path::PathBuf;

use clap::Parser;

use crate::config::pipeline::{load_pipeline_config, CleanupPolicy, PipelineConfig};
use crate::error::Result;

// Define command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON dataset mapping document names to PDF URLs
    #[arg(short, long)]
    pub dataset: PathBuf,

    /// Optional pipeline configuration YAML file. Defaults apply when omitted.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// JSON file backing the document store
    #[arg(short, long, default_value = "pdf_documents.json")]
    pub store: PathBuf,

    /// Worker pool size (overrides the configuration file)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Temp file cleanup policy (overrides the configuration file)
    #[arg(long, value_enum)]
    pub cleanup: Option<CleanupPolicy>,

    /// Directory for downloaded PDFs (overrides the configuration file)
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Optional: write Prometheus metrics in text format to this file after the run
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Optional: also write logs to a daily-rolling file in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Validate the pipeline configuration and exit
    #[arg(long)]
    pub validate_config: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Configuration file (or defaults) with command-line overrides applied, validated.
pub fn load_effective_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => load_pipeline_config(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(workers) = args.workers {
        config.workers = Some(workers);
    }
    if let Some(cleanup) = args.cleanup {
        config.cleanup = cleanup;
    }
    if let Some(temp_dir) = &args.temp_dir {
        config.temp_dir = temp_dir.clone();
    }

    config.validate()?;
    Ok(config)
}
