use std::path::PathBuf;

use clap::Parser;

/// Applies to job vacancies in timed batches through the application backend.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "applier", version)]
pub struct Cli {
    /// RON configuration file. Defaults to ./applier.ron when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Vacancies submitted per run.
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Minutes between runs.
    #[arg(long)]
    pub interval_minutes: Option<u64>,

    /// Read vacancy URLs from a file (one per line) instead of searching.
    #[arg(long, value_name = "PATH")]
    pub links_file: Option<PathBuf>,

    /// Base URL of the application backend.
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,
}
