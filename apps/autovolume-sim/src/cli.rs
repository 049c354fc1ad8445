use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(name = "autovolume-sim")]
#[command(about = "Runs simulated tabs through the volume normalization engine")]
pub struct Cli {
    /// Override the settings file path.
    #[arg(long)]
    pub settings_path: Option<PathBuf>,

    /// Number of simulated tabs with media.
    #[arg(long, default_value_t = 3)]
    pub tabs: u32,

    /// Stop after this many seconds instead of waiting for Ctrl-C.
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Interval at which simulated pages change their own volume.
    #[arg(long, default_value_t = 1500)]
    pub drift_ms: u64,

    /// Set the lower bound of the band before starting.
    #[arg(long)]
    pub min_volume: Option<i32>,

    /// Set the upper bound of the band before starting.
    #[arg(long)]
    pub max_volume: Option<i32>,

    /// Rely on polling alone; no element listeners or mutation observers.
    #[arg(long)]
    pub polling_only: bool,
}
