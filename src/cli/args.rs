use crate::readers::TimestampPolicy;
use crate::writers::ReportFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "climate-summarizer")]
#[command(about = "Per-year climate averages and extremes, computed concurrently")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase logging verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Hide progress output")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a CSV file of weather observations
    Summarize {
        #[arg(short, long, help = "Input CSV file [default: from config or CLIMATE_INPUT_PATH]")]
        input: Option<PathBuf>,

        #[arg(long, help = "Lower inclusive year bound [default: 2006]")]
        min_year: Option<i32>,

        #[arg(long, help = "Upper inclusive year bound [default: 2016]")]
        max_year: Option<i32>,

        #[arg(long, help = "Maximum concurrent year reductions [default: CPU count]")]
        max_workers: Option<usize>,

        #[arg(long, help = "Abort if the year reductions take longer than this")]
        timeout_secs: Option<u64>,

        #[arg(long, value_enum, help = "Handling of unparseable timestamps [default: skip]")]
        timestamp_policy: Option<TimestampPolicy>,

        #[arg(long, help = "Memory-map the input file")]
        mmap: bool,

        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        #[arg(short, long, help = "Write the report here instead of stdout")]
        output_file: Option<PathBuf>,
    },

    /// Parse the input and report rejected rows without summarizing
    Validate {
        #[arg(short, long, help = "Input CSV file [default: from config or CLIMATE_INPUT_PATH]")]
        input: Option<PathBuf>,

        #[arg(long, value_enum, help = "Handling of unparseable timestamps [default: skip]")]
        timestamp_policy: Option<TimestampPolicy>,

        #[arg(long, default_value = "10", help = "Number of rejected rows to list")]
        show: usize,
    },
}
