use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vocalscope::batch::InputFormat;

#[derive(Parser, Debug)]
#[command(name = "vocalscope", version, about = "Vocal performance analysis for PCM recordings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one or more recordings and print the results as JSON
    Analyze {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// How input bytes are interpreted
        #[arg(short, long, value_enum, default_value_t = InputFormat::Auto)]
        format: InputFormat,

        /// Sample rate for raw PCM / base64 input
        #[arg(short, long, default_value_t = vocalscope::DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads for several inputs (0 = one per core)
        #[arg(short = 'j', long, default_value_t = 0)]
        threads: usize,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Compare two saved analysis results
    Compare {
        before: PathBuf,
        after: PathBuf,

        #[arg(long)]
        compact: bool,
    },

    /// Summarize score trends over saved results, oldest first
    Trend {
        #[arg(required = true)]
        results: Vec<PathBuf>,

        #[arg(long)]
        compact: bool,
    },
}
