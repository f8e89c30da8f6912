use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use opgraph_eval::TraceFormat;

#[derive(Parser)]
#[command(name = "opgraph")]
#[command(
    author,
    version,
    about = "Run workflow-algebra samples and record their execution trace"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log level when RUST_LOG is unset"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run a sample workflow and write its trace")]
    Run {
        #[arg(value_enum, help = "Sample workflow to run")]
        sample: Sample,

        #[arg(default_value = "12", help = "Initial input value")]
        input: i64,

        #[arg(short, long, help = "Trace output file (defaults to Opgraph.toml, then stderr)")]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, help = "Trace format")]
        format: Option<Format>,

        #[arg(long, help = "Name of the trace graph")]
        graph_name: Option<String>,

        #[arg(long, help = "Truncate edge labels longer than this (0 = never)")]
        edge_label_limit: Option<usize>,
    },

    #[command(about = "List the bundled sample workflows")]
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Sample {
    /// Multiples of both 2 and 3 below the input
    Divisibility,
    /// Transformed range grouped by remainder modulo 3
    Buckets,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Dot,
    Json,
}

impl From<Format> for TraceFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Dot => TraceFormat::Dot,
            Format::Json => TraceFormat::Json,
        }
    }
}
