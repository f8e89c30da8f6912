mod args;
mod runner;
mod samples;
mod workspace;

use clap::Parser;
use tokio::runtime::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Cli, Commands};
use runner::RunOptions;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to build Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        match cli.command {
            Commands::Run {
                sample,
                input,
                output,
                format,
                graph_name,
                edge_label_limit,
            } => {
                let options = RunOptions {
                    output,
                    format: format.map(Into::into),
                    graph_name,
                    edge_label_limit,
                };
                runner::run_sample(sample, input, options).await
            }
            Commands::List => runner::list_samples(),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
