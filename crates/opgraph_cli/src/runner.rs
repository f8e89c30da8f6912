use std::path::{Path, PathBuf};

use opgraph_core::{OpgraphError, Operation, Result, Value};
use opgraph_eval::{run_with_config, MemorySink, TraceFormat};

use crate::args::Sample;
use crate::samples;
use crate::workspace::Workspace;

pub struct RunOptions {
    pub output: Option<PathBuf>,
    pub format: Option<TraceFormat>,
    pub graph_name: Option<String>,
    pub edge_label_limit: Option<usize>,
}

fn sample_operation(sample: Sample) -> Operation {
    match sample {
        Sample::Divisibility => samples::divisibility(),
        Sample::Buckets => samples::buckets(),
    }
}

pub async fn run_sample(sample: Sample, input: i64, options: RunOptions) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| OpgraphError::IoError {
        path: ".".into(),
        message: e.to_string(),
    })?;
    let workspace = Workspace::find(&cwd)?;

    let mut config = workspace
        .as_ref()
        .map(|w| w.config.trace.interpreter_config())
        .unwrap_or_default();
    if let Some(name) = options.graph_name {
        config.graph_name = name;
    }
    if let Some(limit) = options.edge_label_limit {
        config.edge_label_limit = limit;
    }

    let format = options
        .format
        .or_else(|| workspace.as_ref().and_then(|w| w.config.trace.format))
        .unwrap_or_default();
    let output = options
        .output
        .or_else(|| workspace.as_ref().and_then(Workspace::output_path));

    let op = sample_operation(sample);
    tracing::info!(sample = ?sample, input, "running sample");

    let mut sink = MemorySink::new();
    let result = run_with_config(config, &op, Value::Int(input), &mut sink);

    if let Some(graph) = sink.take() {
        let rendered = format.render(&graph)?;
        write_trace(&rendered, output.as_deref()).await?;
    }

    let value = result?;
    println!("{}", value);
    Ok(())
}

async fn write_trace(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, rendered)
                .await
                .map_err(|e| OpgraphError::IoError {
                    path: path.to_string_lossy().to_string(),
                    message: e.to_string(),
                })?;
            eprintln!("Trace written to {}", path.display());
        }
        None => eprintln!("{}", rendered),
    }
    Ok(())
}

pub fn list_samples() -> Result<()> {
    println!("divisibility  multiples of both 2 and 3 below the input");
    println!("buckets       transformed range grouped by remainder modulo 3");
    Ok(())
}
