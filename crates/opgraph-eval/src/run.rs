use std::path::{Path, PathBuf};
use std::str::FromStr;

use opgraph_core::{OpgraphError, Operation, Result, TraceGraph, Value};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::InterpreterConfig;
use crate::interpreter::Interpreter;

/// Receives the finished trace of a run.
pub trait TraceSink {
    fn finish(&mut self, graph: &TraceGraph) -> Result<()>;
}

/// Keeps the last trace it was handed.
#[derive(Debug, Default)]
pub struct MemorySink {
    graph: Option<TraceGraph>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> Option<&TraceGraph> {
        self.graph.as_ref()
    }

    pub fn take(&mut self) -> Option<TraceGraph> {
        self.graph.take()
    }
}

impl TraceSink for MemorySink {
    fn finish(&mut self, graph: &TraceGraph) -> Result<()> {
        self.graph = Some(graph.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    #[default]
    Dot,
    Json,
}

impl TraceFormat {
    pub fn render(&self, graph: &TraceGraph) -> Result<String> {
        match self {
            TraceFormat::Dot => Ok(graph.to_dot()),
            TraceFormat::Json => graph.to_json(),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TraceFormat::Dot => "dot",
            TraceFormat::Json => "json",
        }
    }
}

impl FromStr for TraceFormat {
    type Err = OpgraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dot" => Ok(TraceFormat::Dot),
            "json" => Ok(TraceFormat::Json),
            other => Err(OpgraphError::value_error(format!(
                "unknown trace format '{other}' (expected dot or json)"
            ))),
        }
    }
}

/// Writes the rendered trace to a file.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    format: TraceFormat,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>, format: TraceFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceSink for FileSink {
    fn finish(&mut self, graph: &TraceGraph) -> Result<()> {
        let rendered = self.format.render(graph)?;
        std::fs::write(&self.path, rendered).map_err(|e| OpgraphError::IoError {
            path: self.path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;
        info!(path = %self.path.display(), nodes = graph.nodes.len(), "trace written");
        Ok(())
    }
}

impl Interpreter {
    /// Interprets `op` and hands the trace to `sink` whether or not the
    /// interpretation succeeded.
    ///
    /// An interpretation error wins over a sink error; the latter is then
    /// only logged.
    pub fn run(mut self, op: &Operation, value: Value, sink: &mut dyn TraceSink) -> Result<Value> {
        let result = self.interpret(op, value);
        let finished = sink.finish(self.graph());
        match (result, finished) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(sink_err)) => Err(sink_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(sink_err)) => {
                warn!(error = %sink_err, "failed to hand off trace after interpretation error");
                Err(err)
            }
        }
    }
}

/// Runs `op` on `value` with a default interpreter.
pub fn run(op: &Operation, value: Value, sink: &mut dyn TraceSink) -> Result<Value> {
    Interpreter::new().run(op, value, sink)
}

/// Runs `op` on `value` with the given configuration.
pub fn run_with_config(
    config: InterpreterConfig,
    op: &Operation,
    value: Value,
    sink: &mut dyn TraceSink,
) -> Result<Value> {
    Interpreter::with_config(config).run(op, value, sink)
}
