mod config;
mod generators;
mod interpreter;
mod run;

pub use config::{InterpreterConfig, DEFAULT_EDGE_LABEL_LIMIT, DEFAULT_GRAPH_NAME};
pub use generators::{exclude, filter, group_by, Filter, FilterMode, GroupBy};
pub use interpreter::Interpreter;
pub use run::{run, run_with_config, FileSink, MemorySink, TraceFormat, TraceSink};
