use serde::Deserialize;
use std::path::{Path, PathBuf};

use opgraph_core::{OpgraphError, Result};
use opgraph_eval::{InterpreterConfig, TraceFormat, DEFAULT_EDGE_LABEL_LIMIT, DEFAULT_GRAPH_NAME};

pub const CONFIG_FILE: &str = "Opgraph.toml";

#[derive(Debug, Deserialize, Default)]
pub struct OpgraphToml {
    #[serde(default)]
    pub trace: TraceSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct TraceSection {
    pub output: Option<PathBuf>,
    pub format: Option<TraceFormat>,
    pub graph_name: Option<String>,
    pub input_label: Option<String>,
    pub edge_label_limit: Option<usize>,
}

impl TraceSection {
    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig {
            graph_name: self
                .graph_name
                .clone()
                .unwrap_or_else(|| DEFAULT_GRAPH_NAME.into()),
            input_label: self.input_label.clone(),
            edge_label_limit: self.edge_label_limit.unwrap_or(DEFAULT_EDGE_LABEL_LIMIT),
        }
    }
}

pub struct Workspace {
    pub root: PathBuf,
    pub config: OpgraphToml,
}

impl Workspace {
    /// Looks for `Opgraph.toml` in `start_dir` and its ancestors.
    pub fn find(start_dir: &Path) -> Result<Option<Self>> {
        let mut current = start_dir.to_path_buf();
        loop {
            if current.join(CONFIG_FILE).exists() {
                return Self::load(&current).map(Some);
            }
            if !current.pop() {
                return Ok(None);
            }
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| OpgraphError::IoError {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::parse(&content).map_err(|message| OpgraphError::ConfigError {
            path: path.to_string_lossy().to_string(),
            message,
        })?;

        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    fn parse(content: &str) -> std::result::Result<OpgraphToml, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE, e))
    }

    /// Configured output path, resolved against the workspace root.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.config.trace.output.as_ref().map(|p| self.root.join(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace_section() {
        let config = Workspace::parse(
            r#"
            [trace]
            output = "out/trace.json"
            format = "json"
            graph_name = "demo"
            edge_label_limit = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.trace.format, Some(TraceFormat::Json));
        let interp = config.trace.interpreter_config();
        assert_eq!(interp.graph_name, "demo");
        assert_eq!(interp.edge_label_limit, 12);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Workspace::parse("").unwrap();
        assert!(config.trace.output.is_none());
        let interp = config.trace.interpreter_config();
        assert_eq!(interp.graph_name, DEFAULT_GRAPH_NAME);
        assert_eq!(interp.edge_label_limit, DEFAULT_EDGE_LABEL_LIMIT);
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let err = Workspace::parse("[trace]\nformat = \"svg\"\n").unwrap_err();
        assert!(err.contains(CONFIG_FILE));
    }

    #[test]
    fn test_find_walks_up_and_resolves_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[trace]\noutput = \"trace.dot\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let workspace = Workspace::find(&nested).unwrap().unwrap();
        assert_eq!(workspace.root, dir.path());
        assert_eq!(workspace.output_path().unwrap(), dir.path().join("trace.dot"));
    }
}
