use serde::Deserialize;

pub const DEFAULT_GRAPH_NAME: &str = "opgraph";
pub const DEFAULT_EDGE_LABEL_LIMIT: usize = 80;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Name of the trace graph and its root frame.
    pub graph_name: String,
    /// Label of the input node; the initial value is used when unset.
    pub input_label: Option<String>,
    /// Edge labels longer than this many characters are cut and end in
    /// `...`. Zero disables truncation.
    pub edge_label_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            graph_name: DEFAULT_GRAPH_NAME.into(),
            input_label: None,
            edge_label_limit: DEFAULT_EDGE_LABEL_LIMIT,
        }
    }
}

impl InterpreterConfig {
    pub fn with_graph_name(mut self, name: impl Into<String>) -> Self {
        self.graph_name = name.into();
        self
    }

    pub fn with_edge_label_limit(mut self, limit: usize) -> Self {
        self.edge_label_limit = limit;
        self
    }

    pub(crate) fn edge_label(&self, text: String) -> String {
        if self.edge_label_limit == 0 || text.chars().count() <= self.edge_label_limit {
            return text;
        }
        let mut cut: String = text.chars().take(self.edge_label_limit).collect();
        cut.push_str("...");
        cut
    }
}
