use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OpgraphError {
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    #[error("Type error: '{type_name}' object is not iterable")]
    NotIterable { type_name: String },

    #[error("Malformed operation: {kind} requires at least one operand")]
    EmptyOperands { kind: String },

    #[error("Action '{label}' failed: {message}")]
    ActionFailed { label: String, message: String },

    #[error("Generator '{generator}' failed to expand: {message}")]
    ExpansionFailed { generator: String, message: String },

    #[error("Value error: {message}")]
    ValueError { message: String },

    #[error("State of action '{label}' is poisoned")]
    StatePoisoned { label: String },

    #[error("I/O error: {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Serialization error: {message}")]
    SerializeError { message: String },

    #[error("Config error: {path}: {message}")]
    ConfigError { path: String, message: String },
}

impl OpgraphError {
    pub fn value_error(message: impl Into<String>) -> Self {
        OpgraphError::ValueError {
            message: message.into(),
        }
    }

    pub fn type_error(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        OpgraphError::TypeError {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Errors raised by user code inside an action, as opposed to contract
    /// violations detected by the algebra itself.
    pub fn is_action_failure(&self) -> bool {
        matches!(
            self,
            OpgraphError::ActionFailed { .. } | OpgraphError::ExpansionFailed { .. }
        )
    }
}

impl From<serde_json::Error> for OpgraphError {
    fn from(e: serde_json::Error) -> Self {
        OpgraphError::SerializeError {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OpgraphError>;
