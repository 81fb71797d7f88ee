//! Error types raised by collaborators of the binding layer

/// Error raised from inside a component callback body
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallbackError {
    /// The callback's own logic failed
    #[error("{0}")]
    Failed(String),

    /// The callback panicked
    #[error("callback panicked: {0}")]
    Panicked(String),

    /// An argument handed to the callback had an unexpected shape
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },
}

impl From<String> for CallbackError {
    fn from(s: String) -> Self {
        CallbackError::Failed(s)
    }
}

impl From<&str> for CallbackError {
    fn from(s: &str) -> Self {
        CallbackError::Failed(s.to_string())
    }
}

/// Error raised by a type-name resolver
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// No type with this name is visible to the resolver
    #[error("type not found: {0}")]
    NotFound(String),

    /// The type exists but could not be loaded
    #[error("failed to load type {name}: {reason}")]
    LoadFailed {
        /// Type name
        name: String,
        /// Loader message
        reason: String,
    },
}
