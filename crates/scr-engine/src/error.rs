//! Error types for the binding engine and engine configuration

use std::any::Any;

use scr_sdk::CallbackError;

use crate::binding::ClassId;

/// Binding failures recorded at resolution or raised during invocation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    /// A signature match exists but fails the visibility or return test
    #[error("suitable but non-accessible method {method} found in class {class}, subclass of {leaf}")]
    AmbiguousAccess {
        /// Callback name
        method: String,
        /// Class declaring the rejected method
        class: String,
        /// Leaf class the search started from
        leaf: String,
    },

    /// A required callback has no acceptable implementation
    #[error("{method} method [{class}] not found")]
    NotFoundRequired {
        /// Callback name
        method: String,
        /// Leaf class searched
        class: String,
    },

    /// The callback body itself failed
    #[error("the {method} method has thrown an exception: {source}")]
    InBodyFailure {
        /// Callback name
        method: String,
        /// Failure raised by the body
        #[source]
        source: CallbackError,
    },

    /// Arguments for the resolved signature could not be produced
    #[error("cannot prepare arguments for {method}: {source}")]
    ArgumentUnavailable {
        /// Callback name
        method: String,
        /// Mapping failure
        #[source]
        source: ArgumentError,
    },
}

/// Failure to map a raw call-site parameter to a concrete argument
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgumentError {
    /// The bound service object can no longer be obtained
    #[error("service object for reference {0} is not available")]
    ServiceUnavailable(u64),

    /// The signature names a view schema the call site doesn't know
    #[error("no view schema named {0}")]
    UnknownView(String),

    /// The call site can't produce a parameter of this type
    #[error("parameter type {0} is not supported here")]
    Unsupported(String),
}

/// Failure to produce the ancestor list of a class
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    /// A class or one of its ancestors is not registered
    #[error("class {0} is not registered")]
    MissingClass(ClassId),

    /// The parent chain loops back on itself
    #[error("class hierarchy of {0} contains a cycle")]
    Cycle(ClassId),
}

/// Engine configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Unknown component description version
    #[error("Invalid version: {0}. Expected one of 1.0, 1.1, 1.1-felix, 1.2, 1.2-felix, 1.3")]
    InvalidVersion(String),
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
