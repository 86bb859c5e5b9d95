//! Error types for plugin authors and hosts

use thiserror::Error;

use crate::value::PropertyType;

/// Errors raised by properties, adapters and plugin hooks
#[derive(Error, Debug)]
pub enum PluginError {
    /// A value did not match the property's declared type
    #[error("Type mismatch on property '{property}': expected {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: PropertyType,
        found: String,
    },

    /// No property with this name is registered
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Operation not allowed in the adapter's current lifecycle state
    #[error("Cannot {operation} while adapter is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A view could not be created or synchronized
    #[error("View error: {0}")]
    View(String),

    /// Custom error with message
    #[error("{0}")]
    Custom(String),
}

impl PluginError {
    /// Create a custom error with a message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a view error
    pub fn view(message: impl Into<String>) -> Self {
        Self::View(message.into())
    }
}
