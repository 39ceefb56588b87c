//! Error types for the plugd core
//!
//! This module defines all error types used throughout the crate.

use crate::setup::ProtocolFamily;
use thiserror::Error;

/// Result type alias for plugd operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for plugd
#[derive(Error, Debug)]
pub enum Error {
    /// A plugin record that cannot be registered (no usable name)
    #[error("Invalid plugin: {0}")]
    InvalidPlugin(String),

    /// Two plugins were registered under the same name
    ///
    /// This is fatal: the process was built or initialized with two
    /// plugins sharing one name and must not continue serving.
    #[error("Plugin '{name}' is already registered")]
    DuplicateRegistration {
        /// The colliding plugin name
        name: String,
    },

    /// A configured plugin name has no registry entry
    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    /// The plugin exists but provides no setup for the requested family
    #[error("Plugin '{plugin}' does not support {family}")]
    UnsupportedFamily {
        /// Plugin name
        plugin: String,
        /// Requested protocol family
        family: ProtocolFamily,
    },

    /// A plugin setup capability failed to construct its handler
    #[error("Setup of plugin '{plugin}' failed: {message}")]
    Setup {
        /// Plugin name
        plugin: String,
        /// Failure reported by the plugin
        message: String,
    },

    /// Plugin arguments rejected by a setup capability
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid plugin error
    pub fn invalid_plugin(msg: impl Into<String>) -> Self {
        Self::InvalidPlugin(msg.into())
    }

    /// Create a duplicate registration error
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateRegistration { name: name.into() }
    }

    /// Create an unknown plugin error
    pub fn unknown_plugin(name: impl Into<String>) -> Self {
        Self::UnknownPlugin(name.into())
    }

    /// Create an unsupported family error
    pub fn unsupported_family(plugin: impl Into<String>, family: ProtocolFamily) -> Self {
        Self::UnsupportedFamily {
            plugin: plugin.into(),
            family,
        }
    }

    /// Create a setup failure error
    pub fn setup(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Setup {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the caller must treat this error as terminal
    ///
    /// Only [`Error::DuplicateRegistration`] is fatal. Bootstrap code is
    /// expected to stop the process when it sees one.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DuplicateRegistration { .. })
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
