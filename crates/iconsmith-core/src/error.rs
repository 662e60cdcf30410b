//! Error types for the iconsmith core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for iconsmith.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or validation error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required configuration key is absent or has the wrong shape.
    #[error("Configuration error in {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    /// Invalid `U+XXXX` codepoint string.
    #[error("invalid codepoint {value:?}: {reason}")]
    Codepoint { value: String, reason: String },

    /// The allocator ran past the last assignable Unicode scalar value.
    #[error("codepoint space exhausted after U+{last:04X}")]
    CodepointExhausted { last: u32 },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error tied to a config file.
    pub fn config_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a codepoint parse error.
    pub fn codepoint(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Codepoint {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error belongs to the configuration class (fatal before any output).
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::ConfigFile { .. }
                | Self::Codepoint { .. }
                | Self::CodepointExhausted { .. }
        )
    }
}
