//! Error types for Suggester's shared infrastructure.

use thiserror::Error;

/// Result type alias for Suggester operations
pub type Result<T> = std::result::Result<T, SuggesterError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while setting up process-wide infrastructure.
#[derive(Error, Debug)]
pub enum SuggesterError {
    /// A configuration value could not be used
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description.
        message: String,
        /// Underlying cause.
        #[source]
        source: BoxedSource,
    },

    /// The tracing pipeline could not be installed
    #[error("Logging error: {message}")]
    Logging {
        /// Human readable description.
        message: String,
        /// Underlying cause.
        #[source]
        source: BoxedSource,
    },
}

impl SuggesterError {
    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Box::new(source),
        }
    }

    /// Create a new logging error
    pub fn logging(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Logging {
            message: msg.into(),
            source: Box::new(source),
        }
    }
}
