//! Error types for gridserve.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for gridserve.
///
/// Malformed query parameters never surface here; they are replaced by
/// defaults during layout resolution.
#[derive(Error, Debug)]
pub enum Error {
    /// The template file could not be read.
    #[error("failed to load template {}: {source}", path.display())]
    TemplateLoad {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The template source is not valid template syntax.
    #[error("failed to parse template {}: {message}", path.display())]
    TemplateParse {
        /// Path of the offending template.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// Executing the template against the page data failed.
    #[error("failed to render template: {message}")]
    Render {
        /// Renderer diagnostic.
        message: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this error comes from loading, parsing or executing
    /// the page template.
    #[must_use]
    pub fn is_template_error(&self) -> bool {
        matches!(
            self,
            Self::TemplateLoad { .. } | Self::TemplateParse { .. } | Self::Render { .. }
        )
    }

    /// Creates a render error with the given message.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
