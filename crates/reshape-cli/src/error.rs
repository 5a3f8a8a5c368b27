//! Error types and handling for the CLI
//!
//! Every failure maps to a stable process exit code so scripts can tell a
//! rejected document apart from a broken schema or a missing file.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the transform engine
    #[error("{0}")]
    Core(#[from] reshape_core::Error),

    /// Schema file could not be loaded
    #[error("{0}")]
    Loader(#[from] reshape_schemas::LoaderError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error caused by another error
    pub fn config_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(reshape_core::Error::Validation(_)) => 2,
            Self::Core(reshape_core::Error::Input { .. }) => 3,
            Self::Core(e) if e.is_construction_error() => 4,
            Self::Core(_) => 5,
            Self::Loader(_) => 4,
            Self::FileNotFound { .. } => 6,
            Self::Config { .. } => 7,
            Self::InvalidArgs(_) => 8,
            Self::Json(_) => 9,
            Self::Yaml(_) => 10,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let mut message = error.to_string();

    let mut source = std::error::Error::source(error);
    if let Error::Config { .. } = error {
        while let Some(cause) = source {
            message.push_str(&format!("\n  caused by: {}", cause));
            source = cause.source();
        }
    }

    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reshape_core::InputFormat;
    use reshape_schemas::{ValidationError, ValidationErrors};

    #[test]
    fn test_exit_codes_separate_failure_kinds() {
        let validation = Error::Core(reshape_core::Error::Validation(ValidationErrors::from(
            ValidationError::new("", "missing title"),
        )));
        let input = Error::Core(reshape_core::Error::Input {
            format: InputFormat::Xml,
            message: "unexpected end".to_string(),
        });
        let schema = Error::Core(reshape_core::Error::schema("$.a", "bad"));

        assert_eq!(validation.exit_code(), 2);
        assert_eq!(input.exit_code(), 3);
        assert_eq!(schema.exit_code(), 4);
        assert_eq!(Error::invalid_args("x").exit_code(), 8);
        assert!(Error::invalid_args("x").should_show_help());
    }

    #[test]
    fn test_format_error_includes_config_cause() {
        let cause = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let error = Error::config_with_source("Failed to read reshape.toml", cause);

        let formatted = format_error(&error, false);
        assert!(formatted.starts_with("Error: Configuration error: Failed to read reshape.toml"));
        assert!(formatted.contains("caused by: no such file"));
    }
}
