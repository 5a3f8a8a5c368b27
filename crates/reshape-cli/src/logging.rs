//! Logging setup for the Reshape CLI
//!
//! Logs go to stderr so stdout stays reserved for output documents. The
//! level comes from `-v` flags, then the config file, and `RUST_LOG` wins
//! over both. `RESHAPE_LOG_FORMAT` selects compact, full or JSON output.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Emit ANSI colors
    pub ansi: bool,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
    /// Include span close events with timings
    pub span_events: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact format for production
    #[default]
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            ansi: true,
            thread_ids: false,
            source_location: false,
            span_events: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    ///
    /// `base_level` applies when no `-v` flag was given.
    pub fn from_verbosity(verbosity: u8, base_level: &str) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {
                config.level = base_level.to_string();
            }
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
                config.span_events = true;
            }
        }

        config
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("RESHAPE_LOG_FORMAT") {
            match parse_format(&format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: invalid RESHAPE_LOG_FORMAT '{}', using default", format),
            }
        }
    }
}

fn parse_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "compact" => Some(LogFormat::Compact),
        "full" => Some(LogFormat::Full),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config_with_source(format!("Invalid log filter '{}'", config.level), e))?;

    let span_events = if config.span_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    // Each format yields a different subscriber type
    let result = match config.format {
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(config.ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_span_events(span_events)
                .compact()
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_span_events(span_events)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Full => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(config.ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_span_events(span_events)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    result.map_err(|e| Error::config_with_source("Failed to initialize logging", e))?;

    tracing::debug!(config = ?config, "Logging system initialized");
    Ok(())
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;

    /// A timer that logs its duration when dropped
    pub struct Timer {
        start: Instant,
        operation: &'static str,
    }

    impl Timer {
        pub fn new(operation: &'static str) -> Self {
            Self {
                start: Instant::now(),
                operation,
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            tracing::debug!(
                operation = self.operation,
                duration_ms = self.start.elapsed().as_millis() as u64,
                "Operation completed"
            );
        }
    }
}
