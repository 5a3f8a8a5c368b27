//! Output writing utilities
//!
//! Documents and reports go to the primary writer (stdout by default).
//! Status messages go to the status writer (stderr) so piping a transformed
//! document never picks them up.

use crate::error::Result;
use colored::Colorize;
use std::io::{self, Write};

/// Destination-aware writer for command output
pub struct OutputWriter {
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
    status: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a writer over stdout and stderr
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self::with_writers(use_color, quiet, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Create an output writer with custom destinations
    pub fn with_writers(
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
        status: Box<dyn Write>,
    ) -> Self {
        Self {
            use_color,
            quiet,
            writer,
            status,
        }
    }

    /// Write raw bytes followed by a newline to the primary writer
    pub fn document(&mut self, content: &[u8]) -> Result<()> {
        self.writer.write_all(content)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line to the primary writer
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        tracing::debug!("Output info: {}", message);

        if self.quiet {
            return Ok(());
        }

        if self.use_color {
            self.status_line(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.status_line(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_color {
            self.status_line(&message.green().to_string())
        } else {
            self.status_line(message)
        }
    }

    /// Write a warning message, even in quiet mode
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.use_color {
            self.status_line(&message.yellow().to_string())
        } else {
            self.status_line(&format!("WARNING: {}", message))
        }
    }

    fn status_line(&mut self, content: &str) -> Result<()> {
        writeln!(self.status, "{}", content)?;
        self.status.flush()?;
        Ok(())
    }
}
