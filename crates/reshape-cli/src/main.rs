//! Reshape CLI - schema-driven record transformation from the command line
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    let cli = Cli::parse_args();
    control::set_override(cli.use_color());

    let result = Config::load_with_file(cli.config.as_deref()).and_then(|config| {
        if let Err(e) = init_logging(&cli, &config) {
            eprintln!("Failed to initialize logging: {}", e);
        }
        run(cli, config)
    });

    if let Err(e) = result {
        eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

        if e.should_show_help() {
            eprintln!("\nFor more information, try '--help'");
        }

        process::exit(e.exit_code());
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");
    let mut output = OutputWriter::new(cli.use_color(), cli.quiet);

    match cli.command {
        Commands::Transform(args) => handlers::handle_transform(args, &config, &mut output),
        Commands::Check(args) => handlers::handle_check(args, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level(), &config.logging.level);
    if cli.verbosity_level() < 3 {
        logging_config.format = config.logging.format;
    }
    logging_config.ansi = cli.use_color();

    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["reshape", "-vv", "check", "--schema", "s.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["reshape", "--quiet", "config", "show"]);
        assert_eq!(cli.verbosity_level(), 0);
    }
}
