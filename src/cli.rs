//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// FestivalRadar - find local events from Ticketmaster and Eventbrite
///
/// Without --city, runs the HTTP server (direct search endpoints plus an
/// MCP tool endpoint). With --city, runs a single search and prints it.
///
/// Examples:
///   festivalradar
///   festivalradar --port 8080 --verbose
///   festivalradar --city Toronto --genre rock --start-date 2024-06-01 --end-date 2024-06-30
///   festivalradar --city Montreal --format json --output events.json
///   festivalradar --prompt --city Montreal --start-date 2024-07-01
///   festivalradar --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Interface to bind the server to
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (default: $PORT or 8000)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .festivalradar.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Upstream request timeout in seconds, for both providers
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Report provider timeouts as errors instead of dropping them
    #[arg(long)]
    pub surface_timeouts: bool,

    /// Run a single search for this city and exit
    #[arg(long, value_name = "CITY")]
    pub city: Option<String>,

    /// Genre or category filter
    #[arg(long, value_name = "GENRE")]
    pub genre: Option<String>,

    /// First day of the date range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<String>,

    /// Last day of the date range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,

    /// Output format for a one-shot search (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the one-shot search result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the natural-language search prompt for the given fields and exit
    #[arg(long)]
    pub prompt: bool,

    /// Generate a default .festivalradar.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for one-shot searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config || self.prompt {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.port == Some(0) {
            return Err("Port must be between 1 and 65535".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref city) = self.city {
            if city.trim().is_empty() {
                return Err("City must not be empty".to_string());
            }
        }

        let has_filters =
            self.genre.is_some() || self.start_date.is_some() || self.end_date.is_some();
        if has_filters && self.city.is_none() {
            return Err("--genre, --start-date and --end-date require --city".to_string());
        }

        Ok(())
    }

    /// Whether to run a single search instead of the server.
    pub fn is_one_shot(&self) -> bool {
        self.city.is_some()
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            host: None,
            port: None,
            config: None,
            verbose: false,
            quiet: false,
            timeout: None,
            surface_timeouts: false,
            city: None,
            genre: None,
            start_date: None,
            end_date: None,
            format: OutputFormat::Markdown,
            output: None,
            prompt: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_one_shot() {
        let args = Args::try_parse_from([
            "festivalradar",
            "--city",
            "Toronto",
            "--genre",
            "rock",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(args.is_one_shot());
        assert_eq!(args.genre.as_deref(), Some("rock"));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_filters_need_city() {
        let mut args = make_args();
        args.genre = Some("jazz".to_string());
        assert!(args.validate().is_err());

        args.city = Some("Ottawa".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_port_and_timeout() {
        let mut args = make_args();
        args.port = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
