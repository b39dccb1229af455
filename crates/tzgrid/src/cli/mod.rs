//! Command-line interface for tzgrid.
//!
//! This module provides the CLI structure for the `tzgrid` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CellCommand, ConfigCommand, CoordinateArgs, InfoCommand, LookupCommand, PrintCommand,
};

use crate::logging::Verbosity;

/// tzgrid - Look up UTC offsets in a gridded timezone database
///
/// Reads a flash image holding an 8-byte header and one record per grid
/// cell, and maps coordinates to a UTC offset and DST flag.
#[derive(Debug, Parser)]
#[command(name = "tzgrid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the flash image (overrides the configured one)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read the database header and show the grid geometry
    Info(InfoCommand),

    /// Look up the UTC offset and DST flag at a coordinate
    Lookup(LookupCommand),

    /// Show which grid cell and flash offset a coordinate maps to
    Cell(CellCommand),

    /// Look up a coordinate and log a labelled summary line
    Print(PrintCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "tzgrid");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["tzgrid", "-q", "info"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["tzgrid", "-vv", "info"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);

        let cli = Cli::try_parse_from(["tzgrid", "info"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_parse_lookup_negative_coordinates() {
        let cli = Cli::try_parse_from(["tzgrid", "lookup", "-33.9", "-151.2"]).unwrap();
        match cli.command {
            Command::Lookup(cmd) => {
                assert!((cmd.coordinate.lat + 33.9).abs() < f64::EPSILON);
                assert!((cmd.coordinate.lon + 151.2).abs() < f64::EPSILON);
                assert!(!cmd.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_lookup_json() {
        let cli = Cli::try_parse_from(["tzgrid", "lookup", "--json", "51.5", "-0.1"]).unwrap();
        assert!(matches!(cli.command, Command::Lookup(LookupCommand { json: true, .. })));
    }

    #[test]
    fn test_parse_cell() {
        let cli = Cli::try_parse_from(["tzgrid", "cell", "44.6", "10"]).unwrap();
        assert!(matches!(cli.command, Command::Cell(_)));
    }

    #[test]
    fn test_parse_print() {
        let cli = Cli::try_parse_from(["tzgrid", "print", "40.7", "-74.0", "New York"]).unwrap();
        match cli.command {
            Command::Print(cmd) => assert_eq!(cmd.location, "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_print_requires_location() {
        assert!(Cli::try_parse_from(["tzgrid", "print", "40.7", "-74.0"]).is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(Cli::try_parse_from(["tzgrid", "lookup", "north", "0"]).is_err());
    }

    #[test]
    fn test_parse_with_image_and_config() {
        let cli = Cli::try_parse_from([
            "tzgrid",
            "-c",
            "/custom/config.toml",
            "--image",
            "/data/tz.bin",
            "info",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.image, Some(PathBuf::from("/data/tz.bin")));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["tzgrid", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }
}
