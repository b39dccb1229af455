//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// A latitude/longitude pair given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Args)]
pub struct CoordinateArgs {
    /// Latitude in degrees, -90 to 90
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees, -180 to 180
    #[arg(allow_negative_numbers = true)]
    pub lon: f64,
}

/// Info command arguments.
#[derive(Debug, Args)]
pub struct InfoCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Lookup command arguments.
#[derive(Debug, Args)]
pub struct LookupCommand {
    /// Coordinate to look up
    #[command(flatten)]
    pub coordinate: CoordinateArgs,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Cell command arguments.
#[derive(Debug, Args)]
pub struct CellCommand {
    /// Coordinate to map onto the grid
    #[command(flatten)]
    pub coordinate: CoordinateArgs,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Print command arguments.
#[derive(Debug, Args)]
pub struct PrintCommand {
    /// Coordinate to look up
    #[command(flatten)]
    pub coordinate: CoordinateArgs,

    /// Label for the location in the output line
    pub location: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_command_debug() {
        let cmd = LookupCommand {
            coordinate: CoordinateArgs {
                lat: 51.5,
                lon: -0.1,
            },
            json: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("51.5"));
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_print_command_debug() {
        let cmd = PrintCommand {
            coordinate: CoordinateArgs { lat: 0.0, lon: 0.0 },
            location: "Null Island".to_string(),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Null Island"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
