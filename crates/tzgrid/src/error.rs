//! Error types for tzgrid.
//!
//! Every failure a lookup can hit is reported to the caller; nothing here is
//! recovered silently, since there is no safe default offset to fall back to.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tzgrid operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Database Errors ===
    /// A lookup was attempted before the header was read.
    #[error("timezone database is not initialized; run setup first")]
    NotInitialized,

    /// The database header describes an unusable grid.
    #[error("invalid database header: {message}")]
    InvalidHeader {
        /// Description of what is wrong with the header.
        message: String,
    },

    /// A coordinate lies outside its axis bounds.
    #[error("{axis} {value} is out of range [{min}, {max}]")]
    CoordinateOutOfRange {
        /// Axis name (`latitude` or `longitude`).
        axis: &'static str,
        /// The rejected value.
        value: f64,
        /// Lower bound of the axis.
        min: f64,
        /// Upper bound of the axis.
        max: f64,
    },

    /// The flash collaborator failed or returned fewer bytes than requested.
    #[error("failed to read {length} byte(s) from flash at {address:#x}: {source}")]
    FlashRead {
        /// Start address of the read.
        address: u64,
        /// Number of bytes requested.
        length: usize,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to open the flash image file.
    #[error("failed to open flash image {path}: {source}")]
    ImageOpen {
        /// Path to the image file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for tzgrid operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a flash read error for the given range.
    #[must_use]
    pub fn flash_read(address: u64, length: usize, source: std::io::Error) -> Self {
        Self::FlashRead {
            address,
            length,
            source,
        }
    }

    /// Check if this error means setup has not run.
    #[must_use]
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized)
    }

    /// Check if this error was caused by a bad coordinate.
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::CoordinateOutOfRange { .. })
    }
}
