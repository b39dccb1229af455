//! `tzgrid` - Map coordinates to UTC offsets using a gridded timezone database
//!
//! The database is a flash image: an 8-byte header describing the grid, then
//! one bit-packed byte per grid cell holding a UTC offset and a DST flag.
//! [`TimezoneDatabase`] reads the header once and then answers lookups by
//! reading a single byte per query through a [`FlashRead`] implementation.
//!
//! ```
//! use tzgrid::{MemoryFlash, TimezoneDatabase, TimezoneInfo};
//!
//! // A 3x3 grid where every cell is UTC+1 with DST.
//! let cell = TimezoneInfo { utc_offset: 1.0, has_dst: true }.encode();
//! let mut image = vec![0x07, 0xE8, 6, 15, 0, 3, 0, 3];
//! image.extend([cell; 9]);
//!
//! let mut db = TimezoneDatabase::open(MemoryFlash::new(image))?;
//! let info = db.read_timezone(48.9, 2.35)?;
//! assert_eq!(info.utc_offset, 1.0);
//! assert_eq!(db.has_dst(), Some(true));
//! # Ok::<(), tzgrid::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod flash;
pub mod header;
pub mod logging;
pub mod record;

pub use config::Config;
pub use database::{summary_line, GridCell, TimezoneDatabase};
pub use error::{Error, Result};
pub use flash::{FileFlash, FlashRead, MemoryFlash, OffsetFlash};
pub use header::{DatabaseHeader, GridGeometry, HEADER_SIZE};
pub use logging::init_logging;
pub use record::TimezoneInfo;
