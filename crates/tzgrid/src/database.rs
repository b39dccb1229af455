//! Grid lookup engine.
//!
//! [`TimezoneDatabase`] is the session object: it owns the flash reader, the
//! grid geometry established by [`TimezoneDatabase::setup`], and the result of
//! the most recent successful lookup.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::flash::FlashRead;
use crate::header::{DatabaseHeader, GridGeometry, HEADER_SIZE};
use crate::record::TimezoneInfo;

/// Absorbs floating point error when converting a snapped coordinate into a
/// grid index, so that e.g. 134.999999 still lands on index 135.
const INDEX_EPSILON: f64 = 1e-9;

/// Latitude bounds in degrees.
const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// Longitude bounds in degrees.
const LON_RANGE: (f64, f64) = (-180.0, 180.0);

/// Location of one grid cell in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    /// Zero-based latitude row.
    pub lat_index: u32,
    /// Zero-based longitude column.
    pub lon_index: u32,
    /// Row-major cell number.
    pub coordinate_index: u64,
    /// Byte offset of the record in the image.
    pub flash_offset: u64,
}

impl GridCell {
    /// Map a coordinate onto the nearest grid cell.
    ///
    /// Each coordinate is snapped to the nearest multiple of the axis
    /// resolution, rounding half away from zero, then shifted to a zero-based
    /// index. Indices that land just outside the grid (possible only when the
    /// grid points are not symmetric around zero) are clamped to the edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinateOutOfRange`] for non-finite coordinates or
    /// coordinates outside [-90, 90] / [-180, 180].
    pub fn locate(geometry: &GridGeometry, lat: f64, lon: f64) -> Result<Self> {
        check_range("latitude", lat, LAT_RANGE)?;
        check_range("longitude", lon, LON_RANGE)?;

        let lat_index = axis_index(lat, geometry.lat_resolution, -LAT_RANGE.0, geometry.num_lat);
        let lon_index = axis_index(lon, geometry.lon_resolution, -LON_RANGE.0, geometry.num_lon);

        let coordinate_index =
            u64::from(lat_index) * u64::from(geometry.num_lon) + u64::from(lon_index);
        Ok(Self {
            lat_index,
            lon_index,
            coordinate_index,
            flash_offset: coordinate_index + HEADER_SIZE as u64,
        })
    }
}

fn check_range(axis: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::CoordinateOutOfRange {
            axis,
            value,
            min,
            max,
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn axis_index(value: f64, resolution: f64, axis_offset: f64, count: u16) -> u32 {
    let snapped = (value / resolution).round() * resolution;
    let index = ((snapped + axis_offset) / resolution + INDEX_EPSILON).floor();
    let last = f64::from(count.saturating_sub(1));
    // In range and finite, so the cast is exact.
    index.clamp(0.0, last) as u32
}

/// The line logged by [`TimezoneDatabase::print_timezone`].
#[must_use]
pub fn summary_line(location: &str, lat: f64, lon: f64, info: &TimezoneInfo) -> String {
    format!("timezone {location} ({lat}, {lon}): {info}")
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    header: DatabaseHeader,
    geometry: GridGeometry,
}

/// A timezone database session over a flash image.
#[derive(Debug)]
pub struct TimezoneDatabase<F> {
    flash: F,
    layout: Option<Layout>,
    last: Option<TimezoneInfo>,
}

impl<F: FlashRead> TimezoneDatabase<F> {
    /// Create a session. Lookups fail until [`TimezoneDatabase::setup`] runs.
    #[must_use]
    pub fn new(flash: F) -> Self {
        Self {
            flash,
            layout: None,
            last: None,
        }
    }

    /// Create a session and read the header in one go.
    ///
    /// # Errors
    ///
    /// Returns any error from [`TimezoneDatabase::setup`].
    pub fn open(flash: F) -> Result<Self> {
        let mut db = Self::new(flash);
        db.setup()?;
        Ok(db)
    }

    /// Read and validate the header, fixing the grid geometry for the rest of
    /// the session.
    ///
    /// Calling this again after a successful setup returns the header already
    /// read without touching flash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FlashRead`] if the header cannot be read and
    /// [`Error::InvalidHeader`] if the grid counts are unusable or the image
    /// is too small to hold the grid.
    pub fn setup(&mut self) -> Result<&DatabaseHeader> {
        if self.layout.is_none() {
            let layout = self.read_layout()?;
            info!("{}", layout.header);
            self.layout = Some(layout);
        } else {
            debug!("Timezone database already set up");
        }
        self.header().ok_or(Error::NotInitialized)
    }

    fn read_layout(&mut self) -> Result<Layout> {
        let mut bytes = [0u8; HEADER_SIZE];
        self.read_flash(0, &mut bytes)?;

        let header = DatabaseHeader::parse(&bytes);
        let geometry = GridGeometry::from_header(&header)?;

        if let Some(capacity) = self.flash.capacity() {
            if capacity < header.image_len() {
                return Err(Error::invalid_header(format!(
                    "image holds {capacity} bytes but a {}x{} grid needs {}",
                    header.num_lat,
                    header.num_lon,
                    header.image_len()
                )));
            }
        }

        Ok(Layout { header, geometry })
    }

    /// Whether setup has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.layout.is_some()
    }

    /// The parsed header, once set up.
    #[must_use]
    pub fn header(&self) -> Option<&DatabaseHeader> {
        self.layout.as_ref().map(|l| &l.header)
    }

    /// The grid geometry, once set up.
    #[must_use]
    pub fn geometry(&self) -> Option<&GridGeometry> {
        self.layout.as_ref().map(|l| &l.geometry)
    }

    /// Map a coordinate to its grid cell without reading flash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before setup and
    /// [`Error::CoordinateOutOfRange`] for invalid coordinates.
    pub fn cell(&self, lat: f64, lon: f64) -> Result<GridCell> {
        let geometry = self.geometry().ok_or(Error::NotInitialized)?;
        GridCell::locate(geometry, lat, lon)
    }

    /// Look up the timezone at a coordinate.
    ///
    /// On success the result also replaces the stored last result; on failure
    /// the stored result is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`], [`Error::CoordinateOutOfRange`] or
    /// [`Error::FlashRead`].
    pub fn read_timezone(&mut self, lat: f64, lon: f64) -> Result<TimezoneInfo> {
        let cell = self.cell(lat, lon)?;

        let mut record = [0u8; 1];
        self.read_flash(cell.flash_offset, &mut record)?;
        let info = TimezoneInfo::decode(record[0]);

        debug!(
            "({}, {}) -> cell {} at {:#x}: {}",
            lat, lon, cell.coordinate_index, cell.flash_offset, info
        );
        self.last = Some(info);
        Ok(info)
    }

    /// Look up a coordinate and log a summary line labelled with `location`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`TimezoneDatabase::read_timezone`].
    pub fn print_timezone(&mut self, lat: f64, lon: f64, location: &str) -> Result<TimezoneInfo> {
        let info = self.read_timezone(lat, lon)?;
        info!("{}", summary_line(location, lat, lon, &info));
        Ok(info)
    }

    /// Result of the most recent successful lookup.
    #[must_use]
    pub fn last_result(&self) -> Option<TimezoneInfo> {
        self.last
    }

    /// UTC offset in hours from the most recent successful lookup.
    #[must_use]
    pub fn utc_offset(&self) -> Option<f64> {
        self.last.map(|info| info.utc_offset)
    }

    /// DST flag from the most recent successful lookup.
    #[must_use]
    pub fn has_dst(&self) -> Option<bool> {
        self.last.map(|info| info.has_dst)
    }

    /// Release the flash reader.
    #[must_use]
    pub fn into_inner(self) -> F {
        self.flash
    }

    fn read_flash(&mut self, address: u64, buf: &mut [u8]) -> Result<()> {
        let length = buf.len();
        self.flash
            .read(address, buf)
            .map_err(|source| Error::flash_read(address, length, source))
    }
}
