//! Database header and grid geometry.
//!
//! The flash image starts with an 8-byte big-endian header:
//!
//! ```text
//! offset 0..1   build year
//! offset 2      build month
//! offset 3      build day
//! offset 4..5   numLat  (grid points over [-90, 90])
//! offset 6..7   numLon  (grid points over [-180, 180])
//! ```
//!
//! followed by `numLat * numLon` one-byte records, latitude-major.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Size of the header in bytes. Grid records start right after it.
pub const HEADER_SIZE: usize = 8;

/// Parsed database header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseHeader {
    /// Build year.
    pub year: u16,
    /// Build month (1-12).
    pub month: u8,
    /// Build day (1-31).
    pub day: u8,
    /// Number of latitude grid points.
    pub num_lat: u16,
    /// Number of longitude grid points.
    pub num_lon: u16,
}

impl DatabaseHeader {
    /// Decode a header from its on-flash bytes.
    ///
    /// Decoding never fails; call [`DatabaseHeader::validate`] before using
    /// the grid counts.
    #[must_use]
    pub fn parse(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            year: u16::from_be_bytes([bytes[0], bytes[1]]),
            month: bytes[2],
            day: bytes[3],
            num_lat: u16::from_be_bytes([bytes[4], bytes[5]]),
            num_lon: u16::from_be_bytes([bytes[6], bytes[7]]),
        }
    }

    /// Encode the header back into its on-flash form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let [y0, y1] = self.year.to_be_bytes();
        let [a0, a1] = self.num_lat.to_be_bytes();
        let [o0, o1] = self.num_lon.to_be_bytes();
        [y0, y1, self.month, self.day, a0, a1, o0, o1]
    }

    /// Check that the grid counts describe a usable grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if either axis has fewer than two
    /// grid points.
    pub fn validate(&self) -> Result<()> {
        if self.num_lat < 2 {
            return Err(Error::invalid_header(format!(
                "numLat must be at least 2, got {}",
                self.num_lat
            )));
        }
        if self.num_lon < 2 {
            return Err(Error::invalid_header(format!(
                "numLon must be at least 2, got {}",
                self.num_lon
            )));
        }
        Ok(())
    }

    /// Build date, if the stored fields form a real calendar date.
    ///
    /// Informational only.
    #[must_use]
    pub fn build_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
    }

    /// Number of grid records.
    #[must_use]
    pub fn grid_len(&self) -> u64 {
        u64::from(self.num_lat) * u64::from(self.num_lon)
    }

    /// Total image size: header plus all grid records.
    #[must_use]
    pub fn image_len(&self) -> u64 {
        HEADER_SIZE as u64 + self.grid_len()
    }
}

/// Grid resolution derived from a validated header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Number of latitude grid points.
    pub num_lat: u16,
    /// Number of longitude grid points.
    pub num_lon: u16,
    /// Degrees per latitude step.
    pub lat_resolution: f64,
    /// Degrees per longitude step.
    pub lon_resolution: f64,
}

impl GridGeometry {
    /// Derive the geometry from a header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the header fails validation.
    pub fn from_header(header: &DatabaseHeader) -> Result<Self> {
        header.validate()?;
        Ok(Self {
            num_lat: header.num_lat,
            num_lon: header.num_lon,
            lat_resolution: 180.0 / f64::from(header.num_lat - 1),
            lon_resolution: 360.0 / f64::from(header.num_lon - 1),
        })
    }
}

impl fmt::Display for DatabaseHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{:02}", self.year, self.month, self.day)?;
        write!(f, " numLat={}", self.num_lat)?;
        if self.num_lat >= 2 {
            write!(f, " (res={})", 180.0 / f64::from(self.num_lat - 1))?;
        } else {
            write!(f, " (res=invalid)")?;
        }
        write!(f, " numLon={}", self.num_lon)?;
        if self.num_lon >= 2 {
            write!(f, " (res={})", 360.0 / f64::from(self.num_lon - 1))
        } else {
            write!(f, " (res=invalid)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; HEADER_SIZE] = [0x07, 0xE8, 0x06, 0x0F, 0x00, 0xB5, 0x01, 0x69];

    fn header(num_lat: u16, num_lon: u16) -> DatabaseHeader {
        DatabaseHeader {
            year: 2024,
            month: 1,
            day: 2,
            num_lat,
            num_lon,
        }
    }

    #[test]
    fn test_parse_sample_header() {
        let header = DatabaseHeader::parse(&SAMPLE);
        assert_eq!(header.year, 2024);
        assert_eq!(header.month, 6);
        assert_eq!(header.day, 15);
        assert_eq!(header.num_lat, 181);
        assert_eq!(header.num_lon, 361);
        assert_eq!(header.to_bytes(), SAMPLE);
    }

    #[test]
    fn test_geometry_from_sample() {
        let geometry = GridGeometry::from_header(&DatabaseHeader::parse(&SAMPLE)).unwrap();
        assert!((geometry.lat_resolution - 1.0).abs() < f64::EPSILON);
        assert!((geometry.lon_resolution - 1.0).abs() < f64::EPSILON);
        assert_eq!(geometry.num_lat, 181);
        assert_eq!(geometry.num_lon, 361);
    }

    #[test]
    fn test_geometry_resolution_formula() {
        for (n, m) in [(2u16, 2u16), (3, 5), (19, 37), (721, 1441), (100, 7)] {
            let geometry = GridGeometry::from_header(&header(n, m)).unwrap();
            let lat = 180.0 / f64::from(n - 1);
            let lon = 360.0 / f64::from(m - 1);
            assert!((geometry.lat_resolution - lat).abs() < 1e-12, "lat n={n}");
            assert!((geometry.lon_resolution - lon).abs() < 1e-12, "lon m={m}");
        }
    }

    #[test]
    fn test_validate_rejects_small_grids() {
        for (n, m) in [(0u16, 10u16), (1, 10), (10, 0), (10, 1)] {
            let err = header(n, m).validate().unwrap_err();
            assert!(matches!(err, Error::InvalidHeader { .. }));
            assert!(GridGeometry::from_header(&header(n, m)).is_err());
        }
        assert!(header(2, 2).validate().is_ok());
    }

    #[test]
    fn test_display_summary_line() {
        let header = DatabaseHeader::parse(&SAMPLE);
        assert_eq!(
            header.to_string(),
            "2024-06-15 numLat=181 (res=1) numLon=361 (res=1)"
        );
    }

    #[test]
    fn test_display_pads_month_and_day() {
        let header = DatabaseHeader {
            year: 2023,
            month: 3,
            day: 7,
            num_lat: 361,
            num_lon: 721,
        };
        assert_eq!(
            header.to_string(),
            "2023-03-07 numLat=361 (res=0.5) numLon=721 (res=0.5)"
        );
    }

    #[test]
    fn test_display_invalid_counts() {
        let msg = header(1, 0).to_string();
        assert!(msg.contains("numLat=1 (res=invalid)"));
        assert!(msg.contains("numLon=0 (res=invalid)"));
    }

    #[test]
    fn test_build_date() {
        let header = DatabaseHeader::parse(&SAMPLE);
        assert_eq!(header.build_date(), NaiveDate::from_ymd_opt(2024, 6, 15));

        let mut bogus = header;
        bogus.month = 13;
        assert!(bogus.build_date().is_none());
    }

    #[test]
    fn test_image_len() {
        let header = DatabaseHeader::parse(&SAMPLE);
        assert_eq!(header.grid_len(), 181 * 361);
        assert_eq!(header.image_len(), 181 * 361 + 8);
    }
}
