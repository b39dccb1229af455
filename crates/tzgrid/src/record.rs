//! Grid record encoding.
//!
//! Each grid cell is one byte: bit 0 is the DST flag, bits 1-7 hold the UTC
//! offset in half hours with a bias of 48 (so 48 is UTC+0).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bias applied to the stored half-hour offset.
pub const OFFSET_BIAS: u8 = 48;

const DST_MASK: u8 = 0x01;
const OFFSET_MAX: u8 = 0x7F;

/// Timezone data for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimezoneInfo {
    /// Offset from UTC in hours, in half-hour steps.
    pub utc_offset: f64,
    /// Whether the zone observes daylight saving time.
    pub has_dst: bool,
}

impl TimezoneInfo {
    /// Decode a record byte.
    #[must_use]
    pub fn decode(byte: u8) -> Self {
        let has_dst = byte & DST_MASK == 1;
        let encoded = (byte >> 1) & OFFSET_MAX;
        Self {
            utc_offset: f64::from(i16::from(encoded) - i16::from(OFFSET_BIAS)) / 2.0,
            has_dst,
        }
    }

    /// Encode into a record byte.
    ///
    /// The offset is rounded to the nearest half hour and clamped to what
    /// seven bits can hold (-24h to +39.5h).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn encode(&self) -> u8 {
        let half_hours = (self.utc_offset * 2.0).round() + f64::from(OFFSET_BIAS);
        let encoded = half_hours.clamp(0.0, f64::from(OFFSET_MAX)) as u8;
        (encoded << 1) | u8::from(self.has_dst)
    }

    /// Offset from UTC in whole minutes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn utc_offset_minutes(&self) -> i32 {
        (self.utc_offset * 60.0).round() as i32
    }
}

impl fmt::Display for TimezoneInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utcOffset={}, has_dst={}", self.utc_offset, self.has_dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utc_with_dst() {
        let info = TimezoneInfo::decode(0x61);
        assert!(info.has_dst);
        assert!(info.utc_offset.abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_plus_six_without_dst() {
        let info = TimezoneInfo::decode(0x78);
        assert!(!info.has_dst);
        assert!((info.utc_offset - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_negative_and_half_hours() {
        // encoded 38 => -5h
        let info = TimezoneInfo::decode(38 << 1);
        assert!((info.utc_offset + 5.0).abs() < f64::EPSILON);

        // encoded 59 => +5.5h (India)
        let info = TimezoneInfo::decode((59 << 1) | 1);
        assert!((info.utc_offset - 5.5).abs() < f64::EPSILON);
        assert!(info.has_dst);
    }

    #[test]
    fn test_decode_extremes() {
        assert!((TimezoneInfo::decode(0x00).utc_offset + 24.0).abs() < f64::EPSILON);
        assert!((TimezoneInfo::decode(0xFF).utc_offset - 39.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_encode_matches_known_bytes() {
        let utc = TimezoneInfo {
            utc_offset: 0.0,
            has_dst: true,
        };
        assert_eq!(utc.encode(), 0x61);

        let plus_six = TimezoneInfo {
            utc_offset: 6.0,
            has_dst: false,
        };
        assert_eq!(plus_six.encode(), 0x78);
    }

    #[test]
    fn test_encode_clamps_out_of_range() {
        let far_west = TimezoneInfo {
            utc_offset: -30.0,
            has_dst: false,
        };
        assert_eq!(far_west.encode(), 0x00);

        let far_east = TimezoneInfo {
            utc_offset: 50.0,
            has_dst: true,
        };
        assert_eq!(far_east.encode(), 0xFF);
    }

    #[test]
    fn test_utc_offset_minutes() {
        let nepal = TimezoneInfo {
            utc_offset: 5.5,
            has_dst: false,
        };
        assert_eq!(nepal.utc_offset_minutes(), 330);

        let newfoundland = TimezoneInfo::decode((41 << 1) | 1);
        assert_eq!(newfoundland.utc_offset_minutes(), -210);
    }

    #[test]
    fn test_display() {
        let info = TimezoneInfo::decode(0x78);
        assert_eq!(info.to_string(), "utcOffset=6, has_dst=false");
    }

    #[test]
    fn test_serialize() {
        let info = TimezoneInfo::decode(0x61);
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"utc_offset\":0.0"));
        assert!(json.contains("\"has_dst\":true"));
    }
}
