use packed_struct::prelude::*;

use super::SegmentRecord;
use crate::signature::Signature;

/// Degrees are carried as 1e-7 degree fixed point.
pub const DEGREE_SCALE: f64 = 1e7;

/// Raw GPS fix as carried by the GPS segment.
#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "21")]
pub struct GPSFix {
    pub lat: i32,
    pub lon: i32,
    /// cm/s over ground
    pub speed: u16,
    pub satellites: u8,
    /// metres above mean sea level, clamped at 0
    pub altitude: u16,
    /// 4 BYTES. CS HR MIN SEC (CS = hundredths of a second)
    pub time: u32,
    /// 4 BYTES. XX YR MNTH DAY
    pub date: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
}

impl UtcTime {
    pub fn pack(&self) -> u32 {
        u32::from_be_bytes([self.hundredths, self.hour, self.minute, self.second])
    }

    pub fn unpack(packed: u32) -> Self {
        let [hundredths, hour, minute, second] = packed.to_be_bytes();
        Self {
            hour,
            minute,
            second,
            hundredths,
        }
    }
}

/// Calendar date with a two digit year, as reported by NMEA.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcDate {
    pub year: u8,
    pub month: u8,
    pub day: u8,
}

impl UtcDate {
    pub fn pack(&self) -> u32 {
        u32::from_be_bytes([0, self.year, self.month, self.day])
    }

    pub fn unpack(packed: u32) -> Self {
        let [_, year, month, day] = packed.to_be_bytes();
        Self { year, month, day }
    }
}

impl GPSFix {
    pub fn latitude(&self) -> f64 {
        self.lat as f64 / DEGREE_SCALE
    }

    pub fn longitude(&self) -> f64 {
        self.lon as f64 / DEGREE_SCALE
    }

    pub fn set_latitude(&mut self, degrees: f64) {
        self.lat = degrees_to_fixed(degrees);
    }

    pub fn set_longitude(&mut self, degrees: f64) {
        self.lon = degrees_to_fixed(degrees);
    }

    pub fn set_altitude(&mut self, metres: f64) {
        self.altitude = libm::round(metres).clamp(0.0, u16::MAX as f64) as u16;
    }

    pub fn utc_time(&self) -> UtcTime {
        UtcTime::unpack(self.time)
    }

    pub fn set_utc_time(&mut self, time: UtcTime) {
        self.time = time.pack();
    }

    pub fn utc_date(&self) -> UtcDate {
        UtcDate::unpack(self.date)
    }

    pub fn set_utc_date(&mut self, date: UtcDate) {
        self.date = date.pack();
    }

    pub fn has_position(&self) -> bool {
        self.lat != 0 || self.lon != 0
    }
}

pub fn degrees_to_fixed(degrees: f64) -> i32 {
    libm::round(degrees * DEGREE_SCALE).clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

impl SegmentRecord for GPSFix {
    const SIGNATURE: Signature = Signature::GPS;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GPSFix {
        GPSFix {
            lat: 432614200,
            lon: -799200400,
            speed: 1250,
            satellites: 9,
            altitude: 87,
            time: UtcTime {
                hour: 8,
                minute: 0,
                second: 23,
                hundredths: 50,
            }
            .pack(),
            date: UtcDate {
                year: 24,
                month: 6,
                day: 15,
            }
            .pack(),
        }
    }

    #[test]
    fn wire_layout() {
        let segment = sample().to_segment().unwrap();
        assert_eq!(segment.len(), 21);
        assert_eq!(&segment[0..4], &432614200i32.to_le_bytes());
        assert_eq!(&segment[4..8], &(-799200400i32).to_le_bytes());
        assert_eq!(&segment[8..10], &1250u16.to_le_bytes());
        assert_eq!(segment[10], 9);
        assert_eq!(&segment[11..13], &87u16.to_le_bytes());
        // time is little-endian too: SEC MIN HR CS
        assert_eq!(&segment[13..17], &[23, 0, 8, 50]);
        assert_eq!(&segment[17..21], &[15, 6, 24, 0]);
    }

    #[test]
    fn decode_segment() {
        let segment = sample().to_segment().unwrap();
        let fix = GPSFix::from_segment(&segment).unwrap();
        assert_eq!(fix, sample());
        assert_eq!(fix.utc_time().second, 23);
        assert_eq!(fix.utc_date().month, 6);
    }

    #[test]
    fn degree_conversion() {
        let mut fix = GPSFix::default();
        fix.set_latitude(37.001);
        fix.set_longitude(-122.0);
        fix.set_altitude(-3.2);
        assert_eq!(fix.lat, 370010000);
        assert_eq!(fix.lon, -1220000000);
        assert_eq!(fix.altitude, 0);
        assert!((fix.latitude() - 37.001).abs() < 1e-9);
    }
}
