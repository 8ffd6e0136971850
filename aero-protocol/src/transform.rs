//! Flat-earth offsets from a zero point, good for the few kilometres a
//! flight covers.

use libm::cos;

use crate::segments::gps::GPSFix;

/// Rounded degree to radian factor. Kept as is so offsets match the
/// ground station bit for bit; it is not exactly pi/180.
pub const DEG_TO_RAD: f64 = 0.0174533;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReferencePoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Metres from the reference point. X east, Y north, Z down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Latitude and longitude scale factors for a position. Each series is
/// driven by its own angle, so the longitude scale is signed: it goes
/// negative past 90 degrees east or west.
pub fn metres_per_degree(latitude: f64, longitude: f64) -> (f64, f64) {
    let lat_rad = DEG_TO_RAD * latitude;
    let lon_rad = DEG_TO_RAD * longitude;

    let lat_to_metre = 111132.92 - 559.82 * cos(2.0 * lat_rad) + 1.175 * cos(4.0 * lat_rad)
        - 0.0023 * cos(6.0 * lat_rad);
    let lon_to_metre =
        111412.84 * cos(lon_rad) - 93.5 * cos(3.0 * lon_rad) + 0.118 * cos(5.0 * lon_rad);

    (lat_to_metre, lon_to_metre)
}

/// Holds the zero point. Inputs are never range checked, a bad reference
/// just gives bad offsets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoordinateTransform {
    reference: ReferencePoint,
}

impl CoordinateTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(reference: ReferencePoint) -> Self {
        Self { reference }
    }

    pub fn set_reference(&mut self, latitude: f64, longitude: f64, altitude: f64) {
        self.reference = ReferencePoint {
            latitude,
            longitude,
            altitude,
        };
    }

    pub fn reference(&self) -> &ReferencePoint {
        &self.reference
    }

    pub fn compute_offset(&self, latitude: f64, longitude: f64, altitude: f64) -> LocalOffset {
        let (lat_to_metre, lon_to_metre) = metres_per_degree(latitude, longitude);

        LocalOffset {
            x: lon_to_metre * (longitude - self.reference.longitude),
            y: lat_to_metre * (latitude - self.reference.latitude),
            // positive when below the reference
            z: self.reference.altitude - altitude,
        }
    }

    pub fn zero_at(&mut self, fix: &GPSFix) {
        self.set_reference(fix.latitude(), fix.longitude(), fix.altitude as f64);
    }

    pub fn offset_of_fix(&self, fix: &GPSFix) -> LocalOffset {
        self.compute_offset(fix.latitude(), fix.longitude(), fix.altitude as f64)
    }
}
