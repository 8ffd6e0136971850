use packed_struct::prelude::*;

use super::SegmentRecord;
use crate::signature::Signature;

/// Nine-axis IMU sample in sensor units.
#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "18")]
pub struct IMURecord {
    /// milli-g
    pub acc_x: i16,
    pub acc_y: i16,
    pub acc_z: i16,
    /// 0.1 deg/s
    pub gyro_x: i16,
    pub gyro_y: i16,
    pub gyro_z: i16,
    /// milli-gauss
    pub mag_x: i16,
    pub mag_y: i16,
    pub mag_z: i16,
}

impl IMURecord {
    /// Acceleration in m/s^2.
    pub fn acc(&self) -> [f32; 3] {
        const MG_TO_MS2: f32 = 9.80665 / 1000.0;
        [
            self.acc_x as f32 * MG_TO_MS2,
            self.acc_y as f32 * MG_TO_MS2,
            self.acc_z as f32 * MG_TO_MS2,
        ]
    }

    /// Angular rate in deg/s.
    pub fn gyro(&self) -> [f32; 3] {
        [
            self.gyro_x as f32 / 10.0,
            self.gyro_y as f32 / 10.0,
            self.gyro_z as f32 / 10.0,
        ]
    }
}

impl SegmentRecord for IMURecord {
    const SIGNATURE: Signature = Signature::IMU;
}
