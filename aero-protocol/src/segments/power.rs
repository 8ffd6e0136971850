use packed_struct::prelude::*;

use super::SegmentRecord;
use crate::signature::Signature;

#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "4")]
pub struct BattRecord {
    pub voltage_mv: u16,
    /// Positive when discharging.
    pub current_ma: i16,
}

impl BattRecord {
    pub fn voltage(&self) -> f32 {
        self.voltage_mv as f32 / 1000.0
    }

    pub fn power_mw(&self) -> i32 {
        self.voltage_mv as i32 * self.current_ma as i32 / 1000
    }
}

impl SegmentRecord for BattRecord {
    const SIGNATURE: Signature = Signature::Batt;
}
