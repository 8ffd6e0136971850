use packed_struct::prelude::*;

use super::SegmentRecord;
use crate::signature::Signature;

/// Driver configuration as sent over the link.
#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "6")]
pub struct ConfigRecord {
    pub baud_rate: u32,
    pub poll_time_ms: u16,
}

impl SegmentRecord for ConfigRecord {
    const SIGNATURE: Signature = Signature::Config;
}

#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "3")]
pub struct StatusRecord {
    pub state: u8,
    pub fault_flags: u16,
}

impl StatusRecord {
    pub fn is_healthy(&self) -> bool {
        self.fault_flags == 0
    }
}

impl SegmentRecord for StatusRecord {
    const SIGNATURE: Signature = Signature::Status;
}

/// Servo / ESC pulse widths in microseconds.
#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "16")]
pub struct ActuatorsRecord {
    pub aileron_left: u16,
    pub aileron_right: u16,
    pub elevator: u16,
    pub rudder: u16,
    pub throttle: u16,
    pub flaps: u16,
    pub aux_1: u16,
    pub aux_2: u16,
}

impl SegmentRecord for ActuatorsRecord {
    const SIGNATURE: Signature = Signature::Actuators;
}

#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "5")]
pub struct CmdsRecord {
    pub command: u8,
    pub argument: u32,
}

impl SegmentRecord for CmdsRecord {
    const SIGNATURE: Signature = Signature::Cmds;
}

/// Payload release state.
#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "6")]
pub struct DropRecord {
    pub armed: u8,
    pub released: u8,
    /// ms since boot at release, 0 if not released
    pub release_time_ms: u32,
}

impl DropRecord {
    pub fn is_released(&self) -> bool {
        self.released != 0
    }
}

impl SegmentRecord for DropRecord {
    const SIGNATURE: Signature = Signature::Drop;
}
