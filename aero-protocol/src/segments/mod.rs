use core::fmt::Debug;
use heapless::Vec;
use packed_struct::prelude::*;
use packed_bits::ByteArray;

use crate::error::{ProtocolError, ProtocolResult};
use crate::signature::{Signature, MAX_SEGMENT_LEN};

pub mod air_data;
pub mod control;
pub mod gps;
pub mod imu;
pub mod power;

/// Owned payload of one slot.
pub type Segment = Vec<u8, MAX_SEGMENT_LEN>;

/// A fixed-layout record that travels as the segment for `SIGNATURE`.
/// All records are packed little-endian with no padding.
pub trait SegmentRecord: PackedStruct + Clone + Debug {
    const SIGNATURE: Signature;

    fn to_segment(&self) -> ProtocolResult<Segment> {
        let expected = Self::SIGNATURE.segment_len();
        let packed = self.pack().map_err(|_| ProtocolError::Length {
            needed: expected,
            available: 0,
        })?;
        let bytes = packed.as_bytes_slice();
        if bytes.len() != expected {
            return Err(ProtocolError::Length {
                needed: expected,
                available: bytes.len(),
            });
        }
        Vec::from_slice(bytes).map_err(|_| ProtocolError::Length {
            needed: expected,
            available: MAX_SEGMENT_LEN,
        })
    }

    /// Checked decode: the buffer must be exactly the registry size.
    fn from_segment(bytes: &[u8]) -> ProtocolResult<Self> {
        let expected = Self::SIGNATURE.segment_len();
        let mut packed = Self::ByteArray::new(0);
        if bytes.len() != expected || Self::ByteArray::len() != expected {
            return Err(ProtocolError::Length {
                needed: expected,
                available: bytes.len(),
            });
        }
        packed.as_mut_bytes_slice().copy_from_slice(bytes);
        Self::unpack(&packed).map_err(|_| ProtocolError::Length {
            needed: expected,
            available: bytes.len(),
        })
    }

    fn len() -> usize {
        Self::ByteArray::len()
    }
}

#[cfg(test)]
mod tests {
    use super::air_data::{ADataRecord, EnviroRecord, PitotRecord};
    use super::control::{ActuatorsRecord, CmdsRecord, ConfigRecord, DropRecord, StatusRecord};
    use super::gps::GPSFix;
    use super::imu::IMURecord;
    use super::power::BattRecord;
    use super::*;

    fn assert_registry_size<R: SegmentRecord>() {
        assert_eq!(
            <R as SegmentRecord>::len(),
            R::SIGNATURE.segment_len(),
            "{:?} layout disagrees with the registry",
            R::SIGNATURE
        );
    }

    #[test]
    fn record_layouts_match_registry() {
        assert_registry_size::<PitotRecord>();
        assert_registry_size::<IMURecord>();
        assert_registry_size::<GPSFix>();
        assert_registry_size::<EnviroRecord>();
        assert_registry_size::<BattRecord>();
        assert_registry_size::<ConfigRecord>();
        assert_registry_size::<StatusRecord>();
        assert_registry_size::<ActuatorsRecord>();
        assert_registry_size::<ADataRecord>();
        assert_registry_size::<CmdsRecord>();
        assert_registry_size::<DropRecord>();
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert_eq!(
            BattRecord::from_segment(&[0x01, 0x02, 0x03]),
            Err(ProtocolError::Length {
                needed: 4,
                available: 3
            })
        );
    }

    #[test]
    fn records_are_little_endian() {
        let batt = BattRecord {
            voltage_mv: 0x1234,
            current_ma: -2,
        };
        let segment = batt.to_segment().unwrap();
        assert_eq!(&segment[..], &[0x34, 0x12, 0xFE, 0xFF]);
        assert_eq!(BattRecord::from_segment(&segment).unwrap(), batt);
    }
}
