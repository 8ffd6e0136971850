#![cfg_attr(not(test), no_std)]

pub use error::{ProtocolError, ProtocolResult};
pub use frame::{Link, RawFrame, END_BYTE, MAX_FRAME_LEN, MAX_PAYLOAD_LEN, START_BYTE};
pub use message::ParsedMessage;
pub use segments::air_data::{ADataRecord, EnviroRecord, PitotRecord};
pub use segments::control::{ActuatorsRecord, CmdsRecord, ConfigRecord, DropRecord, StatusRecord};
pub use segments::gps::{GPSFix, UtcDate, UtcTime};
pub use segments::imu::IMURecord;
pub use segments::power::BattRecord;
pub use segments::{Segment, SegmentRecord};
pub use signature::{Signature, SignatureSet, MAX_SEGMENT_LEN};
pub use transform::{CoordinateTransform, LocalOffset, ReferencePoint};

pub mod checksum;
mod error;
pub mod frame;
mod message;
pub mod segments;
mod signature;
pub mod transform;
