#![cfg_attr(not(test), no_std)]

// must come first so the logging macros are visible to the other modules
#[macro_use]
mod fmt;

pub mod gps;
pub mod neo6;
pub mod positioning;
pub mod sentence;

pub use gps::{DummyGPS, GPSConfig, GPSError, GPS};
pub use neo6::Neo6GPS;
pub use positioning::LocalPositioner;
pub use sentence::NmeaError;
