use core::convert::Infallible;

use aero_protocol::{ConfigRecord, GPSFix, ProtocolError};

use crate::sentence::NmeaError;

/// Serial settings handed to a driver at `init`. Travels on the link as
/// the `Config` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GPSConfig {
    pub baud_rate: u32,
    pub poll_time_ms: u16,
}

impl Default for GPSConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            poll_time_ms: 1000,
        }
    }
}

impl From<ConfigRecord> for GPSConfig {
    fn from(record: ConfigRecord) -> Self {
        Self {
            baud_rate: record.baud_rate,
            poll_time_ms: record.poll_time_ms,
        }
    }
}

impl From<GPSConfig> for ConfigRecord {
    fn from(config: GPSConfig) -> Self {
        Self {
            baud_rate: config.baud_rate,
            poll_time_ms: config.poll_time_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GPSError<E> {
    SerialError(E),
    NmeaError(NmeaError),
    ProtocolError(ProtocolError),
    NotInitialized,
    InvalidConfig,
}

impl<E> From<NmeaError> for GPSError<E> {
    fn from(error: NmeaError) -> Self {
        GPSError::NmeaError(error)
    }
}

impl<E> From<ProtocolError> for GPSError<E> {
    fn from(error: ProtocolError) -> Self {
        GPSError::ProtocolError(error)
    }
}

pub trait GPS {
    type Error;

    fn init(&mut self) -> Result<(), Self::Error>;

    fn init_with_config(&mut self, config: GPSConfig) -> Result<(), Self::Error> {
        self.set_config(config);
        self.init()
    }

    /// Takes effect on the next `init`.
    fn set_config(&mut self, config: GPSConfig);

    fn config(&self) -> &GPSConfig;

    /// Polls the receiver once. `Ok(true)` when the fix changed.
    fn update(&mut self) -> Result<bool, Self::Error>;

    /// Latest fix; all zeroes until the receiver reports one.
    fn data(&self) -> &GPSFix;
}

impl<G: GPS> GPS for &mut G {
    type Error = G::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        (**self).init()
    }

    fn init_with_config(&mut self, config: GPSConfig) -> Result<(), Self::Error> {
        (**self).init_with_config(config)
    }

    fn set_config(&mut self, config: GPSConfig) {
        (**self).set_config(config)
    }

    fn config(&self) -> &GPSConfig {
        (**self).config()
    }

    fn update(&mut self) -> Result<bool, Self::Error> {
        (**self).update()
    }

    fn data(&self) -> &GPSFix {
        (**self).data()
    }
}

/// Stands in for a receiver on the bench: reports the same fix forever.
pub struct DummyGPS {
    config: GPSConfig,
    data: GPSFix,
    initialized: bool,
}

impl DummyGPS {
    pub fn new(data: GPSFix) -> Self {
        Self {
            config: GPSConfig::default(),
            data,
            initialized: false,
        }
    }

    pub fn set_data(&mut self, data: GPSFix) {
        self.data = data;
    }
}

impl GPS for DummyGPS {
    type Error = GPSError<Infallible>;

    fn init(&mut self) -> Result<(), Self::Error> {
        log_info!("dummy GPS initialized");
        self.initialized = true;
        Ok(())
    }

    fn set_config(&mut self, config: GPSConfig) {
        self.config = config;
    }

    fn config(&self) -> &GPSConfig {
        &self.config
    }

    fn update(&mut self) -> Result<bool, Self::Error> {
        if !self.initialized {
            return Err(GPSError::NotInitialized);
        }
        Ok(true)
    }

    fn data(&self) -> &GPSFix {
        &self.data
    }
}
