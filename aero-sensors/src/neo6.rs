use aero_protocol::GPSFix;
use embedded_io::{Read, Write};
use nmea::Nmea;

use crate::gps::{GPSConfig, GPSError, GPS};
use crate::sentence::{self, NmeaError, Sentence};

const SUPPORTED_BAUD_RATES: [u32; 7] = [4800, 9600, 19200, 38400, 57600, 115200, 230400];
/// The NEO-6 tops out at 5 Hz navigation updates.
const MIN_POLL_TIME_MS: u16 = 200;
const READ_CHUNK_LEN: usize = 64;

const UBX_SYNC: [u8; 2] = [0xB5, 0x62];
const UBX_CLASS_CFG: u8 = 0x06;
const UBX_ID_CFG_RATE: u8 = 0x08;
pub const CFG_RATE_LEN: usize = 14;

/// 8-bit Fletcher over class, id, length and payload.
pub fn ubx_checksum(bytes: &[u8]) -> [u8; 2] {
    let mut ck_a = 0u8;
    let mut ck_b = 0u8;
    for byte in bytes {
        ck_a = ck_a.wrapping_add(*byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }
    [ck_a, ck_b]
}

/// UBX CFG-RATE: measurement period, one navigation solution per
/// measurement, aligned to GPS time.
pub fn cfg_rate_message(poll_time_ms: u16) -> [u8; CFG_RATE_LEN] {
    let mut message = [0u8; CFG_RATE_LEN];
    message[0..2].copy_from_slice(&UBX_SYNC);
    message[2] = UBX_CLASS_CFG;
    message[3] = UBX_ID_CFG_RATE;
    message[4..6].copy_from_slice(&6u16.to_le_bytes());
    message[6..8].copy_from_slice(&poll_time_ms.to_le_bytes());
    message[8..10].copy_from_slice(&1u16.to_le_bytes());
    message[10..12].copy_from_slice(&1u16.to_le_bytes());
    let checksum = ubx_checksum(&message[2..12]);
    message[12..14].copy_from_slice(&checksum);
    message
}

/// u-blox NEO-6 on a UART. The port is assumed to already run at
/// `config.baud_rate`; opening it is the caller's job.
pub struct Neo6GPS<S: Read + Write> {
    serial: S,
    config: GPSConfig,
    data: GPSFix,
    nmea: Nmea,
    sentence: Sentence,
    initialized: bool,
}

impl<S: Read + Write> Neo6GPS<S> {
    pub fn new(serial: S) -> Self {
        Self {
            serial,
            config: GPSConfig::default(),
            data: GPSFix::default(),
            nmea: Nmea::default(),
            sentence: Sentence::new(),
            initialized: false,
        }
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    pub fn release(self) -> S {
        self.serial
    }

    fn validate_config(&self) -> bool {
        SUPPORTED_BAUD_RATES.contains(&self.config.baud_rate)
            && self.config.poll_time_ms >= MIN_POLL_TIME_MS
    }

    /// Feeds one byte into the sentence buffer. Returns whether a complete
    /// sentence updated the fix.
    fn push_byte(&mut self, byte: u8) -> bool {
        match byte {
            b'$' => {
                self.sentence.clear();
                // capacity is never exceeded on an empty buffer
                let _ = self.sentence.push('$');
                false
            }
            b'\n' => {
                if self.sentence.is_empty() {
                    return false;
                }
                let updated = self.process_sentence();
                self.sentence.clear();
                updated
            }
            // nothing is buffered until the first '$'
            _ if self.sentence.is_empty() => false,
            _ => {
                if !byte.is_ascii() || self.sentence.push(byte as char).is_err() {
                    log_debug!("dropping overlong or non-ascii NMEA sentence");
                    self.sentence.clear();
                }
                false
            }
        }
    }

    fn process_sentence(&mut self) -> bool {
        match sentence::parse_into(&mut self.nmea, &self.sentence, &mut self.data) {
            Ok(()) => true,
            Err(NmeaError::Unsupported) => false,
            Err(error) => {
                log_debug!("skipping NMEA sentence: {:?}", error);
                false
            }
        }
    }
}

impl<S: Read + Write> GPS for Neo6GPS<S> {
    type Error = GPSError<S::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        if !self.validate_config() {
            log_warn!(
                "rejecting GPS config: baud {}, poll {} ms",
                self.config.baud_rate,
                self.config.poll_time_ms
            );
            return Err(GPSError::InvalidConfig);
        }

        self.sentence.clear();
        self.nmea = Nmea::default();
        let message = cfg_rate_message(self.config.poll_time_ms);
        self.serial
            .write_all(&message)
            .map_err(GPSError::SerialError)?;
        self.serial.flush().map_err(GPSError::SerialError)?;

        log_info!(
            "NEO-6 initialized: baud {}, poll {} ms",
            self.config.baud_rate,
            self.config.poll_time_ms
        );
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

        let mut buffer = [0u8; READ_CHUNK_LEN];
        let read = self.serial.read(&mut buffer).map_err(GPSError::SerialError)?;
        log_trace!("read {} bytes from GPS", read);

        let mut updated = false;
        for byte in &buffer[..read] {
            updated |= self.push_byte(*byte);
        }
        Ok(updated)
    }

    fn data(&self) -> &GPSFix {
        &self.data
    }
}
