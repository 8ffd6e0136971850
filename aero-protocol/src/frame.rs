use core::fmt;
use heapless::Vec;

use crate::checksum;
use crate::error::{ProtocolError, ProtocolResult};
use crate::signature::SignatureSet;

// frame structure: start(1) + link(2) + signature(2) + length(1) + payload + crc(2) + end(1)
// multi-byte fields are little-endian

pub const START_BYTE: u8 = 0xA5;
pub const END_BYTE: u8 = 0x5A;
pub const MAX_PAYLOAD_LEN: usize = 200;
pub const HEADER_LEN: usize = 6;
pub const TRAILER_LEN: usize = 3;
pub const MIN_FRAME_LEN: usize = HEADER_LEN + TRAILER_LEN;
pub const MAX_FRAME_LEN: usize = MIN_FRAME_LEN + MAX_PAYLOAD_LEN;

/// Routing field: who sent the frame and who it is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Link {
    pub sender: u8,
    pub recipient: u8,
}

impl Link {
    pub fn new(sender: u8, recipient: u8) -> Self {
        Self { sender, recipient }
    }

    pub fn from_bits(bits: u16) -> Self {
        let [sender, recipient] = bits.to_be_bytes();
        Self { sender, recipient }
    }

    pub fn bits(&self) -> u16 {
        u16::from_be_bytes([self.sender, self.recipient])
    }
}

/// The wire envelope. Only `payload[..length]` is meaningful.
#[derive(Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub link: Link,
    pub signature_bits: u16,
    length: u8,
    payload: [u8; MAX_PAYLOAD_LEN],
    crc: u16,
}

impl RawFrame {
    pub fn encode(link: Link, signature_bits: u16, payload: &[u8]) -> ProtocolResult<Self> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }

        let mut buffer = [0u8; MAX_PAYLOAD_LEN];
        buffer[..payload.len()].copy_from_slice(payload);

        Ok(Self {
            link,
            signature_bits,
            length: payload.len() as u8,
            payload: buffer,
            crc: checksum::compute(payload),
        })
    }

    /// Decodes one frame from the start of `bytes`; anything after the end
    /// marker is left for the caller (see [`RawFrame::encoded_len`]).
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(ProtocolError::Length {
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        }

        if bytes[0] != START_BYTE {
            return Err(ProtocolError::Framing {
                expected: START_BYTE,
                actual: bytes[0],
            });
        }

        let link = Link::from_bits(u16::from_le_bytes([bytes[1], bytes[2]]));
        let signature_bits = u16::from_le_bytes([bytes[3], bytes[4]]);
        let length = bytes[5] as usize;
        if length > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::Length {
                needed: length,
                available: MAX_PAYLOAD_LEN,
            });
        }

        let total_len = MIN_FRAME_LEN + length;
        if bytes.len() < total_len {
            return Err(ProtocolError::Length {
                needed: total_len,
                available: bytes.len(),
            });
        }

        if bytes[total_len - 1] != END_BYTE {
            return Err(ProtocolError::Framing {
                expected: END_BYTE,
                actual: bytes[total_len - 1],
            });
        }

        let payload = &bytes[HEADER_LEN..HEADER_LEN + length];
        let crc = u16::from_le_bytes([bytes[HEADER_LEN + length], bytes[HEADER_LEN + length + 1]]);
        if !checksum::validate(payload, crc) {
            return Err(ProtocolError::Integrity {
                expected: crc,
                actual: checksum::compute(payload),
            });
        }

        let mut buffer = [0u8; MAX_PAYLOAD_LEN];
        buffer[..length].copy_from_slice(payload);

        Ok(Self {
            link,
            signature_bits,
            length: length as u8,
            payload: buffer,
            crc,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.length as usize]
    }

    pub fn len(&self) -> usize {
        self.length as usize
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn crc(&self) -> u16 {
        self.crc
    }

    pub fn signatures(&self) -> ProtocolResult<SignatureSet> {
        SignatureSet::from_wire(self.signature_bits)
    }

    /// Bytes this frame occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        MIN_FRAME_LEN + self.len()
    }

    pub fn serialize_into(&self, buffer: &mut [u8]) -> ProtocolResult<usize> {
        let total_len = self.encoded_len();
        if buffer.len() < total_len {
            return Err(ProtocolError::Length {
                needed: total_len,
                available: buffer.len(),
            });
        }

        let length = self.len();
        buffer[0] = START_BYTE;
        buffer[1..3].copy_from_slice(&self.link.bits().to_le_bytes());
        buffer[3..5].copy_from_slice(&self.signature_bits.to_le_bytes());
        buffer[5] = self.length;
        buffer[HEADER_LEN..HEADER_LEN + length].copy_from_slice(self.payload());
        buffer[HEADER_LEN + length..HEADER_LEN + length + 2].copy_from_slice(&self.crc.to_le_bytes());
        buffer[total_len - 1] = END_BYTE;

        Ok(total_len)
    }

    pub fn serialize(&self) -> Vec<u8, MAX_FRAME_LEN> {
        let mut buffer = [0u8; MAX_FRAME_LEN];
        let length = self.serialize_into(&mut buffer).unwrap_or(0);
        buffer[..length].iter().copied().collect()
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("link", &self.link)
            .field("signature_bits", &format_args!("{:#06x}", self.signature_bits))
            .field("length", &self.length)
            .field("payload", &self.payload())
            .field("crc", &format_args!("{:#06x}", self.crc))
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RawFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "RawFrame {{ link: {}, signature_bits: {=u16:#x}, payload: {=[u8]}, crc: {=u16:#x} }}",
            self.link,
            self.signature_bits,
            self.payload(),
            self.crc,
        )
    }
}
