//! CRC-16/USB over the frame payload (poly 0x8005, reflected, init and
//! xorout 0xFFFF). Both ends of the link must use this exact variant.

use ::crc::{Crc, CRC_16_USB};

pub const FRAME_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_USB);

pub fn compute(payload: &[u8]) -> u16 {
    FRAME_CRC.checksum(payload)
}

pub fn validate(payload: &[u8], crc: u16) -> bool {
    compute(payload) == crc
}
