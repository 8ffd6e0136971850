use bitflags::bitflags;

use crate::error::{ProtocolError, ProtocolResult};

/// Payload kind carried by a segment. The ordinal is both the slot index in
/// a parsed message and the bit position in the frame's signature field, so
/// the order here must never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Signature {
    Pitot = 0,
    IMU = 1,
    GPS = 2,
    Enviro = 3,
    Batt = 4,
    Config = 5,
    Status = 6,
    Actuators = 7,
    AData = 8,
    Cmds = 9,
    Drop = 10,
}

impl Signature {
    pub const COUNT: usize = 11;

    pub const ALL: [Signature; Signature::COUNT] = [
        Signature::Pitot,
        Signature::IMU,
        Signature::GPS,
        Signature::Enviro,
        Signature::Batt,
        Signature::Config,
        Signature::Status,
        Signature::Actuators,
        Signature::AData,
        Signature::Cmds,
        Signature::Drop,
    ];

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn slot(self) -> usize {
        self as usize
    }

    pub const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Size in bytes of this signature's record on the wire.
    pub const fn segment_len(self) -> usize {
        match self {
            Signature::Pitot => 6,
            Signature::IMU => 18,
            Signature::GPS => 21,
            Signature::Enviro => 8,
            Signature::Batt => 4,
            Signature::Config => 6,
            Signature::Status => 3,
            Signature::Actuators => 16,
            Signature::AData => 8,
            Signature::Cmds => 5,
            Signature::Drop => 6,
        }
    }
}

/// Largest record in the registry, the capacity of a segment buffer.
pub const MAX_SEGMENT_LEN: usize = Signature::GPS.segment_len();

bitflags! {
    /// The signature field of a frame: which segments the payload carries.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SignatureSet: u16 {
        const PITOT = 1 << 0;
        const IMU = 1 << 1;
        const GPS = 1 << 2;
        const ENVIRO = 1 << 3;
        const BATT = 1 << 4;
        const CONFIG = 1 << 5;
        const STATUS = 1 << 6;
        const ACTUATORS = 1 << 7;
        const ADATA = 1 << 8;
        const CMDS = 1 << 9;
        const DROP = 1 << 10;
    }
}

impl SignatureSet {
    /// Strict conversion of a signature field read off the wire.
    pub fn from_wire(bits: u16) -> ProtocolResult<Self> {
        Self::from_bits(bits).ok_or(ProtocolError::UnknownSignature(
            bits & !Self::all().bits(),
        ))
    }

    pub fn has(&self, signature: Signature) -> bool {
        self.contains(signature.into())
    }

    /// Present signatures in ordinal order, which is also payload order.
    pub fn signatures(self) -> impl Iterator<Item = Signature> {
        Signature::ALL
            .into_iter()
            .filter(move |signature| self.has(*signature))
    }

    /// Bytes a payload carrying exactly these segments occupies.
    pub fn payload_len(&self) -> usize {
        self.signatures().map(Signature::segment_len).sum()
    }
}

impl From<Signature> for SignatureSet {
    fn from(signature: Signature) -> Self {
        SignatureSet::from_bits_retain(signature.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_stable() {
        for (i, signature) in Signature::ALL.iter().enumerate() {
            assert_eq!(signature.slot(), i);
            assert_eq!(Signature::from_ordinal(i as u8), Some(*signature));
        }
        assert_eq!(Signature::GPS.ordinal(), 2);
        assert_eq!(Signature::Drop.bit(), 0x0400);
        assert_eq!(Signature::from_ordinal(11), None);
    }

    #[test]
    fn flag_constants_match_bits() {
        assert_eq!(SignatureSet::from(Signature::Pitot), SignatureSet::PITOT);
        assert_eq!(SignatureSet::from(Signature::GPS), SignatureSet::GPS);
        assert_eq!(SignatureSet::from(Signature::AData), SignatureSet::ADATA);
        assert_eq!(SignatureSet::from(Signature::Drop), SignatureSet::DROP);
        assert_eq!(SignatureSet::all().bits(), 0x07FF);
    }

    #[test]
    fn unknown_bits_are_rejected() {
        assert_eq!(
            SignatureSet::from_wire(0x0804),
            Err(ProtocolError::UnknownSignature(0x0800))
        );
        assert_eq!(SignatureSet::from_wire(0x0004), Ok(SignatureSet::GPS));
        assert_eq!(SignatureSet::from_wire(0), Ok(SignatureSet::empty()));
    }

    #[test]
    fn signatures_iterate_in_ordinal_order() {
        let set = SignatureSet::DROP | SignatureSet::PITOT | SignatureSet::GPS;
        let mut iter = set.signatures();
        assert_eq!(iter.next(), Some(Signature::Pitot));
        assert_eq!(iter.next(), Some(Signature::GPS));
        assert_eq!(iter.next(), Some(Signature::Drop));
        assert_eq!(iter.next(), None);
        assert_eq!(set.payload_len(), 6 + 21 + 6);
    }

    #[test]
    fn every_segment_fits_a_frame_together() {
        assert!(SignatureSet::all().payload_len() <= crate::frame::MAX_PAYLOAD_LEN);
        assert!(Signature::ALL
            .iter()
            .all(|signature| signature.segment_len() <= MAX_SEGMENT_LEN));
    }
}
