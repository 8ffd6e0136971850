pub type ProtocolResult<T> = core::result::Result<T, ProtocolError>;

/// Every way a frame or segment can be rejected. None of these are fatal,
/// the caller decides whether to drop the frame or ask for a resend.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Start or end marker did not match.
    Framing { expected: u8, actual: u8 },
    /// Declared length exceeds capacity, input is truncated, or a segment
    /// has the wrong size for its signature.
    Length { needed: usize, available: usize },
    /// CRC carried by the frame does not match the payload.
    Integrity { expected: u16, actual: u16 },
    /// Signature bits with no registry entry (only the offending bits).
    UnknownSignature(u16),
    PayloadTooLarge { size: usize, max: usize },
}
