use crate::error::{ProtocolError, ProtocolResult};
use crate::frame::{Link, RawFrame, MAX_PAYLOAD_LEN};
use crate::segments::{Segment, SegmentRecord};
use crate::signature::{Signature, SignatureSet, MAX_SEGMENT_LEN};

/// A frame split into per-signature segments. Each populated slot is owned
/// by this message alone; cloning copies the buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParsedMessage {
    pub sender: u8,
    pub recipient: u8,
    segments: [Option<Segment>; Signature::COUNT],
}

impl ParsedMessage {
    pub fn new(sender: u8, recipient: u8) -> Self {
        Self {
            sender,
            recipient,
            segments: core::array::from_fn(|_| None),
        }
    }

    /// Distributes a validated frame's payload into slots, in ordinal order.
    pub fn from_frame(frame: &RawFrame) -> ProtocolResult<Self> {
        let present = frame.signatures()?;
        let payload = frame.payload();
        let mut message = Self::new(frame.link.sender, frame.link.recipient);

        let expected = present.payload_len();
        if expected != payload.len() {
            return Err(ProtocolError::Length {
                needed: expected,
                available: payload.len(),
            });
        }

        let mut offset = 0;
        for signature in present.signatures() {
            let end = offset + signature.segment_len();
            message.set_segment(signature, &payload[offset..end])?;
            offset = end;
        }

        Ok(message)
    }

    /// Concatenates every populated segment in ordinal order and frames it.
    pub fn to_frame(&self, link: Link) -> ProtocolResult<RawFrame> {
        let present = self.signatures();
        let size: usize = self
            .segments
            .iter()
            .flatten()
            .map(|segment| segment.len())
            .sum();
        if size > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge {
                size,
                max: MAX_PAYLOAD_LEN,
            });
        }

        let mut payload = [0u8; MAX_PAYLOAD_LEN];
        let mut offset = 0;
        for segment in self.segments.iter().flatten() {
            payload[offset..offset + segment.len()].copy_from_slice(segment);
            offset += segment.len();
        }

        RawFrame::encode(link, present.bits(), &payload[..offset])
    }

    pub fn link(&self) -> Link {
        Link::new(self.sender, self.recipient)
    }

    /// Borrowed view of a slot, `None` if it was never populated.
    pub fn segment(&self, signature: Signature) -> Option<&[u8]> {
        self.segments[signature.slot()].as_deref()
    }

    /// Decodes the slot for `R` through its checked decoder.
    pub fn record<R: SegmentRecord>(&self) -> ProtocolResult<Option<R>> {
        self.segment(R::SIGNATURE)
            .map(R::from_segment)
            .transpose()
    }

    pub fn set_segment(&mut self, signature: Signature, bytes: &[u8]) -> ProtocolResult<()> {
        if bytes.len() != signature.segment_len() {
            return Err(ProtocolError::Length {
                needed: signature.segment_len(),
                available: bytes.len(),
            });
        }
        let segment = Segment::from_slice(bytes).map_err(|_| ProtocolError::Length {
            needed: bytes.len(),
            available: MAX_SEGMENT_LEN,
        })?;
        self.segments[signature.slot()] = Some(segment);
        Ok(())
    }

    pub fn insert_record<R: SegmentRecord>(&mut self, record: &R) -> ProtocolResult<()> {
        let segment = record.to_segment()?;
        self.set_segment(R::SIGNATURE, &segment)
    }

    /// Moves a segment out, leaving the slot empty.
    pub fn take_segment(&mut self, signature: Signature) -> Option<Segment> {
        self.segments[signature.slot()].take()
    }

    pub fn clear_segment(&mut self, signature: Signature) {
        self.segments[signature.slot()] = None;
    }

    pub fn signatures(&self) -> SignatureSet {
        Signature::ALL
            .iter()
            .filter(|signature| self.segments[signature.slot()].is_some())
            .fold(SignatureSet::empty(), |set, signature| {
                set | SignatureSet::from(*signature)
            })
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::air_data::EnviroRecord;
    use crate::segments::control::{CmdsRecord, ConfigRecord};
    use crate::segments::gps::GPSFix;
    use crate::segments::imu::IMURecord;
    use crate::segments::power::BattRecord;

    fn gps_fix() -> GPSFix {
        GPSFix {
            lat: 370000000,
            lon: -1220000000,
            speed: 310,
            satellites: 7,
            altitude: 10,
            time: 0x00_0C_1E_05,
            date: 0x00_18_06_0F,
        }
    }

    #[test]
    fn gps_only_frame() {
        let segment = gps_fix().to_segment().unwrap();
        let frame = RawFrame::encode(Link::new(3, 1), Signature::GPS.bit(), &segment).unwrap();
        let bytes = frame.serialize();

        let decoded = RawFrame::decode(&bytes).unwrap();
        let message = ParsedMessage::from_frame(&decoded).unwrap();

        assert_eq!(message.sender, 3);
        assert_eq!(message.recipient, 1);
        assert_eq!(message.segment(Signature::IMU), None);
        assert_eq!(message.segment(Signature::GPS), Some(&segment[..]));
        assert_eq!(message.record::<GPSFix>(), Ok(Some(gps_fix())));
        assert_eq!(message.record::<IMURecord>(), Ok(None));
        assert_eq!(message.signatures(), SignatureSet::GPS);
    }

    #[test]
    fn round_trip_through_wire() {
        let mut message = ParsedMessage::new(0x10, 0x20);
        message.insert_record(&gps_fix()).unwrap();
        message
            .insert_record(&BattRecord {
                voltage_mv: 11100,
                current_ma: 1500,
            })
            .unwrap();
        message
            .insert_record(&IMURecord {
                acc_z: 1000,
                gyro_x: -12,
                ..Default::default()
            })
            .unwrap();
        message
            .insert_record(&CmdsRecord {
                command: 2,
                argument: 500,
            })
            .unwrap();

        let frame = message.to_frame(message.link()).unwrap();
        assert_eq!(
            frame.signature_bits,
            (SignatureSet::IMU | SignatureSet::GPS | SignatureSet::BATT | SignatureSet::CMDS).bits()
        );
        assert_eq!(frame.len(), 18 + 21 + 4 + 5);

        let decoded = ParsedMessage::from_frame(&RawFrame::decode(&frame.serialize()).unwrap()).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn every_signature_round_trips() {
        let mut message = ParsedMessage::new(1, 2);
        for signature in Signature::ALL {
            let bytes: heapless::Vec<u8, 32> = (0..signature.segment_len())
                .map(|i| (signature.ordinal() << 4) | i as u8)
                .collect();
            message.set_segment(signature, &bytes).unwrap();
        }
        let frame = message.to_frame(message.link()).unwrap();
        assert_eq!(frame.signature_bits, 0x07FF);
        assert_eq!(ParsedMessage::from_frame(&frame).unwrap(), message);
    }

    #[test]
    fn segments_are_laid_out_in_ordinal_order() {
        let mut message = ParsedMessage::new(0, 0);
        message
            .insert_record(&ConfigRecord {
                baud_rate: 9600,
                poll_time_ms: 100,
            })
            .unwrap();
        message.insert_record(&EnviroRecord::default()).unwrap();

        let frame = message.to_frame(Link::default()).unwrap();
        // Enviro (3) precedes Config (5)
        assert_eq!(&frame.payload()[8..12], &9600u32.to_le_bytes());
    }

    #[test]
    fn unknown_signature_bit() {
        let frame = RawFrame::encode(Link::default(), 0x8000, &[]).unwrap();
        assert_eq!(
            ParsedMessage::from_frame(&frame),
            Err(ProtocolError::UnknownSignature(0x8000))
        );
    }

    #[test]
    fn payload_shorter_than_signatures_claim() {
        let frame = RawFrame::encode(Link::default(), Signature::GPS.bit(), &[0u8; 20]).unwrap();
        assert_eq!(
            ParsedMessage::from_frame(&frame),
            Err(ProtocolError::Length {
                needed: 21,
                available: 20
            })
        );
    }

    #[test]
    fn payload_checked_against_all_claimed_segments() {
        let bits = Signature::GPS.bit() | Signature::Batt.bit();
        let frame = RawFrame::encode(Link::default(), bits, &[0u8; 22]).unwrap();
        assert_eq!(
            ParsedMessage::from_frame(&frame),
            Err(ProtocolError::Length {
                needed: 25,
                available: 22
            })
        );
    }

    #[test]
    fn payload_longer_than_signatures_claim() {
        let frame = RawFrame::encode(Link::default(), Signature::Batt.bit(), &[0u8; 6]).unwrap();
        assert_eq!(
            ParsedMessage::from_frame(&frame),
            Err(ProtocolError::Length {
                needed: 4,
                available: 6
            })
        );
    }

    #[test]
    fn wrong_segment_size() {
        let mut message = ParsedMessage::new(0, 0);
        assert_eq!(
            message.set_segment(Signature::Status, &[0u8; 4]),
            Err(ProtocolError::Length {
                needed: 3,
                available: 4
            })
        );
        assert!(message.is_empty());
    }

    #[test]
    fn take_and_clear() {
        let mut message = ParsedMessage::new(0, 0);
        message.insert_record(&gps_fix()).unwrap();
        message.insert_record(&BattRecord::default()).unwrap();

        let taken = message.take_segment(Signature::GPS).unwrap();
        assert_eq!(GPSFix::from_segment(&taken), Ok(gps_fix()));
        assert_eq!(message.segment(Signature::GPS), None);

        message.clear_segment(Signature::Batt);
        assert!(message.is_empty());

        let frame = message.to_frame(Link::default()).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.signature_bits, 0);
    }
}
