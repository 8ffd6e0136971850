use aero_protocol::{
    ADataRecord, ActuatorsRecord, BattRecord, CmdsRecord, ConfigRecord, DropRecord, EnviroRecord,
    GPSFix, IMURecord, ParsedMessage, PitotRecord, ProtocolResult, RawFrame, SegmentRecord,
    Signature, StatusRecord, START_BYTE,
};
use anyhow::{anyhow, Result};
use log::{debug, info, warn};

use crate::DecodeArgs;

/// Frames found in a capture, plus how many bytes were thrown away between
/// them.
pub struct Scan {
    pub messages: Vec<ParsedMessage>,
    pub skipped: usize,
}

/// Walks `bytes` frame by frame. Anything that does not decode is skipped
/// one byte at a time until the next start marker lines up.
pub fn scan(bytes: &[u8]) -> Scan {
    let mut messages = Vec::new();
    let mut skipped = 0;
    let mut offset = 0;

    while offset < bytes.len() {
        if bytes[offset] != START_BYTE {
            offset += 1;
            skipped += 1;
            continue;
        }

        let decoded = RawFrame::decode(&bytes[offset..])
            .and_then(|frame| ParsedMessage::from_frame(&frame).map(|m| (frame.encoded_len(), m)));
        match decoded {
            Ok((len, message)) => {
                debug!("frame at offset {}: {} bytes", offset, len);
                messages.push(message);
                offset += len;
            }
            Err(e) => {
                warn!("skipping byte at offset {}: {:?}", offset, e);
                offset += 1;
                skipped += 1;
            }
        }
    }

    Scan { messages, skipped }
}

/// Sea-level standard density, used for the indicated airspeed readout.
const SEA_LEVEL_AIR_DENSITY: f32 = 1.225;

fn print_record<R: SegmentRecord>(message: &ParsedMessage) -> ProtocolResult<Option<R>> {
    let record = message.record::<R>()?;
    if let Some(record) = &record {
        println!("  {:?}", record);
    }
    Ok(record)
}

pub fn print_message(message: &ParsedMessage) -> ProtocolResult<()> {
    println!(
        "{:#04x} -> {:#04x} {:?}",
        message.sender,
        message.recipient,
        message.signatures()
    );
    for signature in message.signatures().signatures() {
        match signature {
            Signature::Pitot => {
                if let Some(pitot) = print_record::<PitotRecord>(message)? {
                    println!("  airspeed {:.1} m/s", pitot.airspeed(SEA_LEVEL_AIR_DENSITY));
                }
            }
            Signature::IMU => {
                if let Some(imu) = print_record::<IMURecord>(message)? {
                    println!("  acc {:?} m/s^2, gyro {:?} dps", imu.acc(), imu.gyro());
                }
            }
            Signature::GPS => {
                if let Some(fix) = print_record::<GPSFix>(message)? {
                    if fix.has_position() {
                        println!(
                            "  lat {:.7} lon {:.7} alt {} m, {} satellites",
                            fix.latitude(),
                            fix.longitude(),
                            fix.altitude,
                            fix.satellites
                        );
                    } else {
                        println!("  no position");
                    }
                }
            }
            Signature::Enviro => {
                print_record::<EnviroRecord>(message)?;
            }
            Signature::Batt => {
                if let Some(batt) = print_record::<BattRecord>(message)? {
                    println!("  {:.2} V, {} mW", batt.voltage(), batt.power_mw());
                }
            }
            Signature::Config => {
                print_record::<ConfigRecord>(message)?;
            }
            Signature::Status => {
                if let Some(status) = print_record::<StatusRecord>(message)? {
                    if !status.is_healthy() {
                        println!("  faults {:#06x}", status.fault_flags);
                    }
                }
            }
            Signature::Actuators => {
                print_record::<ActuatorsRecord>(message)?;
            }
            Signature::AData => {
                print_record::<ADataRecord>(message)?;
            }
            Signature::Cmds => {
                print_record::<CmdsRecord>(message)?;
            }
            Signature::Drop => {
                if let Some(drop) = print_record::<DropRecord>(message)? {
                    if drop.is_released() {
                        println!("  released at {} ms", drop.release_time_ms);
                    }
                }
            }
        }
    }
    Ok(())
}

pub fn decode(args: DecodeArgs) -> Result<()> {
    let bytes = std::fs::read(&args.capture)?;
    let scan = scan(&bytes);

    for message in &scan.messages {
        print_message(message).map_err(|e| anyhow!("{:?}", e))?;
    }
    info!(
        "{} messages decoded, {} bytes skipped",
        scan.messages.len(),
        scan.skipped
    );
    Ok(())
}
