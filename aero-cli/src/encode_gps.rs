use aero_protocol::{GPSFix, Link, ParsedMessage};
use anyhow::{anyhow, Result};
use log::info;

use crate::EncodeGPSArgs;

pub fn gps_frame(args: &EncodeGPSArgs) -> Result<Vec<u8>> {
    let mut fix = GPSFix::default();
    fix.set_latitude(args.lat);
    fix.set_longitude(args.lon);
    fix.set_altitude(args.alt);
    fix.speed = args.speed;
    fix.satellites = args.satellites;

    let link = Link::from_bits(args.link);
    let mut message = ParsedMessage::new(link.sender, link.recipient);
    message
        .insert_record(&fix)
        .map_err(|e| anyhow!("{:?}", e))?;
    let frame = message.to_frame(link).map_err(|e| anyhow!("{:?}", e))?;
    Ok(frame.serialize().to_vec())
}

pub fn encode_gps(args: EncodeGPSArgs) -> Result<()> {
    let bytes = gps_frame(&args)?;
    std::fs::write(&args.out, &bytes)?;
    info!("wrote {} byte frame to {:?}", bytes.len(), args.out);
    Ok(())
}
