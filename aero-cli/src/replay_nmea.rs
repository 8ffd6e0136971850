use aero_sensors::{GPSConfig, Neo6GPS, GPS};
use anyhow::{anyhow, Result};
use log::info;

use crate::reader::VecReader;
use crate::NmeaArgs;

pub fn replay_nmea(args: NmeaArgs) -> Result<()> {
    let log = std::fs::read(&args.log)?;
    let mut gps = Neo6GPS::new(VecReader::new(log, args.chunk_len));
    gps.init_with_config(GPSConfig {
        baud_rate: args.baud_rate,
        poll_time_ms: args.poll_time_ms,
    })
    .map_err(|e| anyhow!("{:?}", e))?;

    let mut fixes = 0;
    loop {
        if gps.update().map_err(|e| anyhow!("{:?}", e))? {
            let fix = gps.data();
            let time = fix.utc_time();
            println!(
                "{:02}:{:02}:{:02}.{:02} lat {:.7} lon {:.7} alt {} m, {} cm/s, {} satellites",
                time.hour,
                time.minute,
                time.second,
                time.hundredths,
                fix.latitude(),
                fix.longitude(),
                fix.altitude,
                fix.speed,
                fix.satellites
            );
            fixes += 1;
        }

        if gps.serial().data_left() == 0 {
            break;
        }
    }

    info!("{} fix updates replayed", fixes);
    Ok(())
}
