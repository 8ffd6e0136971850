use aero_protocol::{GPSFix, UtcDate, UtcTime};
use chrono::{Datelike, Timelike};
use heapless::String;
use nmea::sentences::FixType;
use nmea::Nmea;

pub const MAX_SENTENCE_LEN: usize = 84;
const KNOTS_TO_CM_PER_S: f64 = 51.4444;

pub type Sentence = String<MAX_SENTENCE_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NmeaError {
    Checksum,
    Malformed,
    /// Valid sentence of a type the driver does not use.
    Unsupported,
    /// Receiver reports no position solution.
    NoFix,
}

impl NmeaError {
    fn classify(error: &nmea::Error) -> Self {
        match error {
            nmea::Error::ChecksumMismatch { .. } => NmeaError::Checksum,
            nmea::Error::Unsupported(_) | nmea::Error::Unknown(_) | nmea::Error::DisabledSentence => {
                NmeaError::Unsupported
            }
            _ => NmeaError::Malformed,
        }
    }
}

/// Feeds one sentence (with or without its line ending) to `nmea` and, if
/// the receiver state now holds a position, folds it into `fix`.
pub fn parse_into(nmea: &mut Nmea, sentence: &str, fix: &mut GPSFix) -> Result<(), NmeaError> {
    nmea.parse(sentence.trim_end())
        .map_err(|e| NmeaError::classify(&e))?;
    fold_fix(nmea, fix)
}

/// Copies the merged GGA/RMC state into `fix`. Fields the receiver has not
/// reported yet keep their previous value.
pub fn fold_fix(nmea: &Nmea, fix: &mut GPSFix) -> Result<(), NmeaError> {
    if matches!(nmea.fix_type, Some(FixType::Invalid)) {
        return Err(NmeaError::NoFix);
    }
    let (Some(latitude), Some(longitude)) = (nmea.latitude, nmea.longitude) else {
        return Err(NmeaError::NoFix);
    };

    fix.set_latitude(latitude);
    fix.set_longitude(longitude);

    if let Some(time) = nmea.fix_time {
        fix.set_utc_time(UtcTime {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
            // leap seconds report over 1e9 ns
            hundredths: (time.nanosecond() / 10_000_000).min(99) as u8,
        });
    }
    if let Some(date) = nmea.fix_date {
        fix.set_utc_date(UtcDate {
            year: date.year().rem_euclid(100) as u8,
            month: date.month() as u8,
            day: date.day() as u8,
        });
    }
    if let Some(altitude) = nmea.altitude {
        fix.set_altitude(altitude as f64);
    }
    if let Some(satellites) = nmea.num_of_fix_satellites {
        fix.satellites = satellites.min(u8::MAX as u32) as u8;
    }
    if let Some(knots) = nmea.speed_over_ground {
        fix.speed =
            libm::round(knots as f64 * KNOTS_TO_CM_PER_S).clamp(0.0, u16::MAX as f64) as u16;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &str = "$GPGGA,080023.50,4315.68533,N,07955.20234,W,1,09,0.9,87.3,M,-34.6,M,,*63\r\n";
    const RMC: &str = "$GPRMC,080023.50,A,4315.68533,N,07955.20234,W,24.3,54.7,150624,,,A*46\r\n";

    fn parse(sentence: &str) -> Result<GPSFix, NmeaError> {
        let mut fix = GPSFix::default();
        parse_into(&mut Nmea::default(), sentence, &mut fix)?;
        Ok(fix)
    }

    #[test]
    fn gga() {
        let fix = parse(GGA).unwrap();
        assert_eq!(fix.lat, 432614222);
        assert_eq!(fix.lon, -799200390);
        assert_eq!(fix.satellites, 9);
        assert_eq!(fix.altitude, 87);
        assert_eq!(
            fix.utc_time(),
            UtcTime {
                hour: 8,
                minute: 0,
                second: 23,
                hundredths: 50
            }
        );
    }

    #[test]
    fn rmc() {
        let fix = parse(RMC).unwrap();
        assert_eq!(
            fix.utc_date(),
            UtcDate {
                year: 24,
                month: 6,
                day: 15
            }
        );
        assert_eq!(fix.speed, 1250);
    }

    #[test]
    fn southern_and_eastern_hemispheres() {
        let fix =
            parse("$GNRMC,235959.00,A,3700.06000,S,12200.00000,E,0.0,0.0,311224,,,A*58").unwrap();
        assert_eq!(fix.lat, -370010000);
        assert_eq!(fix.lon, 1220000000);
        assert_eq!(fix.speed, 0);
        assert_eq!(fix.utc_date().day, 31);
    }

    #[test]
    fn gga_and_rmc_fill_one_fix() {
        let mut nmea = Nmea::default();
        let mut fix = GPSFix::default();
        parse_into(&mut nmea, GGA, &mut fix).unwrap();
        parse_into(&mut nmea, RMC, &mut fix).unwrap();
        assert_eq!(fix.lat, 432614222);
        assert_eq!(fix.satellites, 9);
        assert_eq!(fix.altitude, 87);
        assert_eq!(fix.speed, 1250);
        assert_eq!(fix.utc_time().hour, 8);
        assert_eq!(fix.utc_date().year, 24);
    }

    #[test]
    fn bad_checksum() {
        let corrupted = GGA.replace("*63", "*64");
        assert_eq!(parse(&corrupted), Err(NmeaError::Checksum));
    }

    #[test]
    fn no_fix() {
        assert_eq!(
            parse("$GPGGA,080024.00,,,,,0,00,99.9,,M,,M,,*51"),
            Err(NmeaError::NoFix)
        );
        assert_eq!(
            parse("$GPRMC,080024.00,V,,,,,,,150624,,,N*77"),
            Err(NmeaError::NoFix)
        );
    }

    #[test]
    fn unused_sentence_type() {
        assert_eq!(
            parse("$GNGLL,4315.68533,N,07955.20234,W,080023.000,A,A*5D\r\n"),
            Err(NmeaError::Unsupported)
        );
    }

    #[test]
    fn malformed() {
        assert_eq!(parse("GPGGA,no,dollar*00"), Err(NmeaError::Malformed));
        assert_eq!(parse("$GPGGA,missing-star"), Err(NmeaError::Malformed));
    }
}
