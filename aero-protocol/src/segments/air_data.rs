use packed_struct::prelude::*;

use super::SegmentRecord;
use crate::signature::Signature;

/// Pitot tube differential pressure.
#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "6")]
pub struct PitotRecord {
    /// centipascal
    pub differential_pressure: i32,
    /// centidegree celsius
    pub temperature: i16,
}

impl PitotRecord {
    /// Indicated airspeed in m/s for the given air density (kg/m^3).
    pub fn airspeed(&self, air_density: f32) -> f32 {
        let pressure = self.differential_pressure as f32 / 100.0;
        if pressure <= 0.0 || air_density <= 0.0 {
            return 0.0;
        }
        libm::sqrtf(2.0 * pressure / air_density)
    }
}

impl SegmentRecord for PitotRecord {
    const SIGNATURE: Signature = Signature::Pitot;
}

/// Barometer and hygrometer reading.
#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "8")]
pub struct EnviroRecord {
    /// pascal
    pub pressure: u32,
    /// centidegree celsius
    pub temperature: i16,
    /// centi-percent relative humidity
    pub humidity: u16,
}

impl SegmentRecord for EnviroRecord {
    const SIGNATURE: Signature = Signature::Enviro;
}

/// Raw analog channels.
#[derive(PackedStruct, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(endian = "lsb", size_bytes = "8")]
pub struct ADataRecord {
    pub adc_0: u16,
    pub adc_1: u16,
    pub adc_2: u16,
    pub adc_3: u16,
}

impl SegmentRecord for ADataRecord {
    const SIGNATURE: Signature = Signature::AData;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airspeed_from_dynamic_pressure() {
        // q = 0.5 * 1.225 * 20^2 = 245 Pa
        let pitot = PitotRecord {
            differential_pressure: 24500,
            temperature: 1500,
        };
        assert!((pitot.airspeed(1.225) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn negative_pressure_reads_still_air() {
        let pitot = PitotRecord {
            differential_pressure: -40,
            temperature: 0,
        };
        assert_eq!(pitot.airspeed(1.225), 0.0);
    }
}
