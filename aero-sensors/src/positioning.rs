use aero_protocol::{
    CoordinateTransform, GPSFix, LocalOffset, ParsedMessage, ProtocolResult, ReferencePoint,
    Segment, SegmentRecord,
};

use crate::gps::GPS;

/// A GPS driver plus the zero point its fixes are measured from.
pub struct LocalPositioner<G: GPS> {
    gps: G,
    transform: CoordinateTransform,
}

impl<G: GPS> LocalPositioner<G> {
    pub fn new(gps: G) -> Self {
        Self {
            gps,
            transform: CoordinateTransform::new(),
        }
    }

    pub fn gps(&self) -> &G {
        &self.gps
    }

    pub fn gps_mut(&mut self) -> &mut G {
        &mut self.gps
    }

    pub fn into_inner(self) -> G {
        self.gps
    }

    /// Makes the current fix the origin.
    pub fn zero(&mut self) {
        let fix = *self.gps.data();
        log_info!(
            "zeroed at lat {} lon {} alt {}",
            fix.latitude(),
            fix.longitude(),
            fix.altitude
        );
        self.transform.zero_at(&fix);
    }

    pub fn set_reference(&mut self, latitude: f64, longitude: f64, altitude: f64) {
        self.transform.set_reference(latitude, longitude, altitude);
    }

    pub fn reference(&self) -> &ReferencePoint {
        self.transform.reference()
    }

    pub fn offset(&self) -> LocalOffset {
        self.transform.offset_of_fix(self.gps.data())
    }

    /// Polls the driver and returns the new offset if the fix changed.
    pub fn update(&mut self) -> Result<Option<LocalOffset>, G::Error> {
        if self.gps.update()? {
            Ok(Some(self.offset()))
        } else {
            Ok(None)
        }
    }

    pub fn fix(&self) -> &GPSFix {
        self.gps.data()
    }

    pub fn segment(&self) -> ProtocolResult<Segment> {
        self.gps.data().to_segment()
    }

    /// Puts the current fix into the GPS slot of `message`.
    pub fn write_message(&self, message: &mut ParsedMessage) -> ProtocolResult<()> {
        message.insert_record(self.gps.data())
    }
}
