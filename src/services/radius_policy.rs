use std::sync::Arc;

use serde::Serialize;

use crate::database::models::Coordinates;
use crate::error::AttendanceResult;
use crate::services::geo::distance_meters;
use crate::services::office_location::OfficeLocationService;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusCheck {
    pub distance_meters: f64,
    pub is_within: bool,
    pub allowed_radius_meters: f64,
}

/// Decides whether a point is on site, against whatever office configuration
/// is current at the moment of the call.
#[derive(Clone)]
pub struct RadiusPolicy {
    office: Arc<OfficeLocationService>,
}

impl RadiusPolicy {
    pub fn new(office: Arc<OfficeLocationService>) -> Self {
        Self { office }
    }

    pub fn is_within_office(&self, latitude: f64, longitude: f64) -> AttendanceResult<RadiusCheck> {
        let point = Coordinates::new(latitude, longitude)?;
        self.check(point)
    }

    pub fn check(&self, point: Coordinates) -> AttendanceResult<RadiusCheck> {
        let office = self.office.get();
        let distance = distance_meters(office.center()?, point);

        Ok(RadiusCheck {
            distance_meters: distance,
            // Standing exactly on the boundary counts as inside
            is_within: distance <= office.allowed_radius_meters,
            allowed_radius_meters: office.allowed_radius_meters,
        })
    }
}
