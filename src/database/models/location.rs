use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AttendanceError, AttendanceResult};

pub const MIN_ALLOWED_RADIUS_METERS: f64 = 10.0;
pub const MAX_ALLOWED_RADIUS_METERS: f64 = 5000.0;

/// A WGS84 point in decimal degrees. Only constructed through [`Coordinates::new`],
/// so every value in the system is finite and in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = AttendanceError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> AttendanceResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AttendanceError::InvalidCoordinate(format!(
                "latitude {} is outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AttendanceError::InvalidCoordinate(format!(
                "longitude {} is outside [-180, 180]",
                longitude
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Office point and the radius around it inside which a check-in is on site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub allowed_radius_meters: f64,
}

impl OfficeLocation {
    pub fn validate(&self) -> AttendanceResult<Coordinates> {
        let radius = self.allowed_radius_meters;
        if !radius.is_finite()
            || !(MIN_ALLOWED_RADIUS_METERS..=MAX_ALLOWED_RADIUS_METERS).contains(&radius)
        {
            return Err(AttendanceError::InvalidRadius(radius));
        }

        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn center(&self) -> AttendanceResult<Coordinates> {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Stored office configuration with its audit columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeLocationSnapshot {
    #[serde(flatten)]
    pub location: OfficeLocation,
    pub updated_by: Option<uuid::Uuid>,
    pub updated_at: DateTime<Utc>,
}
