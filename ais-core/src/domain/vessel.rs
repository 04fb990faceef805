use std::time::Instant;

use crate::{
    CoordinateError, Mmsi, NavigationStatus,
    coordinate_error::{LatitudeSnafu, LongitudeSnafu},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

/// A decoded position report, not yet stamped with its receipt time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVesselPosition {
    pub mmsi: Mmsi,
    pub name: Option<String>,
    pub position: Position,
    pub course_over_ground: Option<f64>,
    pub navigational_status: Option<NavigationStatus>,
}

/// Latest known state of a single vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselRecord {
    pub mmsi: Mmsi,
    pub name: Option<String>,
    pub position: Position,
    pub course_over_ground: Option<f64>,
    pub navigational_status: Option<NavigationStatus>,
    /// When the report was received, message time is never trusted for ordering.
    pub received_at: Instant,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return LatitudeSnafu { latitude }.fail();
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return LongitudeSnafu { longitude }.fail();
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

impl NewVesselPosition {
    pub fn new(mmsi: Mmsi, position: Position) -> Self {
        Self {
            mmsi,
            name: None,
            position,
            course_over_ground: None,
            navigational_status: None,
        }
    }
}

impl VesselRecord {
    pub fn new(position: NewVesselPosition, received_at: Instant) -> Self {
        let NewVesselPosition {
            mmsi,
            name,
            position,
            course_over_ground,
            navigational_status,
        } = position;

        Self {
            mmsi,
            name,
            position,
            course_over_ground,
            navigational_status,
            received_at,
        }
    }
}

/// AIS pads names with `@` up to their fixed field width.
pub fn clean_ship_name(name: Option<String>) -> Option<String> {
    name.and_then(|n| {
        let trimmed = n.trim().trim_end_matches('@').trim_end();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Course over ground is reported in `[0, 360)`, `360` signals "not available".
pub fn clean_course_over_ground(course: Option<f64>) -> Option<f64> {
    course.filter(|c| c.is_finite() && (0.0..360.0).contains(c))
}
