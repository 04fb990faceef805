use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::{Mmsi, NavigationStatus, VesselRecord};

/// Placeholder for values a vessel has not reported.
pub const UNKNOWN_MARKER: &str = "N/A";

/// A point in time view of all current vessels, ready to hand to a map client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Increases by one for every snapshot produced in a session, gaps mean a snapshot was
    /// dropped before reaching the subscriber.
    pub sequence: u64,
    pub generated_at: DateTime<Utc>,
    pub unique_vessels: usize,
    pub vessels: FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<ShipFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct ShipFeature {
    pub geometry: Point,
    pub properties: ShipProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Point")]
pub struct Point {
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipProperties {
    #[serde(rename = "ShipName")]
    pub ship_name: String,
    #[serde(rename = "MMSI")]
    pub mmsi: Mmsi,
    #[serde(rename = "NavigationalStatus")]
    pub navigational_status: StatusProperty,
    pub cog: f64,
}

/// Serializes as the numeric status code, or [UNKNOWN_MARKER] when no status was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusProperty {
    Known(NavigationStatus),
    Unknown,
}

impl From<Option<NavigationStatus>> for StatusProperty {
    fn from(value: Option<NavigationStatus>) -> Self {
        value.map(Self::Known).unwrap_or(Self::Unknown)
    }
}

impl Serialize for StatusProperty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatusProperty::Known(status) => serializer.serialize_u8(status.code()),
            StatusProperty::Unknown => serializer.serialize_str(UNKNOWN_MARKER),
        }
    }
}

impl From<&VesselRecord> for ShipFeature {
    fn from(v: &VesselRecord) -> Self {
        ShipFeature {
            geometry: Point {
                coordinates: [v.position.longitude(), v.position.latitude()],
            },
            properties: ShipProperties {
                ship_name: v
                    .name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_MARKER.to_string()),
                mmsi: v.mmsi.clone(),
                navigational_status: v.navigational_status.into(),
                cog: v.course_over_ground.unwrap_or(0.),
            },
        }
    }
}

/// Projects records into display features, one per record and in the same order.
pub fn project<'a, T>(records: T) -> FeatureCollection
where
    T: IntoIterator<Item = &'a VesselRecord>,
{
    FeatureCollection {
        features: records.into_iter().map(ShipFeature::from).collect(),
    }
}
