use crate::error::{
    DecodeError,
    decode_error::{InvalidCoordinatesSnafu, InvalidPayloadSnafu, MissingIdentitySnafu},
};
use ais_core::{
    Mmsi, NavigationStatus, NewVesselPosition, Position, clean_course_over_ground,
    clean_ship_name,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use snafu::{OptionExt, ResultExt};
use tracing::warn;

/// A single position message as relayed by the live feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AisMessage {
    #[serde(rename = "Metadata")]
    pub metadata: Metadata,
    #[serde(rename = "PositionReport")]
    pub position_report: PositionReport,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(rename = "MMSI", default, skip_serializing_if = "Option::is_none")]
    pub mmsi: Option<RawMmsi>,
    #[serde(rename = "ShipName", default, skip_serializing_if = "Option::is_none")]
    pub ship_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PositionReport {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(
        rename = "Cog",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub course_over_ground: Option<f64>,
    #[serde(
        rename = "NavigationalStatus",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub navigational_status: Option<f64>,
}

/// The feed sends the mmsi both as a number and as a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawMmsi {
    Number(u64),
    Text(String),
}

/// Optional numeric fields never reject a message, anything that is not a number is absent.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            warn!("ignoring non-numeric value '{other}'");
            None
        }
    })
}

/// Decodes a raw event payload, either the whole message is accepted or nothing is.
pub fn decode(raw: &str) -> Result<NewVesselPosition, DecodeError> {
    let message: AisMessage = serde_json::from_str(raw).context(InvalidPayloadSnafu)?;
    NewVesselPosition::try_from(message)
}

impl TryFrom<AisMessage> for NewVesselPosition {
    type Error = DecodeError;

    fn try_from(m: AisMessage) -> Result<Self, Self::Error> {
        let AisMessage {
            metadata: Metadata { mmsi, ship_name },
            position_report:
                PositionReport {
                    latitude,
                    longitude,
                    course_over_ground,
                    navigational_status,
                },
        } = m;

        let mmsi = match mmsi.context(MissingIdentitySnafu)? {
            RawMmsi::Number(v) => Mmsi::from(v),
            RawMmsi::Text(v) => Mmsi::new(v).ok().context(MissingIdentitySnafu)?,
        };

        let position = Position::new(latitude, longitude).with_context(|_| {
            InvalidCoordinatesSnafu {
                mmsi: mmsi.clone(),
            }
        })?;

        let navigational_status = navigational_status.and_then(|code| {
            let status = (code.fract() == 0.)
                .then(|| NavigationStatus::from_code(code as i64))
                .flatten();
            if status.is_none() {
                warn!("invalid navigational status '{code}' for mmsi '{mmsi}'");
            }
            status
        });

        Ok(NewVesselPosition {
            mmsi,
            name: clean_ship_name(ship_name),
            position,
            course_over_ground: clean_course_over_ground(course_over_ground),
            navigational_status,
        })
    }
}

#[cfg(feature = "test")]
impl AisMessage {
    pub fn test_default(mmsi: &str) -> AisMessage {
        AisMessage {
            metadata: Metadata {
                mmsi: Some(RawMmsi::Text(mmsi.to_string())),
                ship_name: Some("SJARKEN".to_string()),
            },
            position_report: PositionReport {
                latitude: 37.636665,
                longitude: 24.761767,
                course_over_ground: Some(123.3),
                navigational_status: Some(0.),
            },
        }
    }
}
