use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum::AsRefStr;

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    FromPrimitive,
    Eq,
    Hash,
    Serialize_repr,
    Deserialize_repr,
    strum::Display,
    AsRefStr,
)]
#[repr(u8)]
pub enum NavigationStatus {
    UnderWayUsingEngine = 0,
    AtAnchor = 1,
    NotUnderCommand = 2,
    RestrictedManoeuverability = 3,
    ConstrainedByDraught = 4,
    Moored = 5,
    Aground = 6,
    EngagedInFishing = 7,
    UnderWaySailing = 8,
    Reserved9 = 9,
    Reserved10 = 10,
    Reserved11 = 11,
    Reserved12 = 12,
    Reserved13 = 13,
    AisSartIsActive = 14,
    NotDefined = 15,
}

impl NavigationStatus {
    /// Maps a raw status code to a status, codes outside of 0-15 have no meaning.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::from_i64(code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human readable text shown in the map popup.
    pub fn description(self) -> &'static str {
        use NavigationStatus::*;

        match self {
            UnderWayUsingEngine => "Under way using engine",
            AtAnchor => "At anchor",
            NotUnderCommand => "Not under command",
            RestrictedManoeuverability => "Restricted maneuverability",
            ConstrainedByDraught => "Constrained by her draught",
            Moored => "Moored",
            Aground => "Aground",
            EngagedInFishing => "Engaged in fishing",
            UnderWaySailing => "Under way sailing",
            Reserved9 | Reserved10 => "Reserved for future amendment of navigational status",
            Reserved11 => "Power-driven vessel towing astern (regional use)",
            Reserved12 => "Power-driven vessel pushing ahead or towing alongside (regional use)",
            Reserved13 => "Reserved for future use",
            AisSartIsActive => "AIS-SART (active), MOB-AIS, EPIRB-AIS",
            NotDefined => "Undefined",
        }
    }

    pub fn describe(status: Option<Self>) -> &'static str {
        status.map(Self::description).unwrap_or("Unknown")
    }
}
