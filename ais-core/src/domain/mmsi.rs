use std::{fmt::Display, str::FromStr};

use serde::Serialize;

use crate::{MmsiError, mmsi_error::EmptySnafu};

/// Maritime Mobile Service Identity, the key every piece of per-vessel state is stored under.
///
/// The upstream feed is not consistent about whether it sends the identity as a string or a
/// number, so it is kept in its textual form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Mmsi(String);

impl Mmsi {
    pub fn new(value: impl AsRef<str>) -> Result<Self, MmsiError> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return EmptySnafu.fail();
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for Mmsi {
    type Err = MmsiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<u64> for Mmsi {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Mmsi {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
