// ── Router-reported identifiers ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// MAC address exactly as the router formats it.
///
/// The firmware keys the wifi, port-assignment, and device-info trees by
/// the same string it reports inside the topology tree. The value is kept
/// verbatim; normalizing case or separators would break joins across
/// those trees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for MacAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
