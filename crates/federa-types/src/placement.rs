use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypeParseError;

/// Where a federated value lives in a distributed computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Placement {
    /// A single coordinating party
    Server,
    /// Distributed across the participating clients
    Clients,
}

impl Placement {
    /// The canonical uppercase name used in type strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Server => "SERVER",
            Placement::Clients => "CLIENTS",
        }
    }

    /// Whether a federated value at this placement defaults to a single
    /// shared member. SERVER values do, CLIENTS values do not.
    pub fn default_all_equal(&self) -> bool {
        matches!(self, Placement::Server)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SERVER" => Ok(Placement::Server),
            "CLIENTS" => Ok(Placement::Clients),
            other => Err(TypeParseError::UnknownPlacement {
                name: other.to_string(),
                offset: 0,
            }),
        }
    }
}
