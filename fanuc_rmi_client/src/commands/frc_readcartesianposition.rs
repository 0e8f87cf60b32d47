use serde::{Deserialize, Serialize};

use super::DEFAULT_GROUP;
use crate::{Configuration, Position};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrcReadCartesianPosition {
    #[serde(rename = "Group")]
    pub group: u8,
}

impl Default for FrcReadCartesianPosition {
    fn default() -> Self {
        Self { group: DEFAULT_GROUP }
    }
}

/// Typed view of a Cartesian position reply.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CartesianReading {
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "Configuration", default)]
    pub configuration: Option<Configuration>,
    #[serde(rename = "TimeTag", default)]
    pub time_tag: Option<u64>,
}
