use serde::{Deserialize, Serialize};

use super::DEFAULT_GROUP;
use crate::FrameData;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrcReadUFrameData {
    #[serde(rename = "FrameNumber")]
    pub frame_number: u8,
    #[serde(rename = "Group")]
    pub group: u8,
}

impl FrcReadUFrameData {
    pub fn new(frame_number: u8) -> Self {
        Self {
            frame_number,
            group: DEFAULT_GROUP,
        }
    }
}

/// `Frame` payload of a UFrame or UTool read.
///
/// Unconfigured slots come back partial or empty; every missing component is
/// read as `0.0`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FrameReading {
    #[serde(rename = "Frame", default)]
    pub frame: FrameData,
}
