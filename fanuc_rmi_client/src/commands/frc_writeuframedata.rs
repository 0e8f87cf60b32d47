use serde::{Deserialize, Serialize};

use super::DEFAULT_GROUP;
use crate::errors::Result;
use crate::{FrameData, FrameUpdate};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrcWriteUFrameData {
    #[serde(rename = "FrameNumber")]
    pub frame_number: u8,
    #[serde(rename = "Frame")]
    pub frame: FrameData,
    #[serde(rename = "Group")]
    pub group: u8,
}

impl FrcWriteUFrameData {
    /// Fails with `IncompleteFrame` unless all six components are set.
    pub fn new(frame_number: u8, frame: &FrameUpdate) -> Result<Self> {
        Ok(Self {
            frame_number,
            frame: frame.complete()?,
            group: DEFAULT_GROUP,
        })
    }
}
