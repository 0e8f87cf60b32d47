use serde::{Deserialize, Serialize};

use super::DEFAULT_GROUP;
use crate::errors::Result;
use crate::{FrameData, FrameUpdate};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrcWriteUToolData {
    #[serde(rename = "ToolNumber")]
    pub tool_number: u8,
    #[serde(rename = "Frame")]
    pub frame: FrameData,
    #[serde(rename = "Group")]
    pub group: u8,
}

impl FrcWriteUToolData {
    pub fn new(tool_number: u8, frame: &FrameUpdate) -> Result<Self> {
        Ok(Self {
            tool_number,
            frame: frame.complete()?,
            group: DEFAULT_GROUP,
        })
    }
}
