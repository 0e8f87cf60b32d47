use serde::{Deserialize, Serialize};

use super::DEFAULT_GROUP;

/// UTool reads address the slot with `ToolNumber`, not `FrameNumber`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrcReadUToolData {
    #[serde(rename = "ToolNumber")]
    pub tool_number: u8,
    #[serde(rename = "Group")]
    pub group: u8,
}

impl FrcReadUToolData {
    pub fn new(tool_number: u8) -> Self {
        Self {
            tool_number,
            group: DEFAULT_GROUP,
        }
    }
}
