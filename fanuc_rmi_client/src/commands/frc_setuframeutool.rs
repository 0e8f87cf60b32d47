use serde::{Deserialize, Serialize};

use super::DEFAULT_GROUP;

/// Select the active user frame and user tool.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrcSetUFrameUTool {
    #[serde(rename = "UFrameNumber")]
    pub u_frame_number: u8,
    #[serde(rename = "UToolNumber")]
    pub u_tool_number: u8,
    #[serde(rename = "Group")]
    pub group: u8,
}

impl FrcSetUFrameUTool {
    pub fn new(u_frame_number: u8, u_tool_number: u8) -> Self {
        Self {
            u_frame_number,
            u_tool_number,
            group: DEFAULT_GROUP,
        }
    }
}
