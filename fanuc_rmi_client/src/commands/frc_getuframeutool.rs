use serde::{Deserialize, Serialize};

use super::DEFAULT_GROUP;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrcGetUFrameUTool {
    #[serde(rename = "Group")]
    pub group: u8,
}

impl Default for FrcGetUFrameUTool {
    fn default() -> Self {
        Self { group: DEFAULT_GROUP }
    }
}

/// The frame/tool pair currently active on the controller.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ActiveFrames {
    #[serde(rename = "UFrameNumber")]
    pub u_frame_number: u8,
    #[serde(rename = "UToolNumber")]
    pub u_tool_number: u8,
}
