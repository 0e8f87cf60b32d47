use serde::{Deserialize, Serialize};

use super::DEFAULT_GROUP;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrcInitialize {
    #[serde(rename = "GroupMask")]
    pub group_mask: u8,
}

impl FrcInitialize {
    pub fn new(group_mask: Option<u8>) -> Self {
        Self {
            group_mask: group_mask.unwrap_or(DEFAULT_GROUP),
        }
    }
}

impl Default for FrcInitialize {
    fn default() -> Self {
        FrcInitialize::new(None)
    }
}
