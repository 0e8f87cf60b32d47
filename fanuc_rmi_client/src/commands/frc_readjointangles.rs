use serde::{Deserialize, Serialize};

use super::DEFAULT_GROUP;
use crate::errors::Result;
use crate::packets::Response;
use crate::JointPose;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrcReadJointAngles {
    #[serde(rename = "Group")]
    pub group: u8,
}

impl Default for FrcReadJointAngles {
    fn default() -> Self {
        Self { group: DEFAULT_GROUP }
    }
}

/// Field names a joint reading may arrive under, in order of preference.
/// Real controllers send `JointAngle`; simulators often send `JointAngles`.
pub const JOINT_READING_FIELDS: [&str; 3] = ["JointAngle", "JointAngles", "Joints"];

/// Typed view of a joint angle reply.
#[derive(Debug, Clone, PartialEq)]
pub struct JointReading {
    pub joints: JointPose,
    pub time_tag: Option<u64>,
}

impl JointReading {
    /// Pick the first non-empty joint field. `Ok(None)` when there is none.
    pub fn from_response(response: &Response) -> Result<Option<Self>> {
        let time_tag = response.field::<u64>("TimeTag").ok().flatten();
        for key in JOINT_READING_FIELDS {
            if let Some(joints) = response.field::<JointPose>(key)? {
                if !joints.is_empty() {
                    return Ok(Some(Self { joints, time_tag }));
                }
            }
        }
        Ok(None)
    }
}
