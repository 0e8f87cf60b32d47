use serde::{Deserialize, Serialize};

use super::check_sequence_id;
use crate::errors::Result;
use crate::{Configuration, JointPose, SpeedType, TermType};

/// Joint-interpolated move to absolute joint angles.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrcJointMotionJRep {
    #[serde(rename = "SequenceID")]
    pub sequence_id: u32,
    #[serde(rename = "Configuration")]
    pub configuration: Configuration,
    #[serde(rename = "JointAngle")]
    pub joint_angle: JointPose,
    #[serde(rename = "SpeedType")]
    pub speed_type: SpeedType,
    #[serde(rename = "Speed")]
    pub speed: f64,
    #[serde(rename = "TermType")]
    pub term_type: TermType,
    #[serde(rename = "TermValue", skip_serializing_if = "Option::is_none", default)]
    pub term_value: Option<u8>,
}

impl FrcJointMotionJRep {
    /// `speed_percent` is a percentage of maximum joint speed.
    pub fn new(
        sequence_id: u32,
        configuration: Configuration,
        joint_angle: JointPose,
        speed_percent: f64,
    ) -> Result<Self> {
        Ok(Self {
            sequence_id: check_sequence_id(sequence_id)?,
            configuration,
            joint_angle,
            speed_type: SpeedType::Percent,
            speed: speed_percent,
            term_type: TermType::FINE,
            term_value: None,
        })
    }

    /// Same blending rules as the linear moves: `CNT` clamps to 1..=100.
    pub fn with_termination(mut self, term_type: TermType, term_value: u8) -> Self {
        self.term_type = term_type;
        self.term_value = match term_type {
            TermType::CNT => Some(term_value.clamp(1, 100)),
            TermType::FINE => None,
        };
        self
    }
}
