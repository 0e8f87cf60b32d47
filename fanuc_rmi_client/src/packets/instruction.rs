use crate::instructions::*;
use serde::{Deserialize, Serialize};

/// Program-class requests, queued by the controller's sequencer.
///
/// Every instruction carries a caller-assigned `SequenceID`. The client never
/// assigns or increments it: callers must keep ids unique among the
/// instructions still outstanding on the controller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "Instruction")]
pub enum Instruction {
    #[serde(rename = "FRC_LinearMotion")]
    FrcLinearMotion(FrcLinearMotion),

    #[serde(rename = "FRC_LinearRelative")]
    FrcLinearRelative(FrcLinearRelative),

    #[serde(rename = "FRC_JointMotionJRep")]
    FrcJointMotionJRep(FrcJointMotionJRep),

    #[serde(rename = "FRC_JointRelativeJRep")]
    FrcJointRelativeJRep(FrcJointRelativeJRep),

    #[serde(rename = "FRC_WaitTime")]
    FrcWaitTime(FrcWaitTime),
}

impl Instruction {
    pub fn sequence_id(&self) -> u32 {
        match self {
            Instruction::FrcLinearMotion(instr) => instr.sequence_id,
            Instruction::FrcLinearRelative(instr) => instr.sequence_id,
            Instruction::FrcJointMotionJRep(instr) => instr.sequence_id,
            Instruction::FrcJointRelativeJRep(instr) => instr.sequence_id,
            Instruction::FrcWaitTime(instr) => instr.sequence_id,
        }
    }
}
