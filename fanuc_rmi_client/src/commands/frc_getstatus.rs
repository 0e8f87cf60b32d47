use serde::{Deserialize, Serialize};

/// Selected fields of the `FRC_GetStatus` reply. Absent fields read as zero.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ControllerStatus {
    #[serde(rename = "ServoReady")]
    pub servo_ready: i32,
    #[serde(rename = "TPMode")]
    pub tp_mode: i32,
    #[serde(rename = "RMIMotionStatus")]
    pub rmi_motion_status: i32,
    #[serde(rename = "ProgramStatus")]
    pub program_status: i32,
    #[serde(rename = "SingleStepMode")]
    pub single_step_mode: i32,
    #[serde(rename = "NumberUTool")]
    pub number_utool: i32,
    #[serde(rename = "NumberUFrame")]
    pub number_uframe: i32,
    #[serde(rename = "NextSequenceID")]
    pub next_sequence_id: u32,
}
