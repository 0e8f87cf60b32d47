use crate::commands::*;
use serde::{Deserialize, Serialize};

/// Control-class requests. The controller answers each one immediately.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "Command")]
pub enum Command {
    #[serde(rename = "FRC_Reset")]
    FrcReset,

    #[serde(rename = "FRC_Initialize")]
    FrcInitialize(FrcInitialize),

    #[serde(rename = "FRC_Abort")]
    FrcAbort,

    #[serde(rename = "FRC_Pause")]
    FrcPause,

    #[serde(rename = "FRC_Continue")]
    FrcContinue,

    #[serde(rename = "FRC_GetStatus")]
    FrcGetStatus,

    #[serde(rename = "FRC_SetUFrameUTool")]
    FrcSetUFrameUTool(FrcSetUFrameUTool),

    #[serde(rename = "FRC_GetUFrameUTool")]
    FrcGetUFrameUTool(FrcGetUFrameUTool),

    #[serde(rename = "FRC_SetOverRide")]
    FrcSetOverRide(FrcSetOverRide),

    #[serde(rename = "FRC_ReadCartesianPosition")]
    FrcReadCartesianPosition(FrcReadCartesianPosition),

    #[serde(rename = "FRC_ReadJointAngles")]
    FrcReadJointAngles(FrcReadJointAngles),

    #[serde(rename = "FRC_ReadUFrameData")]
    FrcReadUFrameData(FrcReadUFrameData),

    #[serde(rename = "FRC_WriteUFrameData")]
    FrcWriteUFrameData(FrcWriteUFrameData),

    #[serde(rename = "FRC_ReadUToolData")]
    FrcReadUToolData(FrcReadUToolData),

    #[serde(rename = "FRC_WriteUToolData")]
    FrcWriteUToolData(FrcWriteUToolData),
}
