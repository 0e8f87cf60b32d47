use std::path::PathBuf;
use std::time::Duration;

use int_enum::IntEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::framer::Message;

pub type Result<T> = std::result::Result<T, FrcError>;

/// Every failure the client can surface.
///
/// Only the initial TCP connect is retried. Everything else is returned to the
/// caller as-is; after `ConnectionClosed`, `ReadTimeout`, `ProtocolDecode` or
/// `FailedToSend` the connection refuses further traffic and has to be closed
/// and recreated.
#[derive(Error, Debug, Clone)]
pub enum FrcError {
    #[error("unable to connect to {addr} after {attempts} attempts: {last_error}")]
    ConnectionUnavailable {
        addr: String,
        attempts: u32,
        last_error: String,
    },

    #[error("robot controller closed the connection unexpectedly")]
    ConnectionClosed,

    #[error("no complete message received within {0:?}")]
    ReadTimeout(Duration),

    #[error("malformed message from controller: {0}")]
    ProtocolDecode(String),

    #[error("frame record is missing required fields: {}", missing.join(", "))]
    IncompleteFrame { missing: Vec<&'static str> },

    #[error("controller reported error {code} ({}): {payload:?}", describe_error_id(*code))]
    ControllerFault { code: u32, payload: Message },

    #[error("invalid conversion type '{0}', expected 'cartesian' or 'joint'")]
    InvalidConversionType(String),

    #[error("kinematic model not found or not a .urdf file: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("not connected to the robot controller")]
    NotConnected,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("send error: {0}")]
    FailedToSend(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("sequence id must be a positive integer")]
    InvalidSequenceId,

    #[error("response is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("could not append to telemetry log: {0}")]
    TelemetryLog(String),

    #[error("could not load kinematic model: {0}")]
    ModelLoad(String),

    #[error("inverse kinematics did not converge (residual {residual:.3e})")]
    IkNotConverged { residual: f64 },
}

impl FrcError {
    /// Whether the connection that produced this error can no longer be trusted.
    pub fn poisons_connection(&self) -> bool {
        matches!(
            self,
            FrcError::ConnectionClosed
                | FrcError::ReadTimeout(_)
                | FrcError::ProtocolDecode(_)
                | FrcError::FailedToSend(_)
        )
    }

    /// The controller's raw `ErrorID`, when this is a controller fault.
    pub fn controller_code(&self) -> Option<u32> {
        match self {
            FrcError::ControllerFault { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Human readable text for a known controller `ErrorID`.
pub fn describe_error_id(code: u32) -> &'static str {
    FanucErrorCode::try_from(code)
        .map(|known| known.message())
        .unwrap_or("unrecognized error id")
}

/// Error ids documented for the RMI option. Used for display only; the client
/// never branches on them.
#[repr(u32)]
#[derive(Debug, Serialize, Deserialize, IntEnum, Clone, Copy, PartialEq, Eq)]
pub enum FanucErrorCode {
    InternalSystemError = 2556929,
    InvalidUToolNumber = 2556930,
    InvalidUFrameNumber = 2556931,
    InvalidPositionRegister = 2556932,
    InvalidSpeedOverride = 2556933,
    CannotExecuteTPProgram = 2556934,
    ControllerServoOff = 2556935,
    CannotExecuteTPProgramDuplicate = 2556936,
    RMINotRunning = 2556937,
    TPProgramNotPaused = 2556938,
    CannotResumeTPProgram = 2556939,
    CannotResetController = 2556940,
    InvalidRMICommand = 2556941,
    RMICommandFail = 2556942,
    InvalidControllerState = 2556943,
    PleaseCyclePower = 2556944,
    InvalidPayloadSchedule = 2556945,
    InvalidMotionOption = 2556946,
    InvalidVisionRegister = 2556947,
    InvalidRMIInstruction = 2556948,
    InvalidValue = 2556949,
    InvalidTextString = 2556950,
    InvalidPositionData = 2556951,
    RMIInHoldState = 2556952,
    RemoteDeviceDisconnected = 2556953,
    RobotAlreadyConnected = 2556954,
    WaitForCommandDone = 2556955,
    WaitForInstructionDone = 2556956,
    InvalidSequenceIDNumber = 2556957,
    InvalidSpeedType = 2556958,
    InvalidSpeedValue = 2556959,
    InvalidTermType = 2556960,
    InvalidTermValue = 2556961,
    InvalidLCBPortType = 2556962,
    InvalidACCValue = 2556963,
    InvalidDestinationPosition = 2556964,
    InvalidVIAPosition = 2556965,
    InvalidPortNumber = 2556966,
    InvalidGroupNumber = 2556967,
    InvalidGroupMask = 2556968,
    JointMotionWithCOORD = 2556969,
    IncrementalMotionWithCOORD = 2556970,
    RobotInSingleStepMode = 2556971,
    InvalidPositionDataType = 2556972,
    ReadyForASCIIPacket = 2556973,
    ASCIIConversionFailed = 2556974,
    InvalidASCIIInstruction = 2556975,
    InvalidNumberOfGroups = 2556976,
    InvalidInstructionPacket = 2556977,
    InvalidASCIIStringPacket = 2556978,
    InvalidASCIIStringSize = 2556979,
    InvalidApplicationTool = 2556980,
    InvalidCallProgramName = 2556981,
}

impl FanucErrorCode {
    pub fn message(&self) -> &'static str {
        match self {
            FanucErrorCode::InternalSystemError => "Internal System Error.",
            FanucErrorCode::InvalidUToolNumber => "Invalid UTool Number.",
            FanucErrorCode::InvalidUFrameNumber => "Invalid UFrame Number.",
            FanucErrorCode::InvalidPositionRegister => "Invalid Position Register.",
            FanucErrorCode::InvalidSpeedOverride => "Invalid Speed Override.",
            FanucErrorCode::CannotExecuteTPProgram => "Cannot Execute TP program.",
            FanucErrorCode::ControllerServoOff => "Controller Servo is Off.",
            FanucErrorCode::CannotExecuteTPProgramDuplicate => "Cannot Execute TP program.",
            FanucErrorCode::RMINotRunning => "RMI is Not Running.",
            FanucErrorCode::TPProgramNotPaused => "TP Program is Not Paused.",
            FanucErrorCode::CannotResumeTPProgram => "Cannot Resume TP Program.",
            FanucErrorCode::CannotResetController => "Cannot Reset Controller.",
            FanucErrorCode::InvalidRMICommand => "Invalid RMI Command.",
            FanucErrorCode::RMICommandFail => "RMI Command Fail.",
            FanucErrorCode::InvalidControllerState => "Invalid Controller State.",
            FanucErrorCode::PleaseCyclePower => "Please Cycle Power.",
            FanucErrorCode::InvalidPayloadSchedule => "Invalid Payload Schedule.",
            FanucErrorCode::InvalidMotionOption => "Invalid Motion Option.",
            FanucErrorCode::InvalidVisionRegister => "Invalid Vision Register.",
            FanucErrorCode::InvalidRMIInstruction => "Invalid RMI Instruction.",
            FanucErrorCode::InvalidValue => "Invalid Value.",
            FanucErrorCode::InvalidTextString => "Invalid Text String.",
            FanucErrorCode::InvalidPositionData => "Invalid Position Data.",
            FanucErrorCode::RMIInHoldState => "RMI is In HOLD State.",
            FanucErrorCode::RemoteDeviceDisconnected => "Remote Device Disconnected.",
            FanucErrorCode::RobotAlreadyConnected => "Robot is Already Connected.",
            FanucErrorCode::WaitForCommandDone => "Wait for Command Done.",
            FanucErrorCode::WaitForInstructionDone => "Wait for Instruction Done.",
            FanucErrorCode::InvalidSequenceIDNumber => "Invalid sequence ID number.",
            FanucErrorCode::InvalidSpeedType => "Invalid Speed Type.",
            FanucErrorCode::InvalidSpeedValue => "Invalid Speed Value.",
            FanucErrorCode::InvalidTermType => "Invalid Term Type.",
            FanucErrorCode::InvalidTermValue => "Invalid Term Value.",
            FanucErrorCode::InvalidLCBPortType => "Invalid LCB Port Type.",
            FanucErrorCode::InvalidACCValue => "Invalid ACC Value.",
            FanucErrorCode::InvalidDestinationPosition => "Invalid Destination Position.",
            FanucErrorCode::InvalidVIAPosition => "Invalid VIA Position.",
            FanucErrorCode::InvalidPortNumber => "Invalid Port Number.",
            FanucErrorCode::InvalidGroupNumber => "Invalid Group Number.",
            FanucErrorCode::InvalidGroupMask => "Invalid Group Mask.",
            FanucErrorCode::JointMotionWithCOORD => "Joint motion with COORD.",
            FanucErrorCode::IncrementalMotionWithCOORD => "Incremental motn with COORD.",
            FanucErrorCode::RobotInSingleStepMode => "Robot in Single Step Mode.",
            FanucErrorCode::InvalidPositionDataType => "Invalid Position Data Type.",
            FanucErrorCode::ReadyForASCIIPacket => "Ready for ASCII Packet.",
            FanucErrorCode::ASCIIConversionFailed => "ASCII Conversion Failed.",
            FanucErrorCode::InvalidASCIIInstruction => "Invalid ASCII Instruction.",
            FanucErrorCode::InvalidNumberOfGroups => "Invalid Number of Groups.",
            FanucErrorCode::InvalidInstructionPacket => "Invalid Instruction packet.",
            FanucErrorCode::InvalidASCIIStringPacket => "Invalid ASCII String packet.",
            FanucErrorCode::InvalidASCIIStringSize => "Invalid ASCII string size.",
            FanucErrorCode::InvalidApplicationTool => "Invalid Application Tool.",
            FanucErrorCode::InvalidCallProgramName => "Invalid Call Program Name.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_are_described() {
        assert_eq!(describe_error_id(2556930), "Invalid UTool Number.");
        assert_eq!(describe_error_id(9), "unrecognized error id");
    }

    #[test]
    fn only_stream_failures_poison() {
        assert!(FrcError::ConnectionClosed.poisons_connection());
        assert!(FrcError::ProtocolDecode("x".into()).poisons_connection());
        let fault = FrcError::ControllerFault { code: 9, payload: Message::new() };
        assert!(!fault.poisons_connection());
        assert_eq!(fault.controller_code(), Some(9));
    }
}
