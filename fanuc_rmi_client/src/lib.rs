use serde::{Deserialize, Serialize};

pub mod errors;
pub use errors::*;

pub mod framer;
pub use framer::Message;

mod joint_pose;
pub use joint_pose::*;

pub mod packets;
pub mod instructions;
pub mod commands;

pub mod drivers;

#[cfg(feature = "kinematics")]
pub mod kinematics;

/// Cartesian pose: X/Y/Z in the controller's linear unit, W/P/R in degrees
/// (roll, pitch, yaw applied as `Rz(R) * Ry(P) * Rx(W)`).
///
/// Values travel unscaled. Missing fields decode as `0.0`, which is what the
/// controller sends for unconfigured slots.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
    pub p: f64,
    pub r: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64, w: f64, p: f64, r: f64) -> Self {
        Self { x, y, z, w, p, r }
    }
}

/// A user frame or user tool record. Same shape as [`Position`]; reads default
/// absent fields to `0.0`.
pub type FrameData = Position;

/// A frame record as supplied by a caller who may not have every field.
///
/// Frame writes go through [`FrameUpdate::complete`], which refuses to send a
/// record unless all six components are present.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct FrameUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub w: Option<f64>,
    pub p: Option<f64>,
    pub r: Option<f64>,
}

impl FrameUpdate {
    pub fn complete(&self) -> Result<FrameData> {
        let fields = [
            ("X", self.x),
            ("Y", self.y),
            ("Z", self.z),
            ("W", self.w),
            ("P", self.p),
            ("R", self.r),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(FrcError::IncompleteFrame { missing });
        }
        Ok(Position {
            x: self.x.unwrap_or_default(),
            y: self.y.unwrap_or_default(),
            z: self.z.unwrap_or_default(),
            w: self.w.unwrap_or_default(),
            p: self.p.unwrap_or_default(),
            r: self.r.unwrap_or_default(),
        })
    }
}

impl From<FrameData> for FrameUpdate {
    fn from(frame: FrameData) -> Self {
        Self {
            x: Some(frame.x),
            y: Some(frame.y),
            z: Some(frame.z),
            w: Some(frame.w),
            p: Some(frame.p),
            r: Some(frame.r),
        }
    }
}

/// Arm configuration flags that pick one joint solution out of the several
/// that reach the same Cartesian pose.
///
/// Turn values count whole 360° wraps of the corresponding wrist joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmConfiguration {
    pub front: bool,
    pub up: bool,
    pub left: bool,
    pub flip: bool,
    pub turn4: i32,
    pub turn5: i32,
    pub turn6: i32,
}

/// Front, Up, no Left, no Flip, no wrist turns.
impl Default for ArmConfiguration {
    fn default() -> Self {
        Self {
            front: true,
            up: true,
            left: false,
            flip: false,
            turn4: 0,
            turn5: 0,
            turn6: 0,
        }
    }
}

/// The `Configuration` block embedded in every linear and joint motion
/// instruction, and returned by Cartesian position reads.
///
/// Front/Up/Left/Flip travel as `0`/`1`; any other value is rejected when a
/// block is decoded. Build one with [`Configuration::new`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Configuration {
    #[serde(rename = "UToolNumber")]
    u_tool_number: u8,
    #[serde(rename = "UFrameNumber")]
    u_frame_number: u8,
    #[serde(with = "flag")]
    front: bool,
    #[serde(with = "flag")]
    up: bool,
    #[serde(with = "flag")]
    left: bool,
    #[serde(with = "flag")]
    flip: bool,
    turn4: i32,
    turn5: i32,
    turn6: i32,
}

impl Configuration {
    pub fn new(u_frame_number: u8, u_tool_number: u8, arm: ArmConfiguration) -> Self {
        Self {
            u_tool_number,
            u_frame_number,
            front: arm.front,
            up: arm.up,
            left: arm.left,
            flip: arm.flip,
            turn4: arm.turn4,
            turn5: arm.turn5,
            turn6: arm.turn6,
        }
    }

    pub fn u_frame_number(&self) -> u8 {
        self.u_frame_number
    }

    pub fn u_tool_number(&self) -> u8 {
        self.u_tool_number
    }

    pub fn arm(&self) -> ArmConfiguration {
        ArmConfiguration {
            front: self.front,
            up: self.up,
            left: self.left,
            flip: self.flip,
            turn4: self.turn4,
            turn5: self.turn5,
            turn6: self.turn6,
        }
    }
}

/// Binary arm flags as the controller writes them: `0` or `1`.
mod flag {
    use serde::de::{Error, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u64::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(D::Error::invalid_value(
                Unexpected::Unsigned(other),
                &"a configuration flag of 0 or 1",
            )),
        }
    }
}

/// UFrame 0, UTool 1 and [`ArmConfiguration::default`].
impl Default for Configuration {
    fn default() -> Self {
        Self::new(0, 1, ArmConfiguration::default())
    }
}

/// Speed unit of a motion instruction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedType {
    /// Millimeters per second, used by linear motion.
    #[serde(rename = "mmSec")]
    MMSec,
    /// Percentage of the joint's maximum speed, used by joint motion.
    #[serde(rename = "Percent")]
    Percent,
}

/// How a motion instruction ends.
///
/// `CNT` blends into the next motion and is not executed by the controller
/// until that next motion arrives, so the last instruction of a sequence
/// should be `FINE`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermType {
    #[default]
    FINE,
    CNT,
}
