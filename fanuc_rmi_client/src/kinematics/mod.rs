//! Conversion between Cartesian poses and joint angles.
//!
//! The bridge is stateless: each conversion loads the kinematic model, solves,
//! and drops it, so independent conversions can run in parallel. Numerical
//! work happens behind [`KinematicChain`]; the built-in implementation reads a
//! URDF serial chain ([`UrdfChain`]).
//!
//! Units: X/Y/Z pass through in the model's length unit without scaling,
//! W/P/R and joint angles are degrees.

mod chain;
mod orientation;
mod urdf;

pub use chain::*;
pub use orientation::*;
pub use urdf::*;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{FrcError, Result};
use crate::{JointPose, Position, MAX_JOINTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateType {
    Cartesian,
    Joint,
}

impl CoordinateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateType::Cartesian => "cartesian",
            CoordinateType::Joint => "joint",
        }
    }
}

impl FromStr for CoordinateType {
    type Err = FrcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartesian" => Ok(CoordinateType::Cartesian),
            "joint" => Ok(CoordinateType::Joint),
            _ => Err(FrcError::InvalidConversionType(s.to_string())),
        }
    }
}

impl fmt::Display for CoordinateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input or output of a conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PoseData {
    Cartesian(Position),
    Joint(JointPose),
}

impl PoseData {
    pub fn coordinate_type(&self) -> CoordinateType {
        match self {
            PoseData::Cartesian(_) => CoordinateType::Cartesian,
            PoseData::Joint(_) => CoordinateType::Joint,
        }
    }

    pub fn as_cartesian(&self) -> Option<&Position> {
        match self {
            PoseData::Cartesian(pose) => Some(pose),
            PoseData::Joint(_) => None,
        }
    }

    pub fn as_joint(&self) -> Option<&JointPose> {
        match self {
            PoseData::Joint(joints) => Some(joints),
            PoseData::Cartesian(_) => None,
        }
    }
}

impl From<Position> for PoseData {
    fn from(pose: Position) -> Self {
        PoseData::Cartesian(pose)
    }
}

impl From<JointPose> for PoseData {
    fn from(joints: JointPose) -> Self {
        PoseData::Joint(joints)
    }
}

/// Convert `data` between `"cartesian"` and `"joint"` using a URDF model.
///
/// Same-type conversions return the input without reading the model.
///
/// Joint `Jn` feeds the n-th actuated joint of the chain; joints the caller
/// leaves out are taken as 0°.
///
/// The inverse direction is a local numeric solve. It has no notion of the
/// Front/Up/Left/Flip/Turn configuration flags: the only way to steer it
/// toward a particular branch is `seed`, which should already lie close to
/// the intended solution. Without a seed the solve starts from all zeros.
pub fn convert_coordinates(
    data: &PoseData,
    model_path: impl AsRef<Path>,
    from_type: &str,
    to_type: &str,
    seed: Option<&JointPose>,
) -> Result<PoseData> {
    let from: CoordinateType = from_type.parse()?;
    let to: CoordinateType = to_type.parse()?;
    KinematicsBridge::new().convert(data, model_path.as_ref(), from, to, seed)
}

/// Conversion front end over any [`ChainLoader`].
#[derive(Debug, Clone, Default)]
pub struct KinematicsBridge<L = UrdfLoader> {
    loader: L,
}

impl KinematicsBridge<UrdfLoader> {
    pub fn new() -> Self {
        Self { loader: UrdfLoader }
    }
}

impl<L: ChainLoader> KinematicsBridge<L> {
    pub fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    pub fn convert(
        &self,
        data: &PoseData,
        model_path: &Path,
        from: CoordinateType,
        to: CoordinateType,
        seed: Option<&JointPose>,
    ) -> Result<PoseData> {
        if data.coordinate_type() != from {
            return Err(FrcError::InvalidConversionType(format!(
                "{} (data is {})",
                from,
                data.coordinate_type()
            )));
        }
        if from == to {
            return Ok(data.clone());
        }

        self.check_model_path(model_path)?;
        let chain = self.loader.load(model_path)?;
        let count = chain.joint_count();
        if count > MAX_JOINTS as usize {
            return Err(FrcError::ModelLoad(format!(
                "chain has {} actuated joints, at most {} are addressable",
                count, MAX_JOINTS
            )));
        }

        match data {
            PoseData::Joint(joints) => {
                if let Some((index, _)) = joints.iter().find(|(index, _)| *index as usize > count) {
                    warn!(joint = index, count, "joint beyond the chain is ignored");
                }
                let angles = to_radians(&joints.to_dense(count));
                let pose = chain.forward(&angles)?;
                Ok(PoseData::Cartesian(isometry_to_pose(&pose)))
            }
            PoseData::Cartesian(pose) => {
                let target = pose_to_isometry(pose);
                let start = match seed {
                    Some(seed) => to_radians(&seed.to_dense(count)),
                    None => vec![0.0; count],
                };
                let solution = chain.inverse(&target, &start)?;
                let degrees: Vec<f64> = solution.iter().map(|angle| angle.to_degrees()).collect();
                Ok(PoseData::Joint(JointPose::from_slice(&degrees)))
            }
        }
    }

    fn check_model_path(&self, path: &Path) -> Result<()> {
        let extension_ok = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(self.loader.extension()))
            .unwrap_or(false);
        if !path.is_file() || !extension_ok {
            return Err(FrcError::ModelNotFound(path.to_path_buf()));
        }
        Ok(())
    }
}

fn to_radians(degrees: &[f64]) -> Vec<f64> {
    degrees.iter().map(|angle| angle.to_radians()).collect()
}
