use std::path::Path;

use nalgebra::Isometry3;

use crate::errors::Result;

/// Tool pose of a kinematic chain, in the chain's own length unit.
pub type Pose = Isometry3<f64>;

/// A serial chain of actuated joints.
///
/// Joint vectors are in radians and ordered from base to tool; index 0 is J1.
pub trait KinematicChain {
    /// Number of actuated joints.
    fn joint_count(&self) -> usize;

    fn forward(&self, joints: &[f64]) -> Result<Pose>;

    /// Local inverse solve starting from `seed`.
    ///
    /// The result is the solution nearest to the seed that the solver can
    /// reach, which is not necessarily on the seed's configuration branch.
    fn inverse(&self, target: &Pose, seed: &[f64]) -> Result<Vec<f64>>;
}

/// Builds a chain from a model file.
pub trait ChainLoader {
    type Chain: KinematicChain;

    /// File extension, without the dot, that model paths must carry.
    fn extension(&self) -> &str {
        "urdf"
    }

    fn load(&self, path: &Path) -> Result<Self::Chain>;
}
