use std::collections::{HashMap, HashSet};
use std::path::Path;

use nalgebra::{DMatrix, DVector, Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use tracing::debug;
use urdf_rs::{Joint, JointType, Robot};

use super::chain::{ChainLoader, KinematicChain, Pose};
use crate::errors::{FrcError, Result};

const DAMPING: f64 = 0.05;
/// Largest per-joint change in one iteration, radians.
const MAX_STEP: f64 = 0.2;
const MAX_ITERATIONS: usize = 500;
const TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
struct ActiveJoint {
    name: String,
    // Offset from the previous actuated joint, fixed joints folded in.
    origin: Isometry3<f64>,
    axis: Unit<Vector3<f64>>,
    limits: Option<(f64, f64)>,
}

impl ActiveJoint {
    fn clamp(&self, angle: f64) -> f64 {
        match self.limits {
            Some((lower, upper)) => angle.clamp(lower, upper),
            None => angle,
        }
    }
}

/// Serial chain read from a URDF description.
///
/// The chain runs from the root link to the deepest leaf with the most
/// actuated joints. Revolute and continuous joints are actuated; fixed joints
/// are folded into their neighbours. Any other joint type on that path is
/// rejected.
#[derive(Debug, Clone)]
pub struct UrdfChain {
    name: String,
    joints: Vec<ActiveJoint>,
    tip: Isometry3<f64>,
}

impl UrdfChain {
    pub fn from_file(path: &Path) -> Result<Self> {
        let robot = urdf_rs::read_file(path)
            .map_err(|e| FrcError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_robot(&robot)
    }

    pub fn from_urdf_str(xml: &str) -> Result<Self> {
        let robot =
            urdf_rs::read_from_string(xml).map_err(|e| FrcError::ModelLoad(e.to_string()))?;
        Self::from_robot(&robot)
    }

    pub fn from_robot(robot: &Robot) -> Result<Self> {
        let child_links: HashSet<&str> = robot.joints.iter().map(|j| j.child.link.as_str()).collect();
        let roots: Vec<&str> = robot
            .links
            .iter()
            .map(|link| link.name.as_str())
            .filter(|name| !child_links.contains(name))
            .collect();
        let root = match roots.as_slice() {
            [root] => *root,
            [] => return Err(FrcError::ModelLoad("model has no root link".to_string())),
            _ => {
                return Err(FrcError::ModelLoad(format!(
                    "model has several root links: {}",
                    roots.join(", ")
                )))
            }
        };

        let mut children: HashMap<&str, Vec<&Joint>> = HashMap::new();
        for joint in &robot.joints {
            children.entry(joint.parent.link.as_str()).or_default().push(joint);
        }
        let path = deepest_branch(root, &children, robot.joints.len())?;

        let mut joints = Vec::new();
        let mut pending = Isometry3::identity();
        for joint in path {
            let origin = pending * joint_origin(joint);
            match joint.joint_type {
                JointType::Fixed => pending = origin,
                JointType::Revolute | JointType::Continuous => {
                    let xyz = &joint.axis.xyz;
                    let axis = Unit::try_new(Vector3::new(xyz[0], xyz[1], xyz[2]), 1e-12).ok_or_else(|| {
                        FrcError::ModelLoad(format!("joint '{}' has a zero axis", joint.name))
                    })?;
                    let limits = match joint.joint_type {
                        JointType::Revolute if joint.limit.lower < joint.limit.upper => {
                            Some((joint.limit.lower, joint.limit.upper))
                        }
                        _ => None,
                    };
                    joints.push(ActiveJoint {
                        name: joint.name.clone(),
                        origin,
                        axis,
                        limits,
                    });
                    pending = Isometry3::identity();
                }
                ref other => {
                    return Err(FrcError::ModelLoad(format!(
                        "joint '{}' has unsupported type {:?}",
                        joint.name, other
                    )))
                }
            }
        }

        if joints.is_empty() {
            return Err(FrcError::ModelLoad(format!(
                "model '{}' has no revolute joints",
                robot.name
            )));
        }
        debug!(
            model = %robot.name,
            joints = ?joints.iter().map(|j| j.name.as_str()).collect::<Vec<_>>(),
            "kinematic chain loaded"
        );
        Ok(Self {
            name: robot.name.clone(),
            joints,
            tip: pending,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Actuated joint names, base first.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.joints.iter().map(|joint| joint.name.as_str())
    }

    fn check_len(&self, joints: &[f64]) -> Result<()> {
        if joints.len() != self.joints.len() {
            return Err(FrcError::InvalidConfig(format!(
                "chain '{}' has {} joints, got {} values",
                self.name,
                self.joints.len(),
                joints.len()
            )));
        }
        Ok(())
    }

    /// Tool pose plus the world position and axis of every actuated joint.
    fn frames(&self, angles: &[f64]) -> (Pose, Vec<(Vector3<f64>, Vector3<f64>)>) {
        let mut frame = Isometry3::identity();
        let mut axes = Vec::with_capacity(self.joints.len());
        for (joint, angle) in self.joints.iter().zip(angles) {
            frame = frame * joint.origin;
            axes.push((frame.translation.vector, frame.rotation * joint.axis.into_inner()));
            let rotation = UnitQuaternion::from_axis_angle(&joint.axis, *angle);
            frame = frame * Isometry3::from_parts(Translation3::identity(), rotation);
        }
        (frame * self.tip, axes)
    }
}

impl KinematicChain for UrdfChain {
    fn joint_count(&self) -> usize {
        self.joints.len()
    }

    fn forward(&self, joints: &[f64]) -> Result<Pose> {
        self.check_len(joints)?;
        Ok(self.frames(joints).0)
    }

    /// Damped least squares on the geometric Jacobian, clamped to joint limits.
    fn inverse(&self, target: &Pose, seed: &[f64]) -> Result<Vec<f64>> {
        self.check_len(seed)?;
        let mut angles: Vec<f64> = self
            .joints
            .iter()
            .zip(seed)
            .map(|(joint, angle)| joint.clamp(*angle))
            .collect();
        let damping = DMatrix::<f64>::identity(6, 6) * (DAMPING * DAMPING);

        for _ in 0..MAX_ITERATIONS {
            let (current, axes) = self.frames(&angles);
            let error = pose_error(target, &current);
            let residual = error.norm();
            if residual < TOLERANCE {
                return Ok(angles);
            }

            let jacobian = jacobian(&axes, &current.translation.vector);
            let jjt = &jacobian * jacobian.transpose() + &damping;
            let Some(cholesky) = jjt.cholesky() else {
                return Err(FrcError::IkNotConverged { residual });
            };
            let mut step = jacobian.transpose() * cholesky.solve(&error);
            let largest = step.amax();
            if largest > MAX_STEP {
                step *= MAX_STEP / largest;
            }
            for ((angle, joint), delta) in angles.iter_mut().zip(&self.joints).zip(step.iter()) {
                *angle = joint.clamp(*angle + delta);
            }
        }

        let residual = pose_error(target, &self.frames(&angles).0).norm();
        if residual < TOLERANCE {
            Ok(angles)
        } else {
            Err(FrcError::IkNotConverged { residual })
        }
    }
}

/// Loads [`UrdfChain`]s from `.urdf` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrdfLoader;

impl ChainLoader for UrdfLoader {
    type Chain = UrdfChain;

    fn load(&self, path: &Path) -> Result<UrdfChain> {
        UrdfChain::from_file(path)
    }
}

fn joint_origin(joint: &Joint) -> Isometry3<f64> {
    let xyz = &joint.origin.xyz;
    let rpy = &joint.origin.rpy;
    Isometry3::from_parts(
        Translation3::new(xyz[0], xyz[1], xyz[2]),
        UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]),
    )
}

/// Pick the branch below `link` with the most actuated joints, then the longest.
fn deepest_branch<'a>(
    link: &str,
    children: &HashMap<&str, Vec<&'a Joint>>,
    budget: usize,
) -> Result<Vec<&'a Joint>> {
    let Some(joints) = children.get(link) else {
        return Ok(Vec::new());
    };
    if budget == 0 {
        return Err(FrcError::ModelLoad(format!("joint cycle below link '{}'", link)));
    }

    let mut best: Vec<&Joint> = Vec::new();
    let mut best_score = (0, 0);
    for joint in joints {
        let mut branch = vec![*joint];
        branch.extend(deepest_branch(&joint.child.link, children, budget - 1)?);
        let actuated = branch
            .iter()
            .filter(|j| !matches!(j.joint_type, JointType::Fixed))
            .count();
        let score = (actuated, branch.len());
        if score > best_score {
            best_score = score;
            best = branch;
        }
    }
    Ok(best)
}

/// Stacked `[position; rotation vector]` error, both in the world frame.
fn pose_error(target: &Pose, current: &Pose) -> DVector<f64> {
    let dp = target.translation.vector - current.translation.vector;
    let dr = (target.rotation * current.rotation.inverse()).scaled_axis();
    DVector::from_column_slice(&[dp.x, dp.y, dp.z, dr.x, dr.y, dr.z])
}

fn jacobian(axes: &[(Vector3<f64>, Vector3<f64>)], tool: &Vector3<f64>) -> DMatrix<f64> {
    let mut jacobian = DMatrix::zeros(6, axes.len());
    for (column, (origin, axis)) in axes.iter().enumerate() {
        let linear = axis.cross(&(tool - origin));
        for row in 0..3 {
            jacobian[(row, column)] = linear[row];
            jacobian[(row + 3, column)] = axis[row];
        }
    }
    jacobian
}
