#![cfg(feature = "kinematics")]

use std::path::{Path, PathBuf};

use fanuc_rmi_client::kinematics::{
    convert_coordinates, isometry_to_pose, pose_to_isometry, rotation_to_wpr, wpr_to_rotation,
    ChainLoader, CoordinateType, KinematicChain, KinematicsBridge, Pose, PoseData, UrdfLoader,
};
use fanuc_rmi_client::{FrcError, JointPose, Position, Result};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

fn model() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/six_axis.urdf")
}

fn assert_close(a: f64, b: f64, tolerance: f64) {
    assert!((a - b).abs() < tolerance, "{} != {} (tolerance {})", a, b, tolerance);
}

fn forward(joints: &JointPose) -> Position {
    let data = PoseData::Joint(joints.clone());
    match convert_coordinates(&data, model(), "joint", "cartesian", None).unwrap() {
        PoseData::Cartesian(pose) => pose,
        other => panic!("expected a Cartesian pose, got {:?}", other),
    }
}

#[test]
fn test_forward_at_zero() {
    let pose = forward(&JointPose::from_slice(&[0.0; 6]));
    assert_close(pose.x, 0.94, 1e-9);
    assert_close(pose.y, 0.0, 1e-9);
    assert_close(pose.z, 1.15, 1e-9);
    assert_close(pose.w, 0.0, 1e-9);
    assert_close(pose.p, 0.0, 1e-9);
    assert_close(pose.r, 0.0, 1e-9);
}

#[test]
fn test_forward_unspecified_joints_are_zero() {
    let pose = forward(&JointPose::new().with(1, 90.0));
    assert_close(pose.x, 0.0, 1e-9);
    assert_close(pose.y, 0.94, 1e-9);
    assert_close(pose.z, 1.15, 1e-9);
    assert_close(pose.r, 90.0, 1e-9);
}

#[test]
fn test_cartesian_joint_round_trip() {
    let original = JointPose::from_slice(&[10.0, 20.0, -15.0, 30.0, -40.0, 25.0]);
    let target = forward(&original);

    let seed = JointPose::from_slice(&[13.0, 17.0, -12.0, 27.0, -43.0, 28.0]);
    let solved = convert_coordinates(
        &PoseData::Cartesian(target),
        model(),
        "cartesian",
        "joint",
        Some(&seed),
    )
    .unwrap();
    let solved = solved.as_joint().unwrap();
    assert_eq!(solved.len(), 6);

    let reached = forward(solved);
    assert_close(reached.x, target.x, 1e-3);
    assert_close(reached.y, target.y, 1e-3);
    assert_close(reached.z, target.z, 1e-3);
    let error = (pose_to_isometry(&reached).rotation.inverse() * pose_to_isometry(&target).rotation).angle();
    assert!(error < 1e-3, "orientation error {}", error);
}

#[test]
fn test_unreachable_target_does_not_converge() {
    let far = Position::new(50.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    let result = convert_coordinates(&PoseData::Cartesian(far), model(), "cartesian", "joint", None);
    assert!(matches!(result, Err(FrcError::IkNotConverged { .. })));
}

#[test]
fn test_identity_conversion_skips_model() {
    let data = PoseData::Cartesian(Position::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
    let same = convert_coordinates(&data, "/does/not/exist.urdf", "cartesian", "cartesian", None).unwrap();
    assert_eq!(same, data);

    let joints = PoseData::Joint(JointPose::new().with(2, 15.0));
    let same = convert_coordinates(&joints, "missing.urdf", "JOINT", "joint", None).unwrap();
    assert_eq!(same, joints);
}

#[test]
fn test_invalid_conversion_type() {
    let data = PoseData::Cartesian(Position::default());
    match convert_coordinates(&data, model(), "polar", "joint", None) {
        Err(FrcError::InvalidConversionType(kind)) => assert_eq!(kind, "polar"),
        other => panic!("expected InvalidConversionType, got {:?}", other),
    }
    assert!(matches!(
        convert_coordinates(&data, model(), "cartesian", "quaternion", None),
        Err(FrcError::InvalidConversionType(_))
    ));
    // Data that does not match its declared type.
    assert!(matches!(
        convert_coordinates(&data, model(), "joint", "cartesian", None),
        Err(FrcError::InvalidConversionType(_))
    ));
}

#[test]
fn test_model_not_found() {
    let data = PoseData::Joint(JointPose::from_slice(&[0.0; 6]));
    let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/absent.urdf");
    assert!(matches!(
        convert_coordinates(&data, &missing, "joint", "cartesian", None),
        Err(FrcError::ModelNotFound(path)) if path == missing
    ));

    let dir = tempfile::tempdir().unwrap();
    let wrong_extension = dir.path().join("six_axis.xml");
    std::fs::copy(model(), &wrong_extension).unwrap();
    assert!(matches!(
        convert_coordinates(&data, &wrong_extension, "joint", "cartesian", None),
        Err(FrcError::ModelNotFound(_))
    ));
}

#[test]
fn test_unparseable_model() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.urdf");
    std::fs::write(&broken, "<robot name=\"broken\"><link").unwrap();
    let data = PoseData::Joint(JointPose::from_slice(&[0.0; 6]));
    assert!(matches!(
        convert_coordinates(&data, &broken, "joint", "cartesian", None),
        Err(FrcError::ModelLoad(_))
    ));
}

#[test]
fn test_orientation_helpers() {
    let pose = Position::new(100.0, -50.0, 25.0, 30.0, -20.0, 110.0);
    let back = isometry_to_pose(&pose_to_isometry(&pose));
    for (a, b) in [(pose.x, back.x), (pose.y, back.y), (pose.z, back.z), (pose.w, back.w), (pose.p, back.p), (pose.r, back.r)] {
        assert_close(a, b, 1e-9);
    }

    let (w, p, r) = rotation_to_wpr(&wpr_to_rotation(12.0, -90.0, 33.0));
    assert!(w.is_finite());
    assert_close(p, -90.0, 1e-6);
    assert_eq!(r, 0.0);
}

#[test]
fn test_coordinate_type_parsing() {
    assert_eq!(" Cartesian ".parse::<CoordinateType>().unwrap(), CoordinateType::Cartesian);
    assert_eq!(CoordinateType::Joint.to_string(), "joint");
    assert!("".parse::<CoordinateType>().is_err());
}

/// Chain whose tool position is the joint vector, used to exercise the bridge
/// without a model file.
struct CartesianGantry;

impl KinematicChain for CartesianGantry {
    fn joint_count(&self) -> usize {
        3
    }

    fn forward(&self, joints: &[f64]) -> Result<Pose> {
        Ok(Isometry3::from_parts(
            Translation3::new(joints[0], joints[1], joints[2]),
            UnitQuaternion::identity(),
        ))
    }

    fn inverse(&self, target: &Pose, _seed: &[f64]) -> Result<Vec<f64>> {
        let t: Vector3<f64> = target.translation.vector;
        Ok(vec![t.x, t.y, t.z])
    }
}

struct GantryLoader;

impl ChainLoader for GantryLoader {
    type Chain = CartesianGantry;

    fn extension(&self) -> &str {
        "urdf"
    }

    fn load(&self, _path: &Path) -> Result<CartesianGantry> {
        Ok(CartesianGantry)
    }
}

#[test]
fn test_bridge_with_custom_loader() {
    let bridge = KinematicsBridge::with_loader(GantryLoader);
    let joints = JointPose::from_slice(&[90.0, 0.0, 180.0]);
    let pose = bridge
        .convert(
            &PoseData::Joint(joints),
            &model(),
            CoordinateType::Joint,
            CoordinateType::Cartesian,
            None,
        )
        .unwrap();
    let pose = pose.as_cartesian().unwrap();
    // Degrees cross the bridge as radians.
    assert_close(pose.x, std::f64::consts::FRAC_PI_2, 1e-12);
    assert_close(pose.z, std::f64::consts::PI, 1e-12);

    // The built-in loader is the default one.
    let _default: KinematicsBridge<UrdfLoader> = KinematicsBridge::new();
}
