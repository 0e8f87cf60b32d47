use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const MAX_JOINTS: u8 = 9;

/// Joint angles in degrees keyed by joint index `1..=9`.
///
/// The mapping is sparse: a joint that was never set is absent, not zero.
/// On the wire it is the `{"J1": .., "J2": ..}` object used by joint
/// representation instructions and joint reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JointPose {
    angles: BTreeMap<u8, f64>,
}

impl JointPose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from consecutive angles starting at J1.
    pub fn from_slice(angles: &[f64]) -> Self {
        let mut pose = Self::new();
        for (index, angle) in angles.iter().take(MAX_JOINTS as usize).enumerate() {
            pose.angles.insert(index as u8 + 1, *angle);
        }
        pose
    }

    /// Set joint `index`; indices outside `1..=9` are ignored and `false` is returned.
    pub fn set(&mut self, index: u8, degrees: f64) -> bool {
        if !(1..=MAX_JOINTS).contains(&index) {
            return false;
        }
        self.angles.insert(index, degrees);
        true
    }

    pub fn with(mut self, index: u8, degrees: f64) -> Self {
        self.set(index, degrees);
        self
    }

    pub fn get(&self, index: u8) -> Option<f64> {
        self.angles.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// Present joints in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.angles.iter().map(|(index, angle)| (*index, *angle))
    }

    /// Dense vector of `len` angles, J1 first; absent joints become `0.0`.
    pub fn to_dense(&self, len: usize) -> Vec<f64> {
        (1..=len)
            .map(|index| {
                u8::try_from(index)
                    .ok()
                    .and_then(|index| self.get(index))
                    .unwrap_or(0.0)
            })
            .collect()
    }
}

fn parse_joint_key(key: &str) -> Option<u8> {
    let digits = key.strip_prefix('J').or_else(|| key.strip_prefix('j'))?;
    let index: u8 = digits.parse().ok()?;
    (1..=MAX_JOINTS).contains(&index).then_some(index)
}

impl Serialize for JointPose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.angles.len()))?;
        for (index, angle) in &self.angles {
            map.serialize_entry(&format!("J{}", index), angle)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for JointPose {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct JointPoseVisitor;

        impl<'de> Visitor<'de> for JointPoseVisitor {
            type Value = JointPose;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of J1..J9 joint angles")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<JointPose, A::Error> {
                let mut pose = JointPose::new();
                while let Some(key) = access.next_key::<String>()? {
                    match parse_joint_key(&key) {
                        Some(index) => {
                            let angle: f64 = access.next_value()?;
                            pose.angles.insert(index, angle);
                        }
                        // Controllers may add fields such as extended axes; skip them.
                        None => {
                            access.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(pose)
            }
        }

        deserializer.deserialize_map(JointPoseVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_pose_keeps_gaps() {
        let pose: JointPose = serde_json::from_str(r#"{"J1": 10.0, "J3": -5.5, "Ext": 1}"#).unwrap();
        assert_eq!(pose.len(), 2);
        assert_eq!(pose.get(2), None);
        assert_eq!(pose.to_dense(4), vec![10.0, 0.0, -5.5, 0.0]);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut pose = JointPose::new();
        assert!(!pose.set(0, 1.0));
        assert!(!pose.set(10, 1.0));
        assert!(pose.set(9, 1.0));
        assert_eq!(serde_json::to_string(&pose).unwrap(), r#"{"J9":1.0}"#);
    }
}
