use serde::{Deserialize, Serialize};

use super::check_sequence_id;
use crate::errors::Result;

/// Dwell in the controller's program sequence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrcWaitTime {
    #[serde(rename = "SequenceID")]
    pub sequence_id: u32,
    #[serde(rename = "Time")]
    pub time: f64,
}

impl FrcWaitTime {
    pub fn new(sequence_id: u32, seconds: f64) -> Result<Self> {
        Ok(Self {
            sequence_id: check_sequence_id(sequence_id)?,
            time: seconds,
        })
    }
}
