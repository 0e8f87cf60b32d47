use serde::{Deserialize, Serialize};

use super::check_sequence_id;
use crate::errors::Result;
use crate::{Configuration, Position, SpeedType, TermType};

/// Straight-line move by an offset from the current TCP pose.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrcLinearRelative {
    #[serde(rename = "SequenceID")]
    pub sequence_id: u32,
    #[serde(rename = "Configuration")]
    pub configuration: Configuration,
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "SpeedType")]
    pub speed_type: SpeedType,
    #[serde(rename = "Speed")]
    pub speed: f64,
    #[serde(rename = "TermType")]
    pub term_type: TermType,
    #[serde(rename = "TermValue", skip_serializing_if = "Option::is_none", default)]
    pub term_value: Option<u8>,
}

impl FrcLinearRelative {
    pub fn new(
        sequence_id: u32,
        configuration: Configuration,
        offset: Position,
        speed: f64,
    ) -> Result<Self> {
        Ok(Self {
            sequence_id: check_sequence_id(sequence_id)?,
            configuration,
            position: offset,
            speed_type: SpeedType::MMSec,
            speed,
            term_type: TermType::FINE,
            term_value: None,
        })
    }

    pub fn with_termination(mut self, term_type: TermType, term_value: u8) -> Self {
        self.term_type = term_type;
        self.term_value = match term_type {
            TermType::CNT => Some(term_value.clamp(1, 100)),
            TermType::FINE => None,
        };
        self
    }
}
