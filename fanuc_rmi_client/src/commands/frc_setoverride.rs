use serde::{Deserialize, Serialize};

use crate::errors::{FrcError, Result};

pub const MAX_OVERRIDE: u8 = 100;

/// General speed override, in percent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrcSetOverRide {
    #[serde(rename = "Value")]
    pub value: u8,
}

impl FrcSetOverRide {
    pub fn new(value: u8) -> Result<Self> {
        if value > MAX_OVERRIDE {
            return Err(FrcError::InvalidConfig(format!(
                "speed override {} exceeds {}%",
                value, MAX_OVERRIDE
            )));
        }
        Ok(Self { value })
    }
}
