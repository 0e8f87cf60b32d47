mod frc_linearmotion;
mod frc_linearrelative;
mod frc_jointmotionjrep;
mod frc_jointrelativejrep;
mod frc_waittime;

pub use frc_linearmotion::*;
pub use frc_linearrelative::*;
pub use frc_jointmotionjrep::*;
pub use frc_jointrelativejrep::*;
pub use frc_waittime::*;

use crate::errors::{FrcError, Result};

/// Sequence ids start at 1; the controller rejects 0.
pub(crate) fn check_sequence_id(sequence_id: u32) -> Result<u32> {
    if sequence_id == 0 {
        return Err(FrcError::InvalidSequenceId);
    }
    Ok(sequence_id)
}
