mod frc_error;

pub use frc_error::*;
