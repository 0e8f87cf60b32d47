mod frc_initialize;
mod frc_setuframeutool;
mod frc_getuframeutool;
mod frc_setoverride;
mod frc_readcartesianposition;
mod frc_readjointangles;
mod frc_readuframedata;
mod frc_writeuframedata;
mod frc_readutooldata;
mod frc_writeutooldata;
mod frc_getstatus;

pub use frc_initialize::*;
pub use frc_setuframeutool::*;
pub use frc_getuframeutool::*;
pub use frc_setoverride::*;
pub use frc_readcartesianposition::*;
pub use frc_readjointangles::*;
pub use frc_readuframedata::*;
pub use frc_writeuframedata::*;
pub use frc_readutooldata::*;
pub use frc_writeutooldata::*;
pub use frc_getstatus::*;

/// Motion group addressed when the caller does not pick one.
pub const DEFAULT_GROUP: u8 = 1;
