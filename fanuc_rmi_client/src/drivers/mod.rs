mod driver_config;
pub use driver_config::*;

#[cfg(feature = "driver")]
mod connection;
#[cfg(feature = "driver")]
pub use connection::*;

#[cfg(feature = "driver")]
mod telemetry;
#[cfg(feature = "driver")]
pub use telemetry::*;

#[cfg(feature = "driver")]
mod client;
#[cfg(feature = "driver")]
pub use client::*;
