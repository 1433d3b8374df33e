//! Generic Access Profile types shared with the security manager

pub mod constants;
pub mod types;

pub use types::{BdAddr, DeviceAddress, DeviceAddressType};
