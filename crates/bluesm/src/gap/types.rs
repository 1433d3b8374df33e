use crate::gap::constants::*;
use std::fmt;

/// Address type as tracked by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceAddressType {
    /// BR/EDR device address
    BrEdr,
    /// LE public device address
    LePublic,
    /// LE random device address (static or private)
    LeRandom,
}

impl fmt::Display for DeviceAddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceAddressType::BrEdr => write!(f, "br/edr"),
            DeviceAddressType::LePublic => write!(f, "le-public"),
            DeviceAddressType::LeRandom => write!(f, "le-random"),
        }
    }
}

/// Bluetooth device address. Bytes are stored in wire (little-endian) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BdAddr {
    pub bytes: [u8; BD_ADDR_LEN],
}

impl BdAddr {
    pub fn new(bytes: [u8; BD_ADDR_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.bytes[5],
            self.bytes[4],
            self.bytes[3],
            self.bytes[2],
            self.bytes[1],
            self.bytes[0]
        )
    }
}

/// A device address together with its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
    pub address_type: DeviceAddressType,
    pub value: BdAddr,
}

impl DeviceAddress {
    pub fn new(address_type: DeviceAddressType, value: BdAddr) -> Self {
        Self {
            address_type,
            value,
        }
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.address_type)
    }
}
