//! bluesm - Bluetooth Security Manager pairing bearer
//!
//! This library implements the SMP side of a Bluetooth host stack: the
//! bearer that runs on the SMP fixed L2CAP channel of a logical link,
//! performs the Pairing Feature Exchange and relays the values of the later
//! pairing phases between the peer and the local pairing logic.
//!
//! The L2CAP channel and the timer are abstracted behind the
//! [`l2cap::Channel`] and [`smp::TimerService`] traits so that the bearer
//! can be driven by any link layer or event loop.

pub mod error;
pub mod gap;
pub mod hci;
pub mod l2cap;
pub mod smp;

// Re-export common types for convenience
pub use error::HostError;
pub use gap::{BdAddr, DeviceAddress, DeviceAddressType};
pub use hci::{LinkKey, LinkType, Role};
pub use l2cap::{Channel, L2capError};
pub use smp::{
    Bearer, BearerConfig, ErrorCode, IoCapability, Listener, PairingFeatures, PairingMethod,
    PairingPhase, SmpError, SmpResult, Status, ThreadTimer, TimerService,
};
