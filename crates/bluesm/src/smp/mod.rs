//! Security Manager Protocol (SMP) implementation
//!
//! This module implements the pairing bearer of the Bluetooth Security
//! Manager Protocol, which is responsible for:
//! - Framing and validating SMP PDUs on the SMP fixed channel
//! - The Pairing Feature Exchange and pairing method selection
//! - Carrying confirm/random values and distributed keys to the pairing logic
//! - The Security Manager Timer
//!
//! Cryptographic toolbox functions and key storage live outside this module.

pub mod bearer;
pub mod constants;
pub mod packet;
pub mod pairing;
pub mod timer;
pub mod types;
pub mod util;


// Re-export public API
pub use self::bearer::{Bearer, Listener, PairingPhase};
pub use self::packet::{Code, PacketReader, PacketWriter, Payload};
pub use self::pairing::{build_pairing_parameters, resolve_features, LocalPairingParameters};
pub use self::timer::{ThreadTimer, TimerCallback, TimerHandle, TimerService};
pub use self::types::*;
pub use self::util::select_pairing_method;
