//! L2CAP (Logical Link Control and Adaptation Protocol) interface
//!
//! This module provides the fixed channel interface the security manager
//! is layered on:
//! - SMP channel identifiers and MTUs
//! - The `Channel` trait for sending and receiving SDUs

pub mod channel;
pub mod constants;
pub mod types;

// Re-export the public API
pub use self::channel::{Channel, ClosedCallback, RxCallback};
pub use self::types::*;
