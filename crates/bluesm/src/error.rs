//! Error types for the bluesm library
//!
//! This module defines the host-side failure category: errors that are
//! raised locally and never carried a reason code from the peer.

use thiserror::Error;

/// Local failures that end a pairing procedure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    #[error("Timed out waiting for the peer")]
    TimedOut,

    #[error("Link disconnected")]
    LinkDisconnected,

    #[error("Operation failed")]
    Failed,
}
