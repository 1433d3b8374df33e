//! Type definitions for L2CAP operations

use thiserror::Error;

/// Error types specific to L2CAP operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum L2capError {
    #[error("Channel closed")]
    ChannelClosed,

    #[error("Channel already activated")]
    AlreadyActivated,

    #[error("MTU exceeded ({0} bytes)")]
    MtuExceeded(usize),
}

/// Result type for L2CAP operations
pub type L2capResult<T> = std::result::Result<T, L2capError>;

/// Channel identifier
pub type ChannelId = u16;
