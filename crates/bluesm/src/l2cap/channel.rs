//! L2CAP Channel abstraction
//!
//! The security manager does not own a transport. It is handed a channel
//! that moves whole SDUs and reports closure; this trait is that seam.

use super::types::*;
use crate::hci::LinkType;

/// Callback for a received SDU
pub type RxCallback = Box<dyn FnMut(&[u8]) + Send + 'static>;

/// Callback for channel closure
pub type ClosedCallback = Box<dyn FnMut() + Send + 'static>;

/// A fixed channel carrying SMP PDUs for one logical link
pub trait Channel: Send + Sync {
    /// Local channel identifier
    fn id(&self) -> ChannelId;

    /// Type of the underlying logical link
    fn link_type(&self) -> LinkType;

    /// Start delivering inbound SDUs and closure notifications.
    ///
    /// Callbacks are invoked on the event loop that owns the link, never
    /// concurrently with each other.
    fn activate(&self, rx_callback: RxCallback, closed_callback: ClosedCallback)
        -> L2capResult<()>;

    /// Queue an SDU for transmission
    fn send(&self, sdu: Vec<u8>) -> L2capResult<()>;

    /// Report an unrecoverable error on the link, requesting disconnection
    fn signal_link_error(&self);
}
