//! HCI connection types
//!
//! Only the pieces of the link layer the security manager depends on: the
//! local role on a connection, the link type and link keys.

pub mod connection;

pub use connection::{LinkKey, LinkType, Role};
