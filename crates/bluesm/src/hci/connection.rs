//! Connection-level types handed to upper layers by the link controller

use std::fmt;

/// Role of the local device on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Link master (LE central). Initiates pairing.
    Master,
    /// Link slave (LE peripheral). Responds to pairing.
    Slave,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Master => write!(f, "master"),
            Role::Slave => write!(f, "slave"),
        }
    }
}

/// Type of the logical link underneath a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// LE-U logical link
    Le,
    /// ACL-U logical link (BR/EDR)
    Acl,
}

/// An encryption key together with the values that identify it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkKey {
    value: [u8; 16],
    rand: u64,
    ediv: u16,
}

impl LinkKey {
    /// Create a new link key
    pub fn new(value: [u8; 16], rand: u64, ediv: u16) -> Self {
        Self { value, rand, ediv }
    }

    /// Key value
    pub fn value(&self) -> &[u8; 16] {
        &self.value
    }

    /// Random number (Rand)
    pub fn rand(&self) -> u64 {
        self.rand
    }

    /// Encrypted diversifier (EDIV)
    pub fn ediv(&self) -> u16 {
        self.ediv
    }
}
