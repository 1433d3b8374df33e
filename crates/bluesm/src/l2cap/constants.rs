//! Constants for the L2CAP fixed channels used by the security manager

/// Security Manager channel on an LE-U logical link
pub const L2CAP_LE_SMP_CID: u16 = 0x0006;

/// Security Manager channel on an ACL-U logical link
pub const L2CAP_SMP_CID: u16 = 0x0007;

/// SMP MTU on the LE transport (Vol 3, Part H, 3.2)
pub const SMP_LE_MTU: usize = 23;

/// SMP MTU on the BR/EDR transport (Vol 3, Part H, 3.2)
pub const SMP_BREDR_MTU: usize = 65;
