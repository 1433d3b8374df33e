//! Type definitions for the Security Manager Protocol
use super::constants::*;
use crate::error::HostError;
use crate::hci::Role;
use crate::l2cap::L2capError;
use bitflags::bitflags;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by local SMP operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmpError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Malformed PDU (code {code:#04x}): expected {expected} payload bytes, got {actual}")]
    MalformedPdu {
        code: u8,
        expected: usize,
        actual: usize,
    },

    #[error("Not pairing")]
    NotPairing,

    #[error("Feature exchange already pending")]
    FeatureExchangePending,

    #[error("Operation not allowed in the {0} role")]
    InvalidRole(Role),

    #[error("Operation not supported on this link type")]
    UnsupportedLinkType,

    #[error("Out of memory")]
    OutOfMemory,

    #[error("Failed to start the pairing timer")]
    TimerUnavailable,

    #[error("L2CAP error: {0}")]
    L2cap(#[from] L2capError),
}

/// Result type for SMP operations
pub type SmpResult<T> = Result<T, SmpError>;

/// 128-bit value as it appears on the wire (confirm, random, LTK, IRK)
pub type UInt128 = [u8; 16];

/// Pairing Failed reason codes (Vol 3, Part H, 3.5.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(u8)]
pub enum ErrorCode {
    #[error("passkey entry failed")]
    PasskeyEntryFailed = SMP_REASON_PASSKEY_ENTRY_FAILED,

    #[error("OOB not available")]
    OobNotAvailable = SMP_REASON_OOB_NOT_AVAILABLE,

    #[error("authentication requirements")]
    AuthenticationRequirements = SMP_REASON_AUTHENTICATION_REQUIREMENTS,

    #[error("confirm value failed")]
    ConfirmValueFailed = SMP_REASON_CONFIRM_VALUE_FAILED,

    #[error("pairing not supported")]
    PairingNotSupported = SMP_REASON_PAIRING_NOT_SUPPORTED,

    #[error("encryption key size")]
    EncryptionKeySize = SMP_REASON_ENCRYPTION_KEY_SIZE,

    #[error("command not supported")]
    CommandNotSupported = SMP_REASON_COMMAND_NOT_SUPPORTED,

    #[error("unspecified reason")]
    UnspecifiedReason = SMP_REASON_UNSPECIFIED_REASON,

    #[error("repeated attempts")]
    RepeatedAttempts = SMP_REASON_REPEATED_ATTEMPTS,

    #[error("invalid parameters")]
    InvalidParameters = SMP_REASON_INVALID_PARAMETERS,

    #[error("DHKey check failed")]
    DhKeyCheckFailed = SMP_REASON_DHKEY_CHECK_FAILED,

    #[error("numeric comparison failed")]
    NumericComparisonFailed = SMP_REASON_NUMERIC_COMPARISON_FAILED,

    #[error("BR/EDR pairing in progress")]
    BrEdrPairingInProgress = SMP_REASON_BR_EDR_PAIRING_IN_PROGRESS,

    #[error("cross-transport key derivation not allowed")]
    CrossTransportKeyNotAllowed = SMP_REASON_CROSS_TRANSPORT_KEY_NOT_ALLOWED,
}

impl ErrorCode {
    /// Convert to u8 value for protocol
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from u8 value from protocol
    pub fn from_u8(value: u8) -> Option<Self> {
        let code = match value {
            SMP_REASON_PASSKEY_ENTRY_FAILED => ErrorCode::PasskeyEntryFailed,
            SMP_REASON_OOB_NOT_AVAILABLE => ErrorCode::OobNotAvailable,
            SMP_REASON_AUTHENTICATION_REQUIREMENTS => ErrorCode::AuthenticationRequirements,
            SMP_REASON_CONFIRM_VALUE_FAILED => ErrorCode::ConfirmValueFailed,
            SMP_REASON_PAIRING_NOT_SUPPORTED => ErrorCode::PairingNotSupported,
            SMP_REASON_ENCRYPTION_KEY_SIZE => ErrorCode::EncryptionKeySize,
            SMP_REASON_COMMAND_NOT_SUPPORTED => ErrorCode::CommandNotSupported,
            SMP_REASON_UNSPECIFIED_REASON => ErrorCode::UnspecifiedReason,
            SMP_REASON_REPEATED_ATTEMPTS => ErrorCode::RepeatedAttempts,
            SMP_REASON_INVALID_PARAMETERS => ErrorCode::InvalidParameters,
            SMP_REASON_DHKEY_CHECK_FAILED => ErrorCode::DhKeyCheckFailed,
            SMP_REASON_NUMERIC_COMPARISON_FAILED => ErrorCode::NumericComparisonFailed,
            SMP_REASON_BR_EDR_PAIRING_IN_PROGRESS => ErrorCode::BrEdrPairingInProgress,
            SMP_REASON_CROSS_TRANSPORT_KEY_NOT_ALLOWED => ErrorCode::CrossTransportKeyNotAllowed,
            _ => return None,
        };
        Some(code)
    }
}

/// Outcome reported to the listener when a pairing procedure fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Status {
    /// Failure carrying an SMP reason code, sent or received
    #[error("protocol error: {0}")]
    Protocol(ErrorCode),

    /// Failure raised locally without a reason code
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl From<ErrorCode> for Status {
    fn from(ecode: ErrorCode) -> Self {
        Status::Protocol(ecode)
    }
}

/// IO Capability types for pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCapability {
    /// Display only capability
    DisplayOnly,
    /// Display with yes/no capability
    DisplayYesNo,
    /// Keyboard only
    KeyboardOnly,
    /// No input, no output
    NoInputNoOutput,
    /// Both keyboard and display
    KeyboardDisplay,
}

impl IoCapability {
    /// Convert to u8 value for protocol
    pub fn to_u8(&self) -> u8 {
        match self {
            IoCapability::DisplayOnly => SMP_IO_CAPABILITY_DISPLAY_ONLY,
            IoCapability::DisplayYesNo => SMP_IO_CAPABILITY_DISPLAY_YES_NO,
            IoCapability::KeyboardOnly => SMP_IO_CAPABILITY_KEYBOARD_ONLY,
            IoCapability::NoInputNoOutput => SMP_IO_CAPABILITY_NO_INPUT_NO_OUTPUT,
            IoCapability::KeyboardDisplay => SMP_IO_CAPABILITY_KEYBOARD_DISPLAY,
        }
    }

    /// Convert from u8 value from protocol
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            SMP_IO_CAPABILITY_DISPLAY_ONLY => Some(IoCapability::DisplayOnly),
            SMP_IO_CAPABILITY_DISPLAY_YES_NO => Some(IoCapability::DisplayYesNo),
            SMP_IO_CAPABILITY_KEYBOARD_ONLY => Some(IoCapability::KeyboardOnly),
            SMP_IO_CAPABILITY_NO_INPUT_NO_OUTPUT => Some(IoCapability::NoInputNoOutput),
            SMP_IO_CAPABILITY_KEYBOARD_DISPLAY => Some(IoCapability::KeyboardDisplay),
            _ => None,
        }
    }
}

impl fmt::Display for IoCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoCapability::DisplayOnly => write!(f, "Display Only"),
            IoCapability::DisplayYesNo => write!(f, "Display Yes/No"),
            IoCapability::KeyboardOnly => write!(f, "Keyboard Only"),
            IoCapability::NoInputNoOutput => write!(f, "No Input No Output"),
            IoCapability::KeyboardDisplay => write!(f, "Keyboard Display"),
        }
    }
}

/// OOB data flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OobDataFlag {
    NotPresent,
    Present,
}

impl OobDataFlag {
    pub fn to_u8(&self) -> u8 {
        match self {
            OobDataFlag::NotPresent => SMP_OOB_DATA_NOT_PRESENT,
            OobDataFlag::Present => SMP_OOB_DATA_PRESENT,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            SMP_OOB_DATA_NOT_PRESENT => Some(OobDataFlag::NotPresent),
            SMP_OOB_DATA_PRESENT => Some(OobDataFlag::Present),
            _ => None,
        }
    }
}

bitflags! {
    /// Authentication requirements field
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AuthReq: u8 {
        const BONDING = SMP_AUTH_REQ_BONDING;
        const MITM = SMP_AUTH_REQ_MITM;
        const SC = SMP_AUTH_REQ_SC;
        const KEYPRESS = SMP_AUTH_REQ_KEYPRESS;
        const CT2 = SMP_AUTH_REQ_CT2;
    }
}

bitflags! {
    /// Initiator/Responder key distribution field
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyDistGen: u8 {
        /// LTK, EDIV and Rand
        const ENC_KEY = SMP_KEY_DIST_ENC_KEY;
        /// IRK and identity address
        const ID_KEY = SMP_KEY_DIST_ID_KEY;
        /// CSRK
        const SIGN_KEY = SMP_KEY_DIST_SIGN_KEY;
        /// Derive the BR/EDR link key from the LTK
        const LINK_KEY = SMP_KEY_DIST_LINK_KEY;
    }
}

/// Pairing methods, as seen from the local device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingMethod {
    /// Just Works method - no user interaction
    JustWorks,
    /// Passkey Entry where the local device displays the passkey
    PasskeyEntryDisplay,
    /// Passkey Entry where the local user types the passkey
    PasskeyEntryInput,
    /// Numeric Comparison - user confirms matching numbers (SC only)
    NumericComparison,
    /// Out of Band data
    OutOfBand,
}

impl PairingMethod {
    /// Whether the method protects against a man-in-the-middle
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, PairingMethod::JustWorks)
    }
}

impl fmt::Display for PairingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingMethod::JustWorks => write!(f, "Just Works"),
            PairingMethod::PasskeyEntryDisplay => write!(f, "Passkey Entry (display)"),
            PairingMethod::PasskeyEntryInput => write!(f, "Passkey Entry (input)"),
            PairingMethod::NumericComparison => write!(f, "Numeric Comparison"),
            PairingMethod::OutOfBand => write!(f, "Out of Band"),
        }
    }
}

/// Security properties agreed on during the feature exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingFeatures {
    /// True if the local device sent the Pairing Request
    pub initiator: bool,
    /// True if LE Secure Connections pairing will be used
    pub secure_connections: bool,
    /// Selected pairing method
    pub method: PairingMethod,
    /// Negotiated encryption key size in bytes
    pub encryption_key_size: u8,
    /// Keys the local device will distribute
    pub local_key_distribution: KeyDistGen,
    /// Keys the peer will distribute
    pub remote_key_distribution: KeyDistGen,
}

impl PairingFeatures {
    pub fn new(
        initiator: bool,
        secure_connections: bool,
        method: PairingMethod,
        encryption_key_size: u8,
        local_key_distribution: KeyDistGen,
        remote_key_distribution: KeyDistGen,
    ) -> Self {
        Self {
            initiator,
            secure_connections,
            method,
            encryption_key_size,
            local_key_distribution,
            remote_key_distribution,
        }
    }
}

/// Address type carried in Identity Address Information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Public,
    StaticRandom,
}

impl AddressType {
    pub fn to_u8(&self) -> u8 {
        match self {
            AddressType::Public => SMP_ADDR_TYPE_PUBLIC,
            AddressType::StaticRandom => SMP_ADDR_TYPE_STATIC_RANDOM,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            SMP_ADDR_TYPE_PUBLIC => Some(AddressType::Public),
            SMP_ADDR_TYPE_STATIC_RANDOM => Some(AddressType::StaticRandom),
            _ => None,
        }
    }
}

/// Local pairing policy for one bearer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearerConfig {
    /// Local role on the link
    pub role: Role,
    /// Whether LE Secure Connections is supported
    pub sc_supported: bool,
    /// Local IO capability
    pub io_capability: IoCapability,
    /// Whether MITM protection is required
    pub mitm_required: bool,
    /// Whether OOB authentication data is available
    pub oob_available: bool,
    /// Security Manager Timer duration
    pub pairing_timeout: Duration,
}

impl BearerConfig {
    /// Create a configuration with the default policy for `role`
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }
}

impl Default for BearerConfig {
    fn default() -> Self {
        Self {
            role: Role::Master,
            sc_supported: false,
            io_capability: IoCapability::NoInputNoOutput,
            mitm_required: false,
            oob_available: false,
            pairing_timeout: SMP_PAIRING_TIMEOUT,
        }
    }
}
