//! Pairing method selection (Vol 3, Part H, 2.3.5.1)

use super::types::{IoCapability, PairingMethod};

/// Select the pairing method from the exchanged features.
///
/// The returned method is from the local device's point of view: for
/// passkey entry it tells whether the local device displays or inputs the
/// passkey.
pub fn select_pairing_method(
    secure_connections: bool,
    initiator_oob: bool,
    responder_oob: bool,
    mitm_required: bool,
    local_ioc: IoCapability,
    peer_ioc: IoCapability,
    local_initiator: bool,
) -> PairingMethod {
    // Secure Connections needs OOB data from one side only, legacy pairing
    // from both.
    if (secure_connections && (initiator_oob || responder_oob))
        || (!secure_connections && initiator_oob && responder_oob)
    {
        return PairingMethod::OutOfBand;
    }

    if !mitm_required
        || local_ioc == IoCapability::NoInputNoOutput
        || peer_ioc == IoCapability::NoInputNoOutput
    {
        return PairingMethod::JustWorks;
    }

    match (local_ioc, peer_ioc) {
        (IoCapability::DisplayOnly, IoCapability::KeyboardOnly)
        | (IoCapability::DisplayOnly, IoCapability::KeyboardDisplay) => {
            PairingMethod::PasskeyEntryDisplay
        }

        (IoCapability::DisplayYesNo, IoCapability::DisplayYesNo) => {
            if secure_connections {
                PairingMethod::NumericComparison
            } else {
                PairingMethod::JustWorks
            }
        }
        (IoCapability::DisplayYesNo, IoCapability::KeyboardDisplay) => {
            if secure_connections {
                PairingMethod::NumericComparison
            } else {
                PairingMethod::PasskeyEntryDisplay
            }
        }
        (IoCapability::DisplayYesNo, IoCapability::KeyboardOnly) => {
            PairingMethod::PasskeyEntryDisplay
        }

        (IoCapability::KeyboardOnly, _) => PairingMethod::PasskeyEntryInput,

        (IoCapability::KeyboardDisplay, IoCapability::KeyboardOnly) => {
            PairingMethod::PasskeyEntryDisplay
        }
        (IoCapability::KeyboardDisplay, IoCapability::DisplayOnly) => {
            PairingMethod::PasskeyEntryInput
        }
        (IoCapability::KeyboardDisplay, IoCapability::DisplayYesNo) => {
            if secure_connections {
                PairingMethod::NumericComparison
            } else {
                PairingMethod::PasskeyEntryInput
            }
        }
        (IoCapability::KeyboardDisplay, IoCapability::KeyboardDisplay) => {
            if secure_connections {
                PairingMethod::NumericComparison
            } else if local_initiator {
                // Legacy pairing: the initiator displays, the responder types.
                PairingMethod::PasskeyEntryDisplay
            } else {
                PairingMethod::PasskeyEntryInput
            }
        }

        _ => PairingMethod::JustWorks,
    }
}
