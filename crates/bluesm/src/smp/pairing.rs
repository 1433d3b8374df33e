//! Pairing Feature Exchange
//!
//! Pure functions used during Phase 1 of pairing: building the local
//! Pairing Request/Response parameters from policy, and resolving the
//! security properties both sides agreed on.

use super::constants::*;
use super::packet::{PairingRequestParams, PairingResponseParams};
use super::types::*;
use super::util::select_pairing_method;
use crate::hci::Role;
use log::debug;

/// Parameters built from local policy, before any peer input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalPairingParameters {
    /// Request parameters, with key distribution filled in from the
    /// initiator's perspective
    pub params: PairingRequestParams,
    /// Keys we are willing to distribute
    pub local_keys: KeyDistGen,
    /// Keys we want the peer to distribute
    pub remote_keys: KeyDistGen,
}

/// Build the local pairing parameters from `config`.
pub fn build_pairing_parameters(config: &BearerConfig) -> LocalPairingParameters {
    // We always request bonding.
    let mut auth_req = AuthReq::BONDING;
    auth_req.set(AuthReq::SC, config.sc_supported);
    auth_req.set(AuthReq::MITM, config.mitm_required);

    // We always request identity information from the remote.
    // TODO: distribute local identity information once local RPAs are supported.
    let local_keys = KeyDistGen::empty();
    let mut remote_keys = KeyDistGen::ID_KEY;

    // The slave is required to distribute its encryption information, so
    // request it when we are the master (Vol 3, Part H, 2.4.2.3).
    if config.role == Role::Master {
        remote_keys |= KeyDistGen::ENC_KEY;
    }

    let oob_data_flag = if config.oob_available {
        OobDataFlag::Present
    } else {
        OobDataFlag::NotPresent
    };

    LocalPairingParameters {
        params: PairingRequestParams {
            io_capability: config.io_capability,
            oob_data_flag,
            auth_req,
            max_encryption_key_size: SMP_MAX_ENCRYPTION_KEY_SIZE,
            initiator_key_dist_gen: local_keys,
            responder_key_dist_gen: remote_keys,
        },
        local_keys,
        remote_keys,
    }
}

/// Resolve the features of a pairing procedure from the exchanged
/// Pairing Request (`preq`) and Pairing Response (`pres`).
///
/// Returns the reason code to send in "Pairing Failed" if the features
/// cannot be satisfied.
pub fn resolve_features(
    local_initiator: bool,
    preq: &PairingRequestParams,
    pres: &PairingResponseParams,
) -> Result<PairingFeatures, ErrorCode> {
    // Select the smaller of the initiator and responder max. encryption key
    // size values (Vol 3, Part H, 2.3.4).
    let enc_key_size = preq
        .max_encryption_key_size
        .min(pres.max_encryption_key_size);
    if enc_key_size < SMP_MIN_ENCRYPTION_KEY_SIZE {
        debug!("sm: Encryption key size too small! ({})", enc_key_size);
        return Err(ErrorCode::EncryptionKeySize);
    }

    let sc = preq.auth_req.contains(AuthReq::SC) && pres.auth_req.contains(AuthReq::SC);
    let mitm = preq.auth_req.contains(AuthReq::MITM) || pres.auth_req.contains(AuthReq::MITM);
    let init_oob = preq.oob_data_flag == OobDataFlag::Present;
    let rsp_oob = pres.oob_data_flag == OobDataFlag::Present;

    let (local_ioc, peer_ioc) = if local_initiator {
        (preq.io_capability, pres.io_capability)
    } else {
        (pres.io_capability, preq.io_capability)
    };

    let method = select_pairing_method(
        sc,
        init_oob,
        rsp_oob,
        mitm,
        local_ioc,
        peer_ioc,
        local_initiator,
    );

    // If MITM protection is required but the pairing method cannot provide
    // it, reject the pairing.
    if mitm && !method.is_authenticated() {
        debug!("sm: MITM required but {} selected", method);
        return Err(ErrorCode::AuthenticationRequirements);
    }

    // The Pairing Response determines the keys that will be distributed.
    // Which of them are ours depends on who sent the Pairing Request.
    let (local_keys, remote_keys) = if local_initiator {
        (pres.initiator_key_dist_gen, pres.responder_key_dist_gen)
    } else {
        (pres.responder_key_dist_gen, pres.initiator_key_dist_gen)
    };

    Ok(PairingFeatures::new(
        local_initiator,
        sc,
        method,
        enc_key_size,
        local_keys,
        remote_keys,
    ))
}
