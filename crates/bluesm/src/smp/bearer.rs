//! SMP bearer
//!
//! A `Bearer` owns the SMP fixed channel of one logical link. It runs the
//! Pairing Feature Exchange, carries the confirm/random and key
//! distribution PDUs of the later phases, and drives the Security Manager
//! Timer. Everything it learns from the peer is reported to a `Listener`.
//!
//! The bearer is shared as `Arc<Bearer>` and keeps its state behind a
//! mutex. Listener methods run after that lock has been released, so a
//! listener may call straight back into the bearer. The channel and timer
//! callbacks only hold a `Weak` reference and do nothing once the bearer
//! has been dropped.

use super::packet::*;
use super::pairing::{build_pairing_parameters, resolve_features};
use super::timer::{TimerHandle, TimerService};
use super::types::*;
use crate::error::HostError;
use crate::gap::{DeviceAddress, DeviceAddressType};
use crate::hci::{LinkKey, LinkType, Role};
use crate::l2cap::constants::*;
use crate::l2cap::Channel;
use log::{debug, error, info, trace, warn};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Receives the results of SMP transactions.
///
/// Methods are called with the bearer unlocked, in the order the events
/// happened.
pub trait Listener: Send + Sync {
    /// The feature exchange completed. `preq` and `pres` are the raw
    /// Pairing Request and Pairing Response PDUs.
    fn on_feature_exchange(&self, features: &PairingFeatures, preq: &[u8], pres: &[u8]);

    /// The peer sent its confirm value
    fn on_pairing_confirm(&self, confirm: UInt128);

    /// The peer sent its random value
    fn on_pairing_random(&self, random: UInt128);

    /// The peer distributed its LTK
    fn on_long_term_key(&self, ltk: UInt128);

    /// The peer distributed the EDIV and Rand identifying its LTK
    fn on_master_identification(&self, ediv: u16, rand: u64);

    /// The peer distributed its IRK
    fn on_identity_resolving_key(&self, irk: UInt128);

    /// The peer distributed its identity address
    fn on_identity_address(&self, address: DeviceAddress);

    /// The pairing procedure ended with an error
    fn on_pairing_failed(&self, status: Status);
}

/// Where the bearer is in a pairing procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingPhase {
    /// No procedure in progress
    Idle,
    /// Pairing Request sent or received, features not resolved yet
    FeatureExchangePending,
    /// Features resolved; later phases are in progress
    Established,
}

#[derive(Debug, Clone, Copy)]
struct PairingTimer {
    handle: TimerHandle,
    generation: u64,
}

// Listener events, queued while the state is locked
enum Notification {
    FeatureExchange {
        features: PairingFeatures,
        preq: Vec<u8>,
        pres: Vec<u8>,
    },
    PairingConfirm(UInt128),
    PairingRandom(UInt128),
    LongTermKey(UInt128),
    MasterIdentification { ediv: u16, rand: u64 },
    IdentityResolvingKey(UInt128),
    IdentityAddress(DeviceAddress),
    PairingFailed(Status),
}

impl Notification {
    fn deliver(self, listener: &dyn Listener) {
        match self {
            Notification::FeatureExchange {
                features,
                preq,
                pres,
            } => listener.on_feature_exchange(&features, &preq, &pres),
            Notification::PairingConfirm(confirm) => listener.on_pairing_confirm(confirm),
            Notification::PairingRandom(random) => listener.on_pairing_random(random),
            Notification::LongTermKey(ltk) => listener.on_long_term_key(ltk),
            Notification::MasterIdentification { ediv, rand } => {
                listener.on_master_identification(ediv, rand)
            }
            Notification::IdentityResolvingKey(irk) => listener.on_identity_resolving_key(irk),
            Notification::IdentityAddress(address) => listener.on_identity_address(address),
            Notification::PairingFailed(status) => listener.on_pairing_failed(status),
        }
    }
}

/// SMP bearer for a single logical link
pub struct Bearer {
    state: Mutex<BearerState>,
    listener: Weak<dyn Listener>,
}

struct BearerState {
    chan: Arc<dyn Channel>,
    timer_service: Arc<dyn TimerService>,
    config: BearerConfig,
    mtu: usize,

    feature_exchange_pending: bool,

    // Armed for as long as a pairing procedure is in progress.
    timer: Option<PairingTimer>,
    timer_generation: u64,

    // Raw feature exchange PDUs of the current attempt, needed later as the
    // preq/pres inputs of the confirm value functions.
    pairing_request: Option<Vec<u8>>,
    pairing_response: Option<Vec<u8>>,

    notifications: Vec<Notification>,
    weak_self: Weak<Bearer>,
}

impl Bearer {
    /// Create a bearer and activate `chan`.
    ///
    /// Fails if the channel is not an SMP fixed channel for its link type or
    /// if it cannot be activated.
    pub fn new(
        chan: Arc<dyn Channel>,
        config: BearerConfig,
        listener: Weak<dyn Listener>,
        timer_service: Arc<dyn TimerService>,
    ) -> SmpResult<Arc<Bearer>> {
        let (expected_cid, mtu) = match chan.link_type() {
            LinkType::Le => (L2CAP_LE_SMP_CID, SMP_LE_MTU),
            LinkType::Acl => (L2CAP_SMP_CID, SMP_BREDR_MTU),
        };
        if chan.id() != expected_cid {
            return Err(SmpError::InvalidParameter(format!(
                "Channel {:#06x} is not the SMP channel for this link",
                chan.id()
            )));
        }

        let bearer = Arc::new_cyclic(|weak_self| Bearer {
            state: Mutex::new(BearerState {
                chan: Arc::clone(&chan),
                timer_service,
                config,
                mtu,
                feature_exchange_pending: false,
                timer: None,
                timer_generation: 0,
                pairing_request: None,
                pairing_response: None,
                notifications: Vec::new(),
                weak_self: weak_self.clone(),
            }),
            listener,
        });

        let rx_self = Arc::downgrade(&bearer);
        let closed_self = Arc::downgrade(&bearer);
        chan.activate(
            Box::new(move |sdu: &[u8]| {
                if let Some(bearer) = rx_self.upgrade() {
                    bearer.with_state(|state| state.on_rx_bframe(sdu));
                }
            }),
            Box::new(move || {
                if let Some(bearer) = closed_self.upgrade() {
                    bearer.with_state(|state| state.on_channel_closed());
                }
            }),
        )?;

        debug!(
            "sm: Bearer created (role: {}, mtu: {})",
            config.role, mtu
        );
        Ok(bearer)
    }

    /// Local role on the link
    pub fn role(&self) -> Role {
        self.state.lock().config.role
    }

    /// Link type of the underlying channel
    pub fn link_type(&self) -> LinkType {
        self.state.lock().chan.link_type()
    }

    /// SMP MTU for this link
    pub fn mtu(&self) -> usize {
        self.state.lock().mtu
    }

    /// Current pairing policy
    pub fn config(&self) -> BearerConfig {
        self.state.lock().config
    }

    /// True while a pairing procedure is in progress
    pub fn pairing_started(&self) -> bool {
        self.state.lock().pairing_started()
    }

    /// True between sending/receiving a Pairing Request and resolving features
    pub fn feature_exchange_pending(&self) -> bool {
        self.state.lock().feature_exchange_pending
    }

    pub fn phase(&self) -> PairingPhase {
        self.state.lock().phase()
    }

    /// Raw Pairing Request PDU of the current attempt
    pub fn pairing_request_pdu(&self) -> Option<Vec<u8>> {
        self.state.lock().pairing_request.clone()
    }

    /// Raw Pairing Response PDU of the current attempt
    pub fn pairing_response_pdu(&self) -> Option<Vec<u8>> {
        self.state.lock().pairing_response.clone()
    }

    /// Require MITM protection in subsequent feature exchanges
    pub fn set_mitm_required(&self, value: bool) {
        self.state.lock().config.mitm_required = value;
    }

    /// Advertise OOB data in subsequent feature exchanges
    pub fn set_oob_available(&self, value: bool) {
        self.state.lock().config.oob_available = value;
    }

    /// Start pairing by sending a Pairing Request. Master only.
    pub fn initiate_feature_exchange(&self) -> SmpResult<()> {
        self.with_state(|state| state.initiate_feature_exchange())
    }

    /// Send a Pairing Confirm. LE only.
    pub fn send_confirm_value(&self, confirm: &UInt128) -> SmpResult<()> {
        self.with_state(|state| state.send_pairing_value(Code::PairingConfirm, confirm))
    }

    /// Send a Pairing Random. LE only.
    pub fn send_random_value(&self, random: &UInt128) -> SmpResult<()> {
        self.with_state(|state| state.send_pairing_value(Code::PairingRandom, random))
    }

    /// Distribute the LTK: Encryption Information followed by Master
    /// Identification. LE only.
    pub fn send_encryption_key(&self, link_key: &LinkKey) -> SmpResult<()> {
        self.with_state(|state| state.send_encryption_key(link_key))
    }

    /// End the current procedure successfully and stop the timer
    pub fn complete_pairing(&self) -> SmpResult<()> {
        self.with_state(|state| state.complete_pairing())
    }

    /// Abort the current procedure, telling the peer why. No-op when idle.
    pub fn abort(&self, ecode: ErrorCode) {
        self.with_state(|state| state.abort(ecode))
    }

    // Run `f` on the locked state, then hand whatever it queued to the
    // listener once the lock is released.
    fn with_state<R>(&self, f: impl FnOnce(&mut BearerState) -> R) -> R {
        let (result, notifications) = {
            let mut state = self.state.lock();
            let result = f(&mut state);
            (result, std::mem::take(&mut state.notifications))
        };

        if !notifications.is_empty() {
            match self.listener.upgrade() {
                Some(listener) => {
                    for notification in notifications {
                        notification.deliver(listener.as_ref());
                    }
                }
                None => warn!("sm: Listener dropped; discarding {} event(s)", notifications.len()),
            }
        }

        result
    }
}

impl BearerState {
    fn pairing_started(&self) -> bool {
        self.timer.is_some()
    }

    fn phase(&self) -> PairingPhase {
        if self.feature_exchange_pending {
            PairingPhase::FeatureExchangePending
        } else if self.pairing_started() {
            PairingPhase::Established
        } else {
            PairingPhase::Idle
        }
    }

    fn initiate_feature_exchange(&mut self) -> SmpResult<()> {
        // TODO: allow re-initiating with different parameters while a
        // procedure is in progress.
        if self.pairing_started() || self.feature_exchange_pending {
            debug!("sm: Feature exchange already pending!");
            return Err(SmpError::FeatureExchangePending);
        }

        if self.config.role == Role::Slave {
            debug!("sm: Slave cannot initiate a feature exchange!");
            return Err(SmpError::InvalidRole(Role::Slave));
        }

        let writer = PacketWriter::<PairingRequestParams>::new(Code::PairingRequest)?;
        let local = build_pairing_parameters(&self.config);
        let pdu = writer.finish(&local.params);

        self.start_timer()?;
        self.pairing_request = Some(pdu.clone());
        self.pairing_response = None;
        self.feature_exchange_pending = true;
        self.send(pdu);

        Ok(())
    }

    fn send_pairing_value(&mut self, code: Code, value: &UInt128) -> SmpResult<()> {
        self.check_le_pairing()?;
        let writer = self.new_pdu_or_abort::<UInt128>(code)?;
        self.send(writer.finish(value));
        Ok(())
    }

    fn send_encryption_key(&mut self, link_key: &LinkKey) -> SmpResult<()> {
        self.check_le_pairing()?;

        // Allocate both PDUs before sending either.
        let enc_info = PacketWriter::<UInt128>::new(Code::EncryptionInformation);
        let master_id =
            PacketWriter::<MasterIdentificationParams>::new(Code::MasterIdentification);
        let (enc_info, master_id) = match (enc_info, master_id) {
            (Ok(enc_info), Ok(master_id)) => (enc_info, master_id),
            _ => {
                error!("sm: Out of memory!");
                self.abort(ErrorCode::UnspecifiedReason);
                return Err(SmpError::OutOfMemory);
            }
        };

        self.send(enc_info.finish(link_key.value()));
        self.send(master_id.finish(&MasterIdentificationParams {
            ediv: link_key.ediv(),
            rand: link_key.rand(),
        }));

        Ok(())
    }

    fn complete_pairing(&mut self) -> SmpResult<()> {
        if !self.pairing_started() {
            debug!("sm: Not pairing!");
            return Err(SmpError::NotPairing);
        }

        info!("sm: Pairing complete");
        self.stop_timer();
        self.feature_exchange_pending = false;
        Ok(())
    }

    fn abort(&mut self, ecode: ErrorCode) {
        if !self.pairing_started() {
            debug!("sm: Pairing not started! Nothing to abort.");
            return;
        }

        error!("sm: Abort pairing ({})", ecode);

        self.stop_timer();
        self.send_pairing_failed(ecode);
        self.on_failure(Status::Protocol(ecode));
    }

    fn check_le_pairing(&self) -> SmpResult<()> {
        if !self.pairing_started() {
            debug!("sm: Not pairing!");
            return Err(SmpError::NotPairing);
        }

        if self.chan.link_type() != LinkType::Le {
            debug!("sm: Only allowed on the LE transport");
            return Err(SmpError::UnsupportedLinkType);
        }

        Ok(())
    }

    // The peer expects a reply once a procedure is running, so failing to
    // allocate one ends the procedure.
    fn new_pdu_or_abort<P: Payload>(&mut self, code: Code) -> SmpResult<PacketWriter<P>> {
        PacketWriter::new(code).map_err(|e| {
            error!("sm: Out of memory!");
            self.abort(ErrorCode::UnspecifiedReason);
            e
        })
    }

    fn start_timer(&mut self) -> SmpResult<()> {
        debug_assert!(self.timer.is_none());

        self.timer_generation = self.timer_generation.wrapping_add(1);
        let generation = self.timer_generation;
        let weak_self = self.weak_self.clone();
        let handle = self.timer_service.schedule_once(
            self.config.pairing_timeout,
            Box::new(move || {
                if let Some(bearer) = weak_self.upgrade() {
                    bearer.with_state(|state| state.on_pairing_timeout(generation));
                }
            }),
        );

        match handle {
            Some(handle) => {
                self.timer = Some(PairingTimer { handle, generation });
                Ok(())
            }
            None => {
                error!("sm: Failed to start the pairing timer!");
                Err(SmpError::TimerUnavailable)
            }
        }
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.timer_service.cancel(timer.handle);
        }
    }

    fn on_failure(&mut self, status: Status) {
        error!("sm: Pairing failed: {}", status);

        self.feature_exchange_pending = false;
        self.stop_timer();
        self.notifications.push(Notification::PairingFailed(status));
    }

    fn on_pairing_timeout(&mut self, generation: u64) {
        match self.timer {
            Some(timer) if timer.generation == generation => {}
            _ => {
                trace!("sm: Ignoring stale pairing timer ({})", generation);
                return;
            }
        }

        // The timer has fired; there is nothing left to cancel.
        self.timer = None;

        // Pairing is no longer allowed on this bearer. Disconnect the link.
        error!("sm: Pairing timed out! Disconnecting link.");
        self.chan.signal_link_error();

        self.on_failure(Status::Host(HostError::TimedOut));
    }

    fn on_channel_closed(&mut self) {
        debug!("sm: Channel closed");

        if self.pairing_started() {
            self.on_failure(Status::Host(HostError::LinkDisconnected));
        }
    }

    fn on_rx_bframe(&mut self, sdu: &[u8]) {
        trace!("sm: rx {}", hex::encode(sdu));

        let reader = match PacketReader::new(sdu) {
            Ok(reader) => reader,
            Err(_) => {
                debug!("sm: PDU too short!");
                self.abort(ErrorCode::InvalidParameters);
                return;
            }
        };

        if sdu.len() > self.mtu {
            debug!("sm: PDU exceeds MTU! ({} > {})", sdu.len(), self.mtu);
            self.abort(ErrorCode::InvalidParameters);
            return;
        }

        match Code::from_u8(reader.code()) {
            Some(Code::PairingFailed) => self.on_pairing_failed(&reader),
            Some(Code::PairingRequest) => self.on_pairing_request(&reader),
            Some(Code::PairingResponse) => self.on_pairing_response(&reader),
            Some(Code::PairingConfirm) => {
                if let Some(confirm) = self.pairing_payload::<UInt128>(&reader, "Pairing Confirm", true) {
                    self.notifications.push(Notification::PairingConfirm(confirm));
                }
            }
            Some(Code::PairingRandom) => {
                if let Some(random) = self.pairing_payload::<UInt128>(&reader, "Pairing Random", true) {
                    self.notifications.push(Notification::PairingRandom(random));
                }
            }
            Some(Code::EncryptionInformation) => {
                if let Some(ltk) =
                    self.pairing_payload::<UInt128>(&reader, "Encryption Information", true)
                {
                    self.notifications.push(Notification::LongTermKey(ltk));
                }
            }
            Some(Code::MasterIdentification) => {
                if let Some(params) = self.pairing_payload::<MasterIdentificationParams>(
                    &reader,
                    "Master Identification",
                    true,
                ) {
                    self.notifications.push(Notification::MasterIdentification {
                        ediv: params.ediv,
                        rand: params.rand,
                    });
                }
            }
            Some(Code::IdentityInformation) => {
                if let Some(irk) =
                    self.pairing_payload::<UInt128>(&reader, "Identity Information", false)
                {
                    self.notifications.push(Notification::IdentityResolvingKey(irk));
                }
            }
            Some(Code::IdentityAddressInformation) => {
                if let Some(params) = self.pairing_payload::<IdentityAddressInformationParams>(
                    &reader,
                    "Identity Address Information",
                    false,
                ) {
                    let address_type = match params.address_type {
                        AddressType::StaticRandom => DeviceAddressType::LeRandom,
                        AddressType::Public => DeviceAddressType::LePublic,
                    };
                    let address = DeviceAddress::new(address_type, params.bd_addr);
                    self.notifications.push(Notification::IdentityAddress(address));
                }
            }
            Some(Code::SecurityRequest) => {
                // TODO: start pairing (or re-encrypt) in response when we are the master.
                match reader.payload::<SecurityRequestParams>() {
                    Ok(params) => warn!(
                        "sm: \"Security Request\" not handled (auth_req: {:?})",
                        params.auth_req
                    ),
                    Err(_) => warn!("sm: \"Security Request\" not handled"),
                }
            }
            Some(Code::SigningInformation)
            | Some(Code::PairingPublicKey)
            | Some(Code::PairingDhKeyCheck)
            | Some(Code::PairingKeypressNotification)
            | None => {
                debug!("sm: Unsupported command: {:#04x}", reader.code());
                self.reject(ErrorCode::CommandNotSupported);
            }
        }
    }

    fn on_pairing_failed(&mut self, reader: &PacketReader<'_>) {
        if !self.pairing_started() {
            debug!("sm: Received \"Pairing Failed\" while not pairing!");
            return;
        }

        let status = match reader.payload::<PairingFailedParams>() {
            Ok(params) => match params.error_code() {
                Some(ecode) => Status::Protocol(ecode),
                None => {
                    debug!("sm: Unknown \"Pairing Failed\" reason {:#04x}", params.reason);
                    Status::Protocol(ErrorCode::UnspecifiedReason)
                }
            },
            Err(e) => {
                debug!("sm: Malformed \"Pairing Failed\" payload: {}", e);
                Status::Host(HostError::Failed)
            }
        };

        self.stop_timer();
        self.on_failure(status);
    }

    fn on_pairing_request(&mut self, reader: &PacketReader<'_>) {
        let preq = match reader.payload::<PairingRequestParams>() {
            Ok(preq) => preq,
            Err(e) => {
                debug!("sm: Malformed \"Pairing Request\" payload: {}", e);
                self.reject(ErrorCode::InvalidParameters);
                return;
            }
        };

        // Reject the command if we are the master.
        if self.config.role == Role::Master {
            debug!("sm: Rejecting \"Pairing Request\" from slave");
            self.send_pairing_failed(ErrorCode::CommandNotSupported);
            return;
        }

        if self.feature_exchange_pending {
            debug!("sm: Ignoring \"Pairing Request\" during a feature exchange");
            return;
        }

        let writer = match PacketWriter::<PairingResponseParams>::new(Code::PairingResponse) {
            Ok(writer) => writer,
            Err(_) => {
                error!("sm: Out of memory!");
                self.reject(ErrorCode::UnspecifiedReason);
                return;
            }
        };

        // "Upon reception of the Pairing Request command, the Security Manager
        // Timer shall be reset and started" (Vol 3, Part H, 3.4).
        self.stop_timer();
        if self.start_timer().is_err() {
            self.send_pairing_failed(ErrorCode::UnspecifiedReason);
            self.on_failure(Status::Host(HostError::Failed));
            return;
        }

        self.feature_exchange_pending = true;
        self.pairing_request = Some(reader.data().to_vec());
        self.pairing_response = None;

        // The keys that will be exchanged are the intersection of what the
        // initiator requests and what we support.
        let local = build_pairing_parameters(&self.config);
        let mut pres = local.params;
        pres.initiator_key_dist_gen = local.remote_keys & preq.initiator_key_dist_gen;
        pres.responder_key_dist_gen = local.local_keys & preq.responder_key_dist_gen;

        let result = resolve_features(false, &preq, &pres);
        self.feature_exchange_pending = false;
        let features = match result {
            Ok(features) => features,
            Err(ecode) => {
                debug!("sm: Rejecting pairing features");
                self.abort(ecode);
                return;
            }
        };

        let pdu = writer.finish(&pres);
        self.pairing_response = Some(pdu.clone());

        // Send the response before notifying the listener, which may start
        // other SMP transactions.
        self.send(pdu.clone());

        self.notifications.push(Notification::FeatureExchange {
            features,
            preq: reader.data().to_vec(),
            pres: pdu,
        });
    }

    fn on_pairing_response(&mut self, reader: &PacketReader<'_>) {
        let pres = match reader.payload::<PairingResponseParams>() {
            Ok(pres) => pres,
            Err(e) => {
                debug!("sm: Malformed \"Pairing Response\" payload: {}", e);
                self.abort(ErrorCode::InvalidParameters);
                return;
            }
        };

        // Reject the command if we are the slave.
        if self.config.role == Role::Slave {
            debug!("sm: Rejecting \"Pairing Response\" from master");
            self.abort(ErrorCode::CommandNotSupported);
            return;
        }

        if !self.feature_exchange_pending {
            debug!("sm: Ignoring unexpected \"Pairing Response\" packet");
            return;
        }

        let preq = match self.cached_pairing_request() {
            Some(preq) => preq,
            None => {
                error!("sm: No cached \"Pairing Request\"");
                self.abort(ErrorCode::UnspecifiedReason);
                return;
            }
        };

        let result = resolve_features(true, &preq, &pres);
        self.feature_exchange_pending = false;
        let features = match result {
            Ok(features) => features,
            Err(ecode) => {
                debug!("sm: Rejecting pairing features");
                self.abort(ecode);
                return;
            }
        };

        self.pairing_response = Some(reader.data().to_vec());

        if let Some(preq_pdu) = &self.pairing_request {
            self.notifications.push(Notification::FeatureExchange {
                features,
                preq: preq_pdu.clone(),
                pres: reader.data().to_vec(),
            });
        }
    }

    fn cached_pairing_request(&self) -> Option<PairingRequestParams> {
        let pdu = self.pairing_request.as_deref()?;
        PacketReader::new(pdu).ok()?.payload().ok()
    }

    // Shared checks for the PDUs that are only valid while pairing. Returns
    // the decoded payload, or None if the PDU was dropped or the procedure
    // aborted.
    fn pairing_payload<P: Payload>(
        &mut self,
        reader: &PacketReader<'_>,
        name: &str,
        le_only: bool,
    ) -> Option<P> {
        // Ignore the command if not pairing.
        if !self.pairing_started() {
            debug!("sm: Dropped unexpected \"{}\"", name);
            return None;
        }

        if le_only && self.chan.link_type() != LinkType::Le {
            debug!("sm: \"{}\" over BR/EDR not supported!", name);
            self.abort(ErrorCode::CommandNotSupported);
            return None;
        }

        match reader.payload::<P>() {
            Ok(payload) => Some(payload),
            Err(e) => {
                debug!("sm: Malformed \"{}\" payload: {}", name, e);
                self.abort(ErrorCode::InvalidParameters);
                None
            }
        }
    }

    // Abort if a procedure is running, otherwise only tell the peer.
    fn reject(&mut self, ecode: ErrorCode) {
        if self.pairing_started() {
            self.abort(ecode);
        } else {
            self.send_pairing_failed(ecode);
        }
    }

    fn send_pairing_failed(&self, ecode: ErrorCode) {
        match PacketWriter::<PairingFailedParams>::new(Code::PairingFailed) {
            Ok(writer) => self.send(writer.finish(&PairingFailedParams::new(ecode))),
            Err(_) => error!("sm: Out of memory! Dropping \"Pairing Failed\""),
        }
    }

    fn send(&self, pdu: Vec<u8>) {
        trace!("sm: tx {}", hex::encode(&pdu));
        if let Err(e) = self.chan.send(pdu) {
            warn!("sm: Failed to send PDU: {}", e);
        }
    }
}

impl Drop for BearerState {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
