/// Example running the SMP feature exchange between two in-process bearers
///
/// A master and a slave bearer are connected through a loopback channel.
/// All PDUs and listener events go through one queue that the main loop
/// drains, so every step runs in order from one place.
///
/// Run with `RUST_LOG=trace` to see every PDU.
use bluesm::l2cap::constants::{L2CAP_LE_SMP_CID, SMP_LE_MTU};
use bluesm::l2cap::{ChannelId, ClosedCallback, L2capResult, RxCallback};
use bluesm::smp::UInt128;
use bluesm::*;
use parking_lot::Mutex;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Weak};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Master,
    Slave,
}

impl Side {
    fn peer(self) -> Side {
        match self {
            Side::Master => Side::Slave,
            Side::Slave => Side::Master,
        }
    }
}

enum Work {
    Deliver(Side, Vec<u8>),
    FeatureExchange(Side, PairingFeatures),
    Confirm(Side, UInt128),
    Random(Side, UInt128),
    Failed(Side, Status),
    LinkError,
}

/// One end of an in-process link
struct LoopbackChannel {
    side: Side,
    queue: Mutex<Sender<Work>>,
    rx_callback: Mutex<Option<RxCallback>>,
}

impl LoopbackChannel {
    fn new(side: Side, queue: Sender<Work>) -> Arc<Self> {
        Arc::new(Self {
            side,
            queue: Mutex::new(queue),
            rx_callback: Mutex::new(None),
        })
    }

    fn deliver(&self, sdu: &[u8]) {
        if let Some(callback) = self.rx_callback.lock().as_mut() {
            callback(sdu);
        }
    }
}

impl Channel for LoopbackChannel {
    fn id(&self) -> ChannelId {
        L2CAP_LE_SMP_CID
    }

    fn link_type(&self) -> LinkType {
        LinkType::Le
    }

    fn activate(&self, rx_callback: RxCallback, _closed_callback: ClosedCallback) -> L2capResult<()> {
        let mut slot = self.rx_callback.lock();
        if slot.is_some() {
            return Err(L2capError::AlreadyActivated);
        }
        *slot = Some(rx_callback);
        Ok(())
    }

    fn send(&self, sdu: Vec<u8>) -> L2capResult<()> {
        if sdu.len() > SMP_LE_MTU {
            return Err(L2capError::MtuExceeded(sdu.len()));
        }
        self.queue
            .lock()
            .send(Work::Deliver(self.side.peer(), sdu))
            .map_err(|_| L2capError::ChannelClosed)
    }

    fn signal_link_error(&self) {
        let _ = self.queue.lock().send(Work::LinkError);
    }
}

/// Forwards listener events to the main loop
struct QueueListener {
    side: Side,
    queue: Mutex<Sender<Work>>,
}

impl QueueListener {
    fn post(&self, work: Work) {
        let _ = self.queue.lock().send(work);
    }
}

impl Listener for QueueListener {
    fn on_feature_exchange(&self, features: &PairingFeatures, preq: &[u8], pres: &[u8]) {
        println!(
            "[{:?}] preq: {}  pres: {}",
            self.side,
            hex::encode(preq),
            hex::encode(pres)
        );
        self.post(Work::FeatureExchange(self.side, *features));
    }

    fn on_pairing_confirm(&self, confirm: UInt128) {
        self.post(Work::Confirm(self.side, confirm));
    }

    fn on_pairing_random(&self, random: UInt128) {
        self.post(Work::Random(self.side, random));
    }

    fn on_long_term_key(&self, ltk: UInt128) {
        println!("[{:?}] LTK: {}", self.side, hex::encode(ltk));
    }

    fn on_master_identification(&self, ediv: u16, rand: u64) {
        println!("[{:?}] EDIV: {:#06x}, Rand: {:#018x}", self.side, ediv, rand);
    }

    fn on_identity_resolving_key(&self, irk: UInt128) {
        println!("[{:?}] IRK: {}", self.side, hex::encode(irk));
    }

    fn on_identity_address(&self, address: DeviceAddress) {
        println!("[{:?}] Identity address: {}", self.side, address);
    }

    fn on_pairing_failed(&self, status: Status) {
        self.post(Work::Failed(self.side, status));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("SMP Loopback Pairing Example");
    println!("----------------------------");

    let (tx, rx) = mpsc::channel();
    let timer: Arc<dyn TimerService> = Arc::new(ThreadTimer::new());

    let master_chan = LoopbackChannel::new(Side::Master, tx.clone());
    let slave_chan = LoopbackChannel::new(Side::Slave, tx.clone());

    let master_listener = Arc::new(QueueListener {
        side: Side::Master,
        queue: Mutex::new(tx.clone()),
    });
    let slave_listener = Arc::new(QueueListener {
        side: Side::Slave,
        queue: Mutex::new(tx),
    });

    let mut master_config = BearerConfig::new(Role::Master);
    master_config.io_capability = IoCapability::KeyboardDisplay;
    master_config.sc_supported = true;
    master_config.mitm_required = true;

    let mut slave_config = BearerConfig::new(Role::Slave);
    slave_config.io_capability = IoCapability::DisplayYesNo;
    slave_config.sc_supported = true;

    let weak_master_listener = Arc::downgrade(&master_listener) as Weak<dyn Listener>;
    let weak_slave_listener = Arc::downgrade(&slave_listener) as Weak<dyn Listener>;
    let master = Bearer::new(
        master_chan.clone(),
        master_config,
        weak_master_listener,
        timer.clone(),
    )?;
    let slave = Bearer::new(slave_chan.clone(), slave_config, weak_slave_listener, timer)?;

    let bearer_for = |side: Side| match side {
        Side::Master => &master,
        Side::Slave => &slave,
    };

    // Stand-ins for the values the pairing crypto would compute
    let confirm_value: UInt128 = [0x5A; 16];
    let random_value: UInt128 = [0xA5; 16];

    master.initiate_feature_exchange()?;

    let mut result = None;
    while result.is_none() {
        let work = rx.recv_timeout(Duration::from_secs(35))?;
        match work {
            Work::Deliver(Side::Master, sdu) => master_chan.deliver(&sdu),
            Work::Deliver(Side::Slave, sdu) => slave_chan.deliver(&sdu),
            Work::FeatureExchange(side, features) => {
                println!(
                    "[{:?}] Features: method={}, secure_connections={}, key_size={}",
                    side, features.method, features.secure_connections, features.encryption_key_size
                );
                // The initiator sends the first confirm value.
                if features.initiator {
                    bearer_for(side).send_confirm_value(&confirm_value)?;
                }
            }
            Work::Confirm(side, confirm) => {
                println!("[{:?}] Peer confirm: {}", side, hex::encode(confirm));
                // The responder answers with its own confirm, the initiator
                // then reveals its random value.
                match side {
                    Side::Slave => slave.send_confirm_value(&confirm_value)?,
                    Side::Master => master.send_random_value(&random_value)?,
                }
            }
            Work::Random(side, random) => {
                println!("[{:?}] Peer random: {}", side, hex::encode(random));
                match side {
                    Side::Slave => slave.send_random_value(&random_value)?,
                    Side::Master => {
                        master.complete_pairing()?;
                        slave.complete_pairing()?;
                        result = Some(Ok(()));
                    }
                }
            }
            Work::Failed(side, status) => {
                result = Some(Err(format!("[{:?}] Pairing failed: {}", side, status)));
            }
            Work::LinkError => {
                result = Some(Err("Link error".to_string()));
            }
        }
    }

    match result {
        Some(Ok(())) => {
            println!("Pairing complete");
            println!(
                "Master phase: {:?}, slave phase: {:?}",
                master.phase(),
                slave.phase()
            );
            Ok(())
        }
        Some(Err(e)) => Err(e.into()),
        None => Ok(()),
    }
}
