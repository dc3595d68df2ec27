#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[cfg(feature = "hub")]
use switchmesh_engine::HubReportHandler;
use switchmesh_engine::wire::{
    BeaconMessage, CommandMessage, MeshAddress, MeshMessage, MeshPayload, NodeId,
    PhysicalAddress,
};
use switchmesh_engine::{
    BeaconHandler, CommandHandler, CommandKind, ConfigKey, ConfigValue, ConfiguredIdentity,
    Event, EventDispatcher, EventListener, EventType, MemorySettings, MeshControl, MeshTransport,
    Settings, TransportError,
};

#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<(u8, Vec<u8>)>>,
    busy: AtomicBool,
}

impl MockTransport {
    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(u8, Vec<u8>)> {
        self.sent.lock().expect("sent lock").clone()
    }
}

impl MeshTransport for MockTransport {
    fn send(&self, channel: u8, data: &[u8]) -> Result<(), TransportError> {
        if self.busy.load(Ordering::SeqCst) {
            return Err(TransportError::Busy);
        }
        self.sent.lock().expect("sent lock").push((channel, data.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
pub struct BeaconLog {
    pub seen: Mutex<Vec<(u8, BeaconMessage)>>,
}

impl BeaconHandler for BeaconLog {
    fn handle_beacon(&self, channel: u8, beacon: &BeaconMessage) {
        self.seen.lock().expect("beacon lock").push((channel, *beacon));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenCommand {
    pub channel: u8,
    pub kind: CommandKind,
    pub command_type: u8,
    pub params: Vec<u8>,
}

#[derive(Default)]
pub struct CommandLog {
    pub seen: Mutex<Vec<SeenCommand>>,
}

impl CommandHandler for CommandLog {
    fn handle_command(&self, channel: u8, kind: CommandKind, command: &CommandMessage<'_>) {
        self.seen.lock().expect("command lock").push(SeenCommand {
            channel,
            kind,
            command_type: command.command_type,
            params: command.params.to_vec(),
        });
    }
}

/// Hub side: keeps the re-encoded frame of every report.
#[derive(Default)]
pub struct ReportLog {
    pub seen: Mutex<Vec<(u8, Vec<u8>)>>,
}

#[cfg(feature = "hub")]
impl<A: MeshAddress> HubReportHandler<A> for ReportLog {
    fn handle_report(&self, channel: u8, message: &MeshMessage<'_, A>) {
        let frame = message.encode().expect("re-encode report");
        self.seen.lock().expect("report lock").push((channel, frame.to_vec()));
    }
}

#[derive(Default)]
pub struct EventLog {
    pub seen: Mutex<Vec<EventType>>,
}

impl EventListener for EventLog {
    fn handle_event(&self, event: &Event<'_>) {
        self.seen.lock().expect("event lock").push(event.kind);
    }
}

pub struct Node<A: MeshAddress> {
    pub control: Arc<MeshControl<A>>,
    pub transport: Arc<MockTransport>,
    pub events: Arc<EventDispatcher>,
    pub beacons: Arc<BeaconLog>,
    pub commands: Arc<CommandLog>,
    pub reports: Arc<ReportLog>,
    pub event_log: Arc<EventLog>,
}

pub fn logical_node(id: u8) -> Node<NodeId> {
    build(&MemorySettings::new().with(ConfigKey::NodeId, ConfigValue::U8(id)))
}

pub fn physical_node(address: &str) -> Node<PhysicalAddress> {
    let address: PhysicalAddress = address.parse().expect("address");
    build(&MemorySettings::new().with(ConfigKey::NodeAddress, ConfigValue::Address(address.to_bytes())))
}

fn build<A: ConfiguredIdentity>(settings: &dyn Settings) -> Node<A> {
    let transport = Arc::new(MockTransport::default());
    let events = Arc::new(EventDispatcher::new());
    let beacons = Arc::new(BeaconLog::default());
    let commands = Arc::new(CommandLog::default());
    let reports = Arc::new(ReportLog::default());
    let event_log = Arc::new(EventLog::default());
    events.add_listener(event_log.clone());

    let control = MeshControl::<A>::new(settings, transport.clone(), events.clone())
        .expect("engine")
        .with_beacon_handler(beacons.clone())
        .with_command_handler(commands.clone());
    #[cfg(feature = "hub")]
    let control = control.with_hub_report_handler(reports.clone());

    Node { control: Arc::new(control), transport, events, beacons, commands, reports, event_log }
}

pub fn frame<A: MeshAddress>(source: A, target: A, payload: MeshPayload<'_>) -> Vec<u8> {
    MeshMessage::new(source, target, payload).encode().expect("encode").to_vec()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
