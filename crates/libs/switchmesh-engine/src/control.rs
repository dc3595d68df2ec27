mod inbound;
mod outbound;

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "hub")]
use switchmesh_wire::MeshMessage;
use switchmesh_wire::{header_size, Addressing, BeaconMessage, CommandMessage, MeshAddress};

use crate::error::ConfigError;
use crate::events::EventDispatcher;
use crate::settings::{ConfiguredIdentity, Settings};
use crate::transport::MeshTransport;

pub use inbound::{DropReason, InboundOutcome};

/// Receives beacons addressed to this node (presence detection).
pub trait BeaconHandler: Send + Sync {
    fn handle_beacon(&self, channel: u8, beacon: &BeaconMessage);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Control,
    Config,
}

/// Receives control and config commands. `command.params` is already
/// bounded by the command's declared length.
pub trait CommandHandler: Send + Sync {
    fn handle_command(&self, channel: u8, kind: CommandKind, command: &CommandMessage<'_>);
}

/// Receives scan, power-sample and service-data reports on a hub node.
#[cfg(feature = "hub")]
pub trait HubReportHandler<A: MeshAddress>: Send + Sync {
    fn handle_report(&self, channel: u8, message: &MeshMessage<'_, A>);
}

/// Mesh routing engine for one node.
///
/// Holds the node's address (fixed at construction), the outbound transport
/// and the event bus inbound events are pushed onto. Inbound routing lives in
/// [`on_receive`](Self::on_receive); outbound framing in the `send_*`
/// methods.
pub struct MeshControl<A: MeshAddress> {
    addressing: Addressing<A>,
    transport: Arc<dyn MeshTransport>,
    events: Arc<EventDispatcher>,
    beacons: Option<Arc<dyn BeaconHandler>>,
    commands: Option<Arc<dyn CommandHandler>>,
    #[cfg(feature = "hub")]
    hub_reports: Option<Arc<dyn HubReportHandler<A>>>,
}

impl<A: ConfiguredIdentity> MeshControl<A> {
    /// Loads the local address from `settings`. Fails when it is missing,
    /// of the wrong kind or the broadcast address.
    pub fn new(
        settings: &dyn Settings,
        transport: Arc<dyn MeshTransport>,
        events: Arc<EventDispatcher>,
    ) -> Result<Self, ConfigError> {
        let local = A::from_settings(settings)?;
        log::info!(
            "mesh({}): init with {} addressing, {} byte header",
            local,
            A::SCHEME,
            header_size::<A>()
        );

        Ok(Self {
            addressing: Addressing::new(local),
            transport,
            events,
            beacons: None,
            commands: None,
            #[cfg(feature = "hub")]
            hub_reports: None,
        })
    }
}

impl<A: MeshAddress> MeshControl<A> {
    pub fn with_beacon_handler(mut self, handler: Arc<dyn BeaconHandler>) -> Self {
        self.beacons = Some(handler);
        self
    }

    pub fn with_command_handler(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.commands = Some(handler);
        self
    }

    #[cfg(feature = "hub")]
    pub fn with_hub_report_handler(mut self, handler: Arc<dyn HubReportHandler<A>>) -> Self {
        self.hub_reports = Some(handler);
        self
    }

    pub fn local_address(&self) -> A {
        self.addressing.local()
    }

    pub fn addressing(&self) -> &Addressing<A> {
        &self.addressing
    }

    pub fn events(&self) -> &Arc<EventDispatcher> {
        &self.events
    }
}

impl<A: MeshAddress> fmt::Debug for MeshControl<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshControl")
            .field("local", &self.addressing.local())
            .field("scheme", &A::SCHEME)
            .field("beacons", &self.beacons.is_some())
            .field("commands", &self.commands.is_some())
            .finish_non_exhaustive()
    }
}
