//! Routing engine boundary for switchmesh nodes.
//!
//! [`MeshControl`] sits between the radio transport and the rest of the
//! firmware:
//!
//! - inbound frames go through [`MeshControl::on_receive`], which validates,
//!   filters by address and dispatches to the event bus or a handler;
//! - outbound reports are framed by the composer methods and leave through
//!   the single [`MeshControl::send`] choke point;
//! - [`MeshEventBridge`] connects producers on the [`EventDispatcher`] to the
//!   composer.
//!
//! The engine is synchronous and keeps no mutable state of its own; the
//! local address is loaded from [`Settings`] once, at construction.

pub mod bridge;
pub mod control;
pub mod error;
pub mod events;
pub mod settings;
pub mod transport;

pub use bridge::MeshEventBridge;
#[cfg(feature = "hub")]
pub use control::HubReportHandler;
pub use control::{BeaconHandler, CommandHandler, CommandKind, DropReason, InboundOutcome, MeshControl};
pub use error::{ConfigError, SendError};
pub use events::{Event, EventDispatcher, EventListener, EventType};
pub use settings::{
    ConfigKey, ConfigValue, ConfiguredIdentity, MemorySettings, NodeSection, NodeSettings, Settings,
};
pub use transport::{MeshTransport, TransportError};

pub use switchmesh_wire as wire;
