//! # switchmesh-wire
//!
//! Wire format for the switchmesh smart-switch mesh.
//!
//! Every frame carried on a mesh channel starts with a fixed-size header
//! followed by a payload whose shape is selected by the message type:
//!
//! ```text
//! [source:A][target:A][type:2][payload:variable]
//!  A = 6 bytes (physical address) or 1 byte (logical node id)
//! ```
//!
//! Frames are never longer than [`MAX_MESH_MESSAGE_LENGTH`]. Inbound frames
//! must pass [`validate`] before anything reads typed fields out of them;
//! [`MeshMessage::decode`] enforces that ordering.
//!
//! ## Example
//!
//! ```rust
//! use switchmesh_wire::{EventMessage, MeshMessage, MeshPayload, MessageType, NodeId};
//!
//! let msg = MeshMessage::new(
//!     NodeId::new(3),
//!     NodeId::BROADCAST,
//!     MeshPayload::Event(EventMessage::new(0x0102)),
//! );
//! let encoded = msg.encode().unwrap();
//! let decoded = MeshMessage::<NodeId>::decode(encoded.as_slice()).unwrap();
//! assert_eq!(decoded.header.message_type, MessageType::Event);
//! ```
//!
//! ## Addressing
//!
//! Two addressing schemes implement [`MeshAddress`]: [`PhysicalAddress`]
//! (6-byte link-layer address) and [`NodeId`] (small logical identifier).
//! An engine is instantiated for exactly one of them.

pub mod address;
pub mod buffer;
pub mod error;
pub mod message;
pub mod payload;
pub mod validate;
pub mod wire;

pub use address::{Addressing, AddressingScheme, MeshAddress, NodeId, PhysicalAddress};
pub use buffer::{InputBuffer, MeshBuffer, StaticBuffer};
pub use error::{ValidationError, WireError};
pub use message::{HubMessage, MeshMessage, MeshPayload};
#[cfg(feature = "hub")]
pub use payload::{PowerSamplesPayload, ScanEntry, ScanMessage, ServiceDataPayload};
pub use payload::{BeaconMessage, CommandMessage, EventMessage};
pub use validate::{peek_message_type, validate, validate_frame};
pub use wire::{header_size, message_size, size_rule, MeshHeader, MessageType, SizeRule};

/// Largest frame the mesh transport carries, header included.
pub const MAX_MESH_MESSAGE_LENGTH: usize = 90;

/// Control and config payloads start with `[command_type:1][reserved:1][length:2]`.
pub const COMMAND_HEADER_SIZE: usize = 4;

/// Scan results carried by a single scan message; extra entries are dropped.
pub const MAX_SCAN_ENTRIES: usize = 8;

/// Opaque power-sample block produced by the sampling subsystem.
pub const POWER_SAMPLES_PAYLOAD_SIZE: usize = 72;

/// Opaque service-data block produced by the advertising subsystem.
pub const SERVICE_DATA_PAYLOAD_SIZE: usize = 16;

/// Channel carrying node-to-hub reports.
pub const HUB_CHANNEL: u8 = 1;

/// Channel carrying node-to-node data messages.
pub const DATA_CHANNEL: u8 = 2;
