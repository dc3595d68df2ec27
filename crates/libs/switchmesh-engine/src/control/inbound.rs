use std::fmt;

use switchmesh_wire::{
    validate_frame, InputBuffer, MeshAddress, MeshHeader, MeshMessage, MeshPayload, MessageType,
    ValidationError, WireError,
};

use super::{CommandKind, MeshControl};
use crate::events::EventType;

/// What happened to one received frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    Delivered(MessageType),
    Dropped(DropReason),
}

impl InboundOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Length or type check failed; nothing was decoded.
    Invalid(ValidationError),
    /// Unicast to some other node.
    NotForLocalNode,
    /// Passed length validation but the payload is inconsistent.
    Malformed(WireError),
    /// No handler installed for this type on this node.
    Unhandled(MessageType),
    UnknownEvent(u16),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "invalid frame: {err}"),
            Self::NotForLocalNode => f.write_str("not for local node"),
            Self::Malformed(err) => write!(f, "malformed payload: {err}"),
            Self::Unhandled(message_type) => write!(f, "no handler for {message_type}"),
            Self::UnknownEvent(code) => write!(f, "unknown event 0x{code:04x}"),
        }
    }
}

impl<A: MeshAddress> MeshControl<A> {
    /// Routes one frame received on `channel`.
    ///
    /// Never fails: bad input is dropped and reported in the outcome.
    pub fn on_receive(&self, channel: u8, raw: &[u8]) -> InboundOutcome {
        match self.route(channel, raw) {
            Ok(message_type) => InboundOutcome::Delivered(message_type),
            Err(DropReason::NotForLocalNode) => {
                log::trace!("mesh({}): drop rx({}) for other node", self.local_address(), channel);
                InboundOutcome::Dropped(DropReason::NotForLocalNode)
            }
            Err(reason) => {
                log::debug!(
                    "mesh({}): drop rx({}) {} bytes: {}",
                    self.local_address(),
                    channel,
                    raw.len(),
                    reason
                );
                InboundOutcome::Dropped(reason)
            }
        }
    }

    fn route(&self, channel: u8, raw: &[u8]) -> Result<MessageType, DropReason> {
        validate_frame::<A>(raw).map_err(DropReason::Invalid)?;

        let header = MeshHeader::<A>::read(&mut InputBuffer::new(raw)).map_err(DropReason::Malformed)?;
        if !self.addressing.is_for_local_node(&header) {
            return Err(DropReason::NotForLocalNode);
        }

        let message = MeshMessage::<A>::decode(raw).map_err(DropReason::Malformed)?;
        log::trace!("mesh({}): << rx({}) {}", self.local_address(), channel, message.header);

        self.dispatch(channel, &message)?;
        Ok(message.header.message_type)
    }

    fn dispatch(&self, channel: u8, message: &MeshMessage<'_, A>) -> Result<(), DropReason> {
        let unhandled = || DropReason::Unhandled(message.header.message_type);

        match &message.payload {
            MeshPayload::Event(event) => {
                let kind = EventType::from_code(event.event).ok_or(DropReason::UnknownEvent(event.event))?;
                self.events.dispatch_empty(kind);
            }
            MeshPayload::Beacon(beacon) => {
                self.beacons.as_ref().ok_or_else(unhandled)?.handle_beacon(channel, beacon);
            }
            MeshPayload::Control(command) => {
                let handler = self.commands.as_ref().ok_or_else(unhandled)?;
                handler.handle_command(channel, CommandKind::Control, command);
            }
            MeshPayload::Config(command) => {
                let handler = self.commands.as_ref().ok_or_else(unhandled)?;
                handler.handle_command(channel, CommandKind::Config, command);
            }
            #[cfg(feature = "hub")]
            MeshPayload::Scan(_) | MeshPayload::PowerSamples(_) | MeshPayload::ServiceData(_) => {
                self.hub_reports.as_ref().ok_or_else(unhandled)?.handle_report(channel, message);
            }
        }
        Ok(())
    }
}
