#[cfg(feature = "hub")]
use switchmesh_wire::{
    MeshMessage, MeshPayload, PowerSamplesPayload, ScanEntry, ScanMessage, ServiceDataPayload,
    MAX_SCAN_ENTRIES,
};
use switchmesh_wire::{
    validate_frame, HubMessage, MeshAddress, MessageType, HUB_CHANNEL, MAX_MESH_MESSAGE_LENGTH,
};

use super::MeshControl;
use crate::error::SendError;

impl<A: MeshAddress> MeshControl<A> {
    /// Hands one frame to the transport. Every outbound path ends here.
    ///
    /// Frames longer than [`MAX_MESH_MESSAGE_LENGTH`] are rejected before
    /// reaching the transport. Failures are returned, never retried.
    pub fn send(&self, channel: u8, data: &[u8]) -> Result<(), SendError> {
        if data.len() > MAX_MESH_MESSAGE_LENGTH {
            return Err(SendError::Oversized { len: data.len(), max: MAX_MESH_MESSAGE_LENGTH });
        }

        self.transport.send(channel, data).map_err(|err| {
            log::warn!("mesh({}): tx({}) {} bytes failed: {}", self.local_address(), channel, data.len(), err);
            SendError::from(err)
        })
    }

    /// Returns a zeroed hub report with the local address as source, the
    /// broadcast address as target and `message_type` stamped.
    pub fn create_hub_message(&self, message_type: MessageType) -> HubMessage<A> {
        HubMessage::new(self.local_address(), message_type)
    }

    /// Sends a hub report on [`HUB_CHANNEL`]. The frame is validated first;
    /// a report its receivers would drop is refused and never reaches the
    /// transport.
    pub fn send_hub_message(&self, message: &HubMessage<A>) -> Result<(), SendError> {
        let frame = message.encode()?;
        if let Err(err) = validate_frame::<A>(frame.as_slice()) {
            log::warn!("mesh({}): refusing hub message {}: {}", self.local_address(), message.header(), err);
            return Err(SendError::Invalid(err));
        }
        log::debug!("mesh({}): >> tx({}) {}", self.local_address(), HUB_CHANNEL, message.header());
        self.send(HUB_CHANNEL, frame.as_slice())
    }

    /// Sends up to [`MAX_SCAN_ENTRIES`] entries in one scan message; the rest
    /// are dropped.
    #[cfg(feature = "hub")]
    pub fn send_scan_message(&self, entries: &[ScanEntry]) -> Result<(), SendError> {
        if entries.len() > MAX_SCAN_ENTRIES {
            log::debug!(
                "mesh({}): scan list of {} truncated to {}",
                self.local_address(),
                entries.len(),
                MAX_SCAN_ENTRIES
            );
        }
        self.send_report(MeshPayload::Scan(ScanMessage::from_entries(entries)))
    }

    #[cfg(feature = "hub")]
    pub fn send_power_samples_message(&self, samples: &PowerSamplesPayload) -> Result<(), SendError> {
        self.send_report(MeshPayload::PowerSamples(*samples))
    }

    #[cfg(feature = "hub")]
    pub fn send_service_data_message(&self, data: &ServiceDataPayload) -> Result<(), SendError> {
        self.send_report(MeshPayload::ServiceData(*data))
    }

    #[cfg(feature = "hub")]
    fn send_report(&self, payload: MeshPayload<'_>) -> Result<(), SendError> {
        let message = MeshMessage::new(self.local_address(), A::BROADCAST, payload);
        let frame = message.encode()?;
        log::debug!("mesh({}): >> tx({}) {}", self.local_address(), HUB_CHANNEL, message.header);
        self.send(HUB_CHANNEL, frame.as_slice())
    }
}
