//! Whole messages: typed decode and encode, plus outbound hub reports.

use crate::address::MeshAddress;
use crate::buffer::{InputBuffer, MeshBuffer};
use crate::error::WireError;
#[cfg(feature = "hub")]
use crate::payload::{PowerSamplesPayload, ScanMessage, ServiceDataPayload};
use crate::payload::{BeaconMessage, CommandMessage, EventMessage};
use crate::validate::validate_frame;
use crate::wire::{header_size, MeshHeader, MessageType};
use crate::MAX_MESH_MESSAGE_LENGTH;

/// Typed payload of a decoded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshPayload<'a> {
    Event(EventMessage),
    Beacon(BeaconMessage),
    Control(CommandMessage<'a>),
    Config(CommandMessage<'a>),
    #[cfg(feature = "hub")]
    Scan(ScanMessage),
    #[cfg(feature = "hub")]
    PowerSamples(PowerSamplesPayload),
    #[cfg(feature = "hub")]
    ServiceData(ServiceDataPayload),
}

impl<'a> MeshPayload<'a> {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Event(_) => MessageType::Event,
            Self::Beacon(_) => MessageType::Beacon,
            Self::Control(_) => MessageType::Control,
            Self::Config(_) => MessageType::Config,
            #[cfg(feature = "hub")]
            Self::Scan(_) => MessageType::Scan,
            #[cfg(feature = "hub")]
            Self::PowerSamples(_) => MessageType::PowerSamples,
            #[cfg(feature = "hub")]
            Self::ServiceData(_) => MessageType::ServiceData,
        }
    }

    fn read(message_type: MessageType, input: &mut InputBuffer<'a>) -> Result<Self, WireError> {
        Ok(match message_type {
            MessageType::Event => Self::Event(EventMessage::read(input)?),
            MessageType::Beacon => Self::Beacon(BeaconMessage::read(input)?),
            MessageType::Control => Self::Control(CommandMessage::read(input)?),
            MessageType::Config => Self::Config(CommandMessage::read(input)?),
            #[cfg(feature = "hub")]
            MessageType::Scan => Self::Scan(ScanMessage::read(input)?),
            #[cfg(feature = "hub")]
            MessageType::PowerSamples => Self::PowerSamples(PowerSamplesPayload::read(input)?),
            #[cfg(feature = "hub")]
            MessageType::ServiceData => Self::ServiceData(ServiceDataPayload::read(input)?),
        })
    }

    fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
        match self {
            Self::Event(event) => event.write(out),
            Self::Beacon(beacon) => beacon.write(out),
            Self::Control(command) | Self::Config(command) => command.write(out),
            #[cfg(feature = "hub")]
            Self::Scan(scan) => scan.write(out),
            #[cfg(feature = "hub")]
            Self::PowerSamples(samples) => samples.write(out),
            #[cfg(feature = "hub")]
            Self::ServiceData(data) => data.write(out),
        }
    }
}

/// A complete mesh message: header plus typed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshMessage<'a, A> {
    pub header: MeshHeader<A>,
    pub payload: MeshPayload<'a>,
}

impl<'a, A: MeshAddress> MeshMessage<'a, A> {
    /// The header type always follows the payload variant.
    pub fn new(source: A, target: A, payload: MeshPayload<'a>) -> Self {
        Self { header: MeshHeader::new(source, target, payload.message_type()), payload }
    }

    /// Validates the frame length against its declared type, then decodes.
    pub fn decode(raw: &'a [u8]) -> Result<Self, WireError> {
        let message_type = validate_frame::<A>(raw)?;
        let mut input = InputBuffer::new(raw);
        let header = MeshHeader::read(&mut input)?;
        debug_assert_eq!(header.message_type, message_type);
        let payload = MeshPayload::read(message_type, &mut input)?;
        Ok(Self { header, payload })
    }

    pub fn encode(&self) -> Result<MeshBuffer, WireError> {
        let mut out = MeshBuffer::new();
        self.header.write(&mut out)?;
        self.payload.write(&mut out)?;
        Ok(out)
    }
}

/// Outbound report addressed to the hub.
///
/// Created zero-filled with the local node as source; the caller writes the
/// payload, sends it once and drops it. Fixed-size types always encode to
/// their exact size, with unwritten bytes left as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubMessage<A> {
    header: MeshHeader<A>,
    payload: [u8; MAX_MESH_MESSAGE_LENGTH],
    len: usize,
}

impl<A: MeshAddress> HubMessage<A> {
    pub fn new(source: A, message_type: MessageType) -> Self {
        Self {
            header: MeshHeader::new(source, A::BROADCAST, message_type),
            payload: [0u8; MAX_MESH_MESSAGE_LENGTH],
            len: 0,
        }
    }

    /// Payload bytes available after the header.
    pub const fn capacity() -> usize {
        MAX_MESH_MESSAGE_LENGTH - header_size::<A>()
    }

    pub fn header(&self) -> &MeshHeader<A> {
        &self.header
    }

    pub fn message_type(&self) -> MessageType {
        self.header.message_type
    }

    /// The whole payload region, including bytes not written yet.
    pub fn payload_region(&self) -> &[u8] {
        &self.payload[..Self::capacity()]
    }

    /// Bytes written so far.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.len]
    }

    /// Replaces the payload.
    pub fn set_payload(&mut self, data: &[u8]) -> Result<(), WireError> {
        if data.len() > Self::capacity() {
            return Err(WireError::BufferOverflow { needed: data.len(), available: Self::capacity() });
        }
        self.payload[..data.len()].copy_from_slice(data);
        self.payload[data.len()..].fill(0);
        self.len = data.len();
        Ok(())
    }

    fn encoded_payload_len(&self) -> usize {
        let message_type = self.message_type();
        if message_type.is_variable_length() {
            self.len
        } else {
            self.len.max(message_type.payload_size())
        }
    }

    pub fn encoded_len(&self) -> usize {
        header_size::<A>() + self.encoded_payload_len()
    }

    pub fn encode(&self) -> Result<MeshBuffer, WireError> {
        let mut out = MeshBuffer::new();
        self.header.write(&mut out)?;
        out.write(&self.payload[..self.encoded_payload_len()])?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{NodeId, PhysicalAddress};
    use crate::error::ValidationError;

    #[test]
    fn event_roundtrip_physical() {
        let source: PhysicalAddress = "11:22:33:44:55:66".parse().expect("address");
        let msg = MeshMessage::new(source, PhysicalAddress::BROADCAST, MeshPayload::Event(EventMessage::new(0x0102)));
        let encoded = msg.encode().expect("encode");
        assert_eq!(encoded.len(), 16);
        let decoded = MeshMessage::<PhysicalAddress>::decode(encoded.as_slice()).expect("decode");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn header_bytes_are_source_target_type() {
        let msg = MeshMessage::new(NodeId::new(3), NodeId::new(7), MeshPayload::Event(EventMessage::new(0xBEEF)));
        let encoded = msg.encode().expect("encode");
        assert_eq!(encoded.as_slice(), &[3, 7, 3, 0, 0xEF, 0xBE]);
    }

    #[test]
    fn decode_validates_before_reading_payload() {
        let msg = MeshMessage::new(NodeId::new(3), NodeId::new(7), MeshPayload::Event(EventMessage::new(1)));
        let mut frame = msg.encode().expect("encode").to_vec();
        frame.push(0);
        let err = MeshMessage::<NodeId>::decode(&frame).expect_err("oversized");
        assert_eq!(err, WireError::Validation(ValidationError::SizeMismatch { expected: 6, actual: 7 }));
    }

    #[test]
    fn command_params_borrow_from_frame() {
        let params = [1u8, 2, 3];
        let msg = MeshMessage::new(NodeId::new(1), NodeId::new(2), MeshPayload::Control(CommandMessage::new(9, &params)));
        let encoded = msg.encode().expect("encode");
        let decoded = MeshMessage::<NodeId>::decode(encoded.as_slice()).expect("decode");
        match decoded.payload {
            MeshPayload::Control(command) => {
                assert_eq!(command.command_type, 9);
                assert_eq!(command.params, &params);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn hub_message_starts_zeroed_with_source() {
        let source = NodeId::new(42);
        let hub = HubMessage::new(source, MessageType::Control);
        assert_eq!(hub.header().source, source);
        assert_eq!(hub.header().target, NodeId::BROADCAST);
        assert_eq!(hub.message_type(), MessageType::Control);
        assert_eq!(hub.payload_region().len(), MAX_MESH_MESSAGE_LENGTH - 4);
        assert!(hub.payload_region().iter().all(|&b| b == 0));
        assert!(hub.payload().is_empty());
    }

    #[test]
    fn hub_message_payload_is_bounded() {
        let mut hub = HubMessage::new(PhysicalAddress::new([1; 6]), MessageType::Config);
        let capacity = HubMessage::<PhysicalAddress>::capacity();
        assert!(hub.set_payload(&vec![0xAB; capacity + 1]).is_err());
        hub.set_payload(&vec![0xAB; capacity]).expect("fits");
        assert_eq!(hub.encode().expect("encode").len(), MAX_MESH_MESSAGE_LENGTH);

        hub.set_payload(&[1, 2]).expect("shrink");
        assert_eq!(hub.payload(), &[1, 2]);
        assert!(hub.payload_region()[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn fixed_size_hub_message_encodes_its_full_payload() {
        let mut hub = HubMessage::new(NodeId::new(5), MessageType::Beacon);
        hub.set_payload(&[0x11, 0x22]).expect("payload");

        let encoded = hub.encode().expect("encode");

        assert_eq!(encoded.len(), 4 + BeaconMessage::SIZE);
        assert_eq!(hub.encoded_len(), encoded.len());
        assert_eq!(&encoded.as_slice()[4..6], &[0x11, 0x22]);
        assert!(encoded.as_slice()[6..].iter().all(|&b| b == 0));
        assert_eq!(validate_frame::<NodeId>(encoded.as_slice()), Ok(MessageType::Beacon));
    }

    #[test]
    fn variable_hub_message_encodes_only_written_bytes() {
        let hub = HubMessage::new(NodeId::new(5), MessageType::Config);
        assert_eq!(hub.encode().expect("encode").len(), 4);
        assert!(validate_frame::<NodeId>(hub.encode().expect("encode").as_slice()).is_err());
    }
}
