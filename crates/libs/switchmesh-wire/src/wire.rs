//! Header layout and per-type size table.

use core::fmt;

use crate::address::MeshAddress;
use crate::buffer::{InputBuffer, MeshBuffer};
use crate::error::{ValidationError, WireError};
use crate::payload::{BeaconMessage, EventMessage};
#[cfg(feature = "hub")]
use crate::payload::{PowerSamplesPayload, ScanMessage, ServiceDataPayload};
use crate::{COMMAND_HEADER_SIZE, MAX_MESH_MESSAGE_LENGTH};

/// Size of the message type discriminator.
pub const MESSAGE_TYPE_SIZE: usize = 2;

/// Header size for addresses of type `A`: source, target, message type.
pub const fn header_size<A: MeshAddress>() -> usize {
    2 * A::SIZE + MESSAGE_TYPE_SIZE
}

/// Mesh message types.
///
/// Codes match the deployed firmware:
/// - `0-3`: node-to-node messages
/// - `101-103`: node-to-hub reports (feature `hub`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageType {
    Control = 0,
    Beacon = 1,
    Config = 2,
    Event = 3,

    #[cfg(feature = "hub")]
    Scan = 101,
    #[cfg(feature = "hub")]
    PowerSamples = 102,
    #[cfg(feature = "hub")]
    ServiceData = 103,
}

impl MessageType {
    pub const ALL: &'static [MessageType] = &[
        MessageType::Control,
        MessageType::Beacon,
        MessageType::Config,
        MessageType::Event,
        #[cfg(feature = "hub")]
        MessageType::Scan,
        #[cfg(feature = "hub")]
        MessageType::PowerSamples,
        #[cfg(feature = "hub")]
        MessageType::ServiceData,
    ];

    /// Convert from the raw discriminator.
    pub fn from_code(code: u16) -> Result<Self, ValidationError> {
        match code {
            0 => Ok(Self::Control),
            1 => Ok(Self::Beacon),
            2 => Ok(Self::Config),
            3 => Ok(Self::Event),
            #[cfg(feature = "hub")]
            101 => Ok(Self::Scan),
            #[cfg(feature = "hub")]
            102 => Ok(Self::PowerSamples),
            #[cfg(feature = "hub")]
            103 => Ok(Self::ServiceData),
            _ => Err(ValidationError::UnknownType(code)),
        }
    }

    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Control and config messages carry a parameter array that does not
    /// have to be filled, so only bounds are known in advance.
    pub const fn is_variable_length(self) -> bool {
        matches!(self, Self::Control | Self::Config)
    }

    /// Hub reports occupy codes above 100.
    pub const fn is_hub_report(self) -> bool {
        self.code() > 100
    }

    /// Exact payload size for fixed types, minimum framing for variable ones.
    pub const fn payload_size(self) -> usize {
        match self {
            Self::Event => EventMessage::SIZE,
            Self::Beacon => BeaconMessage::SIZE,
            Self::Control | Self::Config => COMMAND_HEADER_SIZE,
            #[cfg(feature = "hub")]
            Self::Scan => ScanMessage::SIZE,
            #[cfg(feature = "hub")]
            Self::PowerSamples => PowerSamplesPayload::SIZE,
            #[cfg(feature = "hub")]
            Self::ServiceData => ServiceDataPayload::SIZE,
        }
    }

    pub const fn size_rule<A: MeshAddress>(self) -> SizeRule {
        let size = header_size::<A>() + self.payload_size();
        if self.is_variable_length() {
            SizeRule::Bounded { lower_bound: size, max: MAX_MESH_MESSAGE_LENGTH }
        } else {
            SizeRule::Exact(size)
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Control => "control",
            Self::Beacon => "beacon",
            Self::Config => "config",
            Self::Event => "event",
            #[cfg(feature = "hub")]
            Self::Scan => "scan",
            #[cfg(feature = "hub")]
            Self::PowerSamples => "power_samples",
            #[cfg(feature = "hub")]
            Self::ServiceData => "service_data",
        };
        f.write_str(name)
    }
}

/// Accepted frame lengths for one message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRule {
    Exact(usize),
    /// `lower_bound < len <= max`. A frame of exactly `lower_bound` bytes
    /// (no parameters at all) is rejected.
    Bounded { lower_bound: usize, max: usize },
}

impl SizeRule {
    pub fn check(self, actual: usize) -> Result<(), ValidationError> {
        match self {
            Self::Exact(expected) if actual == expected => Ok(()),
            Self::Exact(expected) => Err(ValidationError::SizeMismatch { expected, actual }),
            Self::Bounded { lower_bound, max } if actual > lower_bound && actual <= max => Ok(()),
            Self::Bounded { lower_bound, max } => {
                Err(ValidationError::LengthOutOfRange { lower_bound, max, actual })
            }
        }
    }

    /// Smallest size the rule names: the exact size, or the lower bound.
    pub fn nominal(self) -> usize {
        match self {
            Self::Exact(size) => size,
            Self::Bounded { lower_bound, .. } => lower_bound,
        }
    }
}

/// Size rule for a raw discriminator, `None` when the type is unknown.
pub fn size_rule<A: MeshAddress>(code: u16) -> Option<SizeRule> {
    MessageType::from_code(code).ok().map(MessageType::size_rule::<A>)
}

/// Frame size for a raw discriminator: header plus exact payload for fixed
/// types, header plus minimum framing for variable types, `0` if unknown.
pub fn message_size<A: MeshAddress>(code: u16) -> usize {
    size_rule::<A>(code).map(SizeRule::nominal).unwrap_or(0)
}

/// Fixed-size prefix of every mesh message.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct MeshHeader<A> {
    pub source: A,
    pub target: A,
    pub message_type: MessageType,
}

impl<A: MeshAddress> MeshHeader<A> {
    pub const SIZE: usize = header_size::<A>();

    pub fn new(source: A, target: A, message_type: MessageType) -> Self {
        Self { source, target, message_type }
    }

    pub fn read(input: &mut InputBuffer<'_>) -> Result<Self, WireError> {
        let source = A::read(input)?;
        let target = A::read(input)?;
        let message_type = MessageType::from_code(input.read_u16_le()?)?;
        Ok(Self { source, target, message_type })
    }

    pub fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
        self.source.write(out)?;
        self.target.write(out)?;
        out.write_u16_le(self.message_type.code())?;
        Ok(())
    }
}

impl<A: MeshAddress> fmt::Display for MeshHeader<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} -> {}]", self.message_type, self.source, self.target)
    }
}
