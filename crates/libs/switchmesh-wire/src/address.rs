//! Node addressing.
//!
//! A deployment uses exactly one scheme. Code that must work for both is
//! written against [`MeshAddress`]; the concrete type is fixed when the
//! engine is instantiated, so addresses of different schemes can never be
//! compared with each other.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::{InputBuffer, MeshBuffer};
use crate::error::WireError;
use crate::wire::MeshHeader;

pub const PHYSICAL_ADDRESS_LEN: usize = 6;

/// Which addressing scheme a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingScheme {
    Physical,
    Logical,
}

impl fmt::Display for AddressingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Physical => f.write_str("physical"),
            Self::Logical => f.write_str("logical"),
        }
    }
}

/// An address that can appear in the source/target fields of a header.
pub trait MeshAddress:
    Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Encoded size in bytes.
    const SIZE: usize;
    /// Reserved address meaning "every node".
    const BROADCAST: Self;
    const SCHEME: AddressingScheme;

    fn read(input: &mut InputBuffer<'_>) -> Result<Self, WireError>;

    fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError>;

    fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

/// 6-byte link-layer address, stored in over-the-air (least significant
/// byte first) order.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct PhysicalAddress([u8; PHYSICAL_ADDRESS_LEN]);

impl PhysicalAddress {
    pub const BROADCAST: Self = Self([0xFF; PHYSICAL_ADDRESS_LEN]);

    pub const fn new(bytes: [u8; PHYSICAL_ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PHYSICAL_ADDRESS_LEN] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; PHYSICAL_ADDRESS_LEN] {
        self.0
    }
}

impl MeshAddress for PhysicalAddress {
    const SIZE: usize = PHYSICAL_ADDRESS_LEN;
    const BROADCAST: Self = PhysicalAddress::BROADCAST;
    const SCHEME: AddressingScheme = AddressingScheme::Physical;

    fn read(input: &mut InputBuffer<'_>) -> Result<Self, WireError> {
        Ok(Self(input.read_array::<PHYSICAL_ADDRESS_LEN>()?))
    }

    fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
        out.write(&self.0)?;
        Ok(())
    }
}

/// Rendered most significant byte first, the way the address is printed on
/// the device label.
impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[5], b[4], b[3], b[2], b[1], b[0]
        )
    }
}

impl FromStr for PhysicalAddress {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; PHYSICAL_ADDRESS_LEN];
        let mut count = 0;
        for part in s.trim().split(':') {
            if count == PHYSICAL_ADDRESS_LEN || part.len() != 2 {
                return Err(WireError::InvalidAddress(s.to_string()));
            }
            let byte = u8::from_str_radix(part, 16)
                .map_err(|_| WireError::InvalidAddress(s.to_string()))?;
            bytes[PHYSICAL_ADDRESS_LEN - 1 - count] = byte;
            count += 1;
        }
        if count != PHYSICAL_ADDRESS_LEN {
            return Err(WireError::InvalidAddress(s.to_string()));
        }
        Ok(Self(bytes))
    }
}

/// Logical node identifier. `0` is reserved for broadcast.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct NodeId(u8);

impl NodeId {
    pub const BROADCAST: Self = Self(0);

    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl MeshAddress for NodeId {
    const SIZE: usize = 1;
    const BROADCAST: Self = NodeId::BROADCAST;
    const SCHEME: AddressingScheme = AddressingScheme::Logical;

    fn read(input: &mut InputBuffer<'_>) -> Result<Self, WireError> {
        Ok(Self(input.read_byte()?))
    }

    fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
        out.write_byte(self.0)?;
        Ok(())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for NodeId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Answers "is this message for me" for one local address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addressing<A> {
    local: A,
}

impl<A: MeshAddress> Addressing<A> {
    pub fn new(local: A) -> Self {
        Self { local }
    }

    pub fn local(&self) -> A {
        self.local
    }

    pub fn is_broadcast(&self, header: &MeshHeader<A>) -> bool {
        header.target.is_broadcast()
    }

    /// Broadcast frames count as local deliveries.
    pub fn is_for_local_node(&self, header: &MeshHeader<A>) -> bool {
        header.target == self.local || self.is_broadcast(header)
    }
}
