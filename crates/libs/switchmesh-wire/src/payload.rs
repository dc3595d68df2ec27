//! Per-type payload shapes. All multi-byte integers are little-endian.

use crate::buffer::{InputBuffer, MeshBuffer};
use crate::error::WireError;
use crate::COMMAND_HEADER_SIZE;
#[cfg(feature = "hub")]
use crate::{
    address::{PhysicalAddress, PHYSICAL_ADDRESS_LEN},
    MAX_SCAN_ENTRIES, POWER_SAMPLES_PAYLOAD_SIZE, SERVICE_DATA_PAYLOAD_SIZE,
};
#[cfg(feature = "hub")]
use crate::address::MeshAddress;

/// A bus event forwarded across the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMessage {
    pub event: u16,
}

impl EventMessage {
    pub const SIZE: usize = 2;

    pub const fn new(event: u16) -> Self {
        Self { event }
    }

    pub fn read(input: &mut InputBuffer<'_>) -> Result<Self, WireError> {
        Ok(Self { event: input.read_u16_le()? })
    }

    pub fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
        out.write_u16_le(self.event)?;
        Ok(())
    }
}

/// iBeacon parameters pushed to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeaconMessage {
    pub major: u16,
    pub minor: u16,
    pub uuid: [u8; 16],
    pub tx_power: i8,
}

impl BeaconMessage {
    pub const SIZE: usize = 2 + 2 + 16 + 1;

    pub fn read(input: &mut InputBuffer<'_>) -> Result<Self, WireError> {
        Ok(Self {
            major: input.read_u16_le()?,
            minor: input.read_u16_le()?,
            uuid: input.read_array::<16>()?,
            tx_power: input.read_i8()?,
        })
    }

    pub fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
        out.write_u16_le(self.major)?;
        out.write_u16_le(self.minor)?;
        out.write(&self.uuid)?;
        out.write(&self.tx_power.to_le_bytes())?;
        Ok(())
    }
}

/// Control or config command: `[command_type:1][reserved:1][length:2][params]`.
///
/// `params` borrows from the received frame; trailing bytes beyond `length`
/// are padding and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMessage<'a> {
    pub command_type: u8,
    pub params: &'a [u8],
}

impl<'a> CommandMessage<'a> {
    pub const HEADER_SIZE: usize = COMMAND_HEADER_SIZE;

    pub const fn new(command_type: u8, params: &'a [u8]) -> Self {
        Self { command_type, params }
    }

    pub fn read(input: &mut InputBuffer<'a>) -> Result<Self, WireError> {
        let command_type = input.read_byte()?;
        let _reserved = input.read_byte()?;
        let declared = usize::from(input.read_u16_le()?);
        let available = input.bytes_left();
        if declared > available {
            return Err(WireError::CommandLengthOverrun { declared, available });
        }
        let params = input.read_slice(declared)?;
        Ok(Self { command_type, params })
    }

    pub fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
        let length = u16::try_from(self.params.len()).map_err(|_| WireError::BufferOverflow {
            needed: self.params.len(),
            available: usize::from(u16::MAX),
        })?;
        out.write_byte(self.command_type)?;
        out.write_byte(0)?;
        out.write_u16_le(length)?;
        out.write(self.params)?;
        Ok(())
    }

    pub fn encoded_len(&self) -> usize {
        Self::HEADER_SIZE + self.params.len()
    }
}

/// One discovered peripheral.
#[cfg(feature = "hub")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanEntry {
    pub address: PhysicalAddress,
    pub rssi: i8,
    pub occurrences: u16,
}

#[cfg(feature = "hub")]
impl ScanEntry {
    pub const SIZE: usize = PHYSICAL_ADDRESS_LEN + 1 + 2;

    pub const fn new(address: PhysicalAddress, rssi: i8, occurrences: u16) -> Self {
        Self { address, rssi, occurrences }
    }

    pub fn read(input: &mut InputBuffer<'_>) -> Result<Self, WireError> {
        Ok(Self {
            address: PhysicalAddress::read(input)?,
            rssi: input.read_i8()?,
            occurrences: input.read_u16_le()?,
        })
    }

    pub fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
        self.address.write(out)?;
        out.write(&self.rssi.to_le_bytes())?;
        out.write_u16_le(self.occurrences)?;
        Ok(())
    }

    /// Parses back-to-back entry records, as published on the event bus by
    /// the scanner.
    pub fn parse_packed(data: &[u8]) -> Result<Vec<Self>, WireError> {
        if data.len() % Self::SIZE != 0 {
            return Err(WireError::PayloadSize {
                expected: (data.len() / Self::SIZE + 1) * Self::SIZE,
                actual: data.len(),
            });
        }
        let mut input = InputBuffer::new(data);
        let mut entries = Vec::with_capacity(data.len() / Self::SIZE);
        while input.bytes_left() > 0 {
            entries.push(Self::read(&mut input)?);
        }
        Ok(entries)
    }
}

/// Scan results: `[count:1]` followed by a fixed array of entries, unused
/// slots zeroed.
#[cfg(feature = "hub")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanMessage {
    count: u8,
    entries: [ScanEntry; MAX_SCAN_ENTRIES],
}

#[cfg(feature = "hub")]
impl ScanMessage {
    pub const SIZE: usize = 1 + MAX_SCAN_ENTRIES * ScanEntry::SIZE;

    /// Keeps the first [`MAX_SCAN_ENTRIES`] entries in order; the rest are
    /// dropped, never split into a second message.
    pub fn from_entries(list: &[ScanEntry]) -> Self {
        let mut entries = [ScanEntry::default(); MAX_SCAN_ENTRIES];
        let count = list.len().min(MAX_SCAN_ENTRIES);
        entries[..count].copy_from_slice(&list[..count]);
        // count <= MAX_SCAN_ENTRIES, which fits in a byte
        Self { count: count as u8, entries }
    }

    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries[..usize::from(self.count)]
    }

    pub fn len(&self) -> usize {
        usize::from(self.count)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn read(input: &mut InputBuffer<'_>) -> Result<Self, WireError> {
        let count = input.read_byte()?;
        if usize::from(count) > MAX_SCAN_ENTRIES {
            return Err(WireError::ScanCountOverflow {
                count: usize::from(count),
                max: MAX_SCAN_ENTRIES,
            });
        }
        // slots past `count` are padding; consume them but keep them zeroed
        let mut entries = [ScanEntry::default(); MAX_SCAN_ENTRIES];
        for (index, entry) in entries.iter_mut().enumerate() {
            let read = ScanEntry::read(input)?;
            if index < usize::from(count) {
                *entry = read;
            }
        }
        Ok(Self { count, entries })
    }

    pub fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
        out.write_byte(self.count)?;
        for entry in self.entries() {
            entry.write(out)?;
        }
        out.write_zeros((MAX_SCAN_ENTRIES - self.len()) * ScanEntry::SIZE)?;
        Ok(())
    }
}

macro_rules! opaque_payload {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[cfg(feature = "hub")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name([u8; $size]);

        #[cfg(feature = "hub")]
        impl $name {
            pub const SIZE: usize = $size;

            pub const fn new(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            pub fn from_slice(data: &[u8]) -> Result<Self, WireError> {
                let bytes = <[u8; $size]>::try_from(data).map_err(|_| {
                    WireError::PayloadSize { expected: $size, actual: data.len() }
                })?;
                Ok(Self(bytes))
            }

            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            pub fn read(input: &mut InputBuffer<'_>) -> Result<Self, WireError> {
                Ok(Self(input.read_array::<$size>()?))
            }

            pub fn write(&self, out: &mut MeshBuffer) -> Result<(), WireError> {
                out.write(&self.0)?;
                Ok(())
            }
        }

        #[cfg(feature = "hub")]
        impl Default for $name {
            fn default() -> Self {
                Self([0u8; $size])
            }
        }
    };
}

opaque_payload!(
    /// Power samples owned by the sampling subsystem; framed, never inspected.
    PowerSamplesPayload,
    POWER_SAMPLES_PAYLOAD_SIZE
);

opaque_payload!(
    /// Service data owned by the advertising subsystem; framed, never inspected.
    ServiceDataPayload,
    SERVICE_DATA_PAYLOAD_SIZE
);
