use core::fmt;

use crate::error::WireError;
use crate::MAX_MESH_MESSAGE_LENGTH;

/// Outbound frame buffer. Its capacity is the transport limit, so an
/// encoder writing into it can never produce an oversized frame.
pub type MeshBuffer = StaticBuffer<MAX_MESH_MESSAGE_LENGTH>;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct StaticBuffer<const N: usize> {
    buffer: [u8; N],
    len: usize,
}

impl<const N: usize> StaticBuffer<N> {
    pub const fn new() -> Self {
        Self { buffer: [0u8; N], len: 0 }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn reset(&mut self) {
        self.len = 0;
    }

    pub fn write(&mut self, data: &[u8]) -> Result<usize, WireError> {
        let data_size = data.len();

        // Nothing to write
        if data_size == 0 {
            return Ok(0);
        }

        if (self.len + data_size) > N {
            return Err(WireError::BufferOverflow {
                needed: self.len + data_size,
                available: N,
            });
        }

        self.buffer[self.len..(self.len + data_size)].copy_from_slice(data);
        self.len += data_size;

        Ok(data_size)
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<usize, WireError> {
        self.write(&[byte])
    }

    pub fn write_u16_le(&mut self, value: u16) -> Result<usize, WireError> {
        self.write(&value.to_le_bytes())
    }

    /// Appends `count` zero bytes.
    pub fn write_zeros(&mut self, count: usize) -> Result<usize, WireError> {
        if (self.len + count) > N {
            return Err(WireError::BufferOverflow { needed: self.len + count, available: N });
        }
        self.buffer[self.len..(self.len + count)].fill(0);
        self.len += count;
        Ok(count)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }
}

impl<const N: usize> Default for StaticBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Display for StaticBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ 0x")?;

        for byte in self.as_slice() {
            write!(f, "{:0>2x}", byte)?;
        }

        write!(f, " ]",)
    }
}

/// Bounds-checked cursor over a received frame.
pub struct InputBuffer<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> InputBuffer<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { offset: 0, buffer }
    }

    pub fn read_slice(&mut self, size: usize) -> Result<&'a [u8], WireError> {
        if (self.offset + size) > self.buffer.len() {
            return Err(WireError::UnexpectedEnd { needed: size, available: self.bytes_left() });
        }

        let slice = &self.buffer[self.offset..self.offset + size];

        self.offset += size;

        Ok(slice)
    }

    pub fn read_array<const S: usize>(&mut self) -> Result<[u8; S], WireError> {
        let mut out = [0u8; S];
        out.copy_from_slice(self.read_slice(S)?);
        Ok(out)
    }

    pub fn read_byte(&mut self) -> Result<u8, WireError> {
        Ok(self.read_slice(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_le_bytes(self.read_array::<1>()?))
    }

    pub fn read_u16_le(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    pub fn bytes_left(&self) -> usize {
        self.buffer.len() - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_buffer_rejects_writes_past_capacity() {
        let mut buffer = StaticBuffer::<4>::new();
        buffer.write(&[1, 2, 3]).expect("fits");
        let err = buffer.write(&[4, 5]).expect_err("must overflow");
        assert_eq!(err, WireError::BufferOverflow { needed: 5, available: 4 });
        assert_eq!(buffer.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn write_zeros_pads_and_respects_capacity() {
        let mut buffer = StaticBuffer::<4>::new();
        buffer.write_byte(9).expect("byte");
        buffer.write_zeros(3).expect("zeros");
        assert_eq!(buffer.as_slice(), &[9, 0, 0, 0]);
        assert!(buffer.write_zeros(1).is_err());
    }

    #[test]
    fn input_buffer_reports_remaining_bytes_on_short_read() {
        let data = [0x34, 0x12, 0xff];
        let mut input = InputBuffer::new(&data);
        assert_eq!(input.read_u16_le().expect("u16"), 0x1234);
        assert_eq!(input.read_i8().expect("i8"), -1);
        let err = input.read_byte().expect_err("exhausted");
        assert_eq!(err, WireError::UnexpectedEnd { needed: 1, available: 0 });
    }

    #[test]
    fn display_renders_hex() {
        let mut buffer = StaticBuffer::<4>::new();
        buffer.write(&[0xab, 0x01]).expect("write");
        assert_eq!(buffer.to_string(), "[ 0xab01 ]");
    }
}
