//! Length checks that gate every typed access to a received frame.

use crate::address::MeshAddress;
use crate::error::ValidationError;
use crate::wire::{header_size, MessageType, MESSAGE_TYPE_SIZE};

/// Reads the message type discriminator without decoding anything else.
pub fn peek_message_type<A: MeshAddress>(raw: &[u8]) -> Result<u16, ValidationError> {
    let header = header_size::<A>();
    if raw.len() < header {
        return Err(ValidationError::Truncated { actual: raw.len(), header });
    }
    let offset = header - MESSAGE_TYPE_SIZE;
    Ok(u16::from_le_bytes([raw[offset], raw[offset + 1]]))
}

/// Checks `raw` against the size rule of `declared_type`.
///
/// Fixed-size types must match exactly. Control and config messages must be
/// strictly longer than header plus command framing and no longer than
/// [`MAX_MESH_MESSAGE_LENGTH`](crate::MAX_MESH_MESSAGE_LENGTH).
pub fn validate<A: MeshAddress>(
    raw: &[u8],
    declared_type: u16,
) -> Result<MessageType, ValidationError> {
    let message_type = MessageType::from_code(declared_type)?;
    message_type.size_rule::<A>().check(raw.len())?;
    Ok(message_type)
}

/// [`peek_message_type`] followed by [`validate`].
pub fn validate_frame<A: MeshAddress>(raw: &[u8]) -> Result<MessageType, ValidationError> {
    validate::<A>(raw, peek_message_type::<A>(raw)?)
}
