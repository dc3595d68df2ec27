/// Reasons a received frame is rejected before any typed access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("message too short: {actual} bytes (header is {header})")]
    Truncated { actual: usize, header: usize },

    #[error("unknown message type: {0}")]
    UnknownType(u16),

    #[error("invalid message length: {actual} != {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("invalid message length: {actual} not in ({lower_bound}, {max}]")]
    LengthOutOfRange { lower_bound: usize, max: usize, actual: usize },
}

/// Errors from wire encode/decode operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("buffer overflow: {needed} bytes needed, {available} available")]
    BufferOverflow { needed: usize, available: usize },

    #[error("unexpected end of message: {needed} bytes needed, {available} left")]
    UnexpectedEnd { needed: usize, available: usize },

    #[error("command length {declared} exceeds {available} remaining bytes")]
    CommandLengthOverrun { declared: usize, available: usize },

    #[error("scan entry count {count} exceeds maximum {max}")]
    ScanCountOverflow { count: usize, max: usize },

    #[error("payload size mismatch: expected {expected}, got {actual}")]
    PayloadSize { expected: usize, actual: usize },

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
