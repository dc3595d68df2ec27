use switchmesh_wire::{ValidationError, WireError};

use crate::settings::ConfigKey;
use crate::transport::TransportError;

/// Errors raised while loading node configuration.
///
/// A node must not start routing without a valid identity, so any of these
/// coming out of [`MeshControl::new`](crate::MeshControl::new) halts
/// initialization.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(ConfigKey),

    #[error("invalid configuration value for {key}: {reason}")]
    Invalid { key: ConfigKey, reason: String },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned to the producer of an outbound message.
///
/// None of these are retried by the engine; callers may drop the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("message of {len} bytes exceeds mesh limit of {max}")]
    Oversized { len: usize, max: usize },

    #[error("encode error: {0}")]
    Encode(#[from] WireError),

    /// The encoded frame would be dropped by any receiver.
    #[error("invalid frame: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SendError {
    /// Returns `true` when the same frame may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Busy))
    }
}
