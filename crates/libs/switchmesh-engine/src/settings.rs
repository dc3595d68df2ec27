//! Node configuration boundary.
//!
//! The engine only ever asks [`Settings`] for its own identity, once, while
//! being constructed. [`NodeSettings`] reads that identity from a TOML file;
//! [`MemorySettings`] is an in-process map for embedding and tests.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use switchmesh_wire::{AddressingScheme, MeshAddress, NodeId, PhysicalAddress};

use crate::error::ConfigError;
use crate::events::EventType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    NodeId,
    NodeAddress,
}

impl ConfigKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NodeId => "node.id",
            Self::NodeAddress => "node.address",
        }
    }

    /// Bus event published when this key changes.
    pub const fn event_type(self) -> EventType {
        match self {
            Self::NodeId => EventType::ConfigNodeId,
            Self::NodeAddress => EventType::ConfigNodeAddress,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValue {
    U8(u8),
    Address([u8; 6]),
}

/// Read-only key/value configuration store.
pub trait Settings: Send + Sync {
    fn get(&self, key: ConfigKey) -> Option<ConfigValue>;
}

/// An address type whose local value can be loaded from [`Settings`].
pub trait ConfiguredIdentity: MeshAddress {
    const KEY: ConfigKey;

    fn from_config(value: ConfigValue) -> Option<Self>;

    /// Loads the local address. The broadcast address is never a valid
    /// identity.
    fn from_settings(settings: &dyn Settings) -> Result<Self, ConfigError> {
        let value = settings.get(Self::KEY).ok_or(ConfigError::Missing(Self::KEY))?;
        let address = Self::from_config(value).ok_or_else(|| ConfigError::Invalid {
            key: Self::KEY,
            reason: format!("expected a {} address, found {value:?}", Self::SCHEME),
        })?;
        if address.is_broadcast() {
            return Err(ConfigError::Invalid {
                key: Self::KEY,
                reason: format!("{address} is reserved for broadcast"),
            });
        }
        Ok(address)
    }
}

impl ConfiguredIdentity for NodeId {
    const KEY: ConfigKey = ConfigKey::NodeId;

    fn from_config(value: ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::U8(id) => Some(NodeId::new(id)),
            ConfigValue::Address(_) => None,
        }
    }
}

impl ConfiguredIdentity for PhysicalAddress {
    const KEY: ConfigKey = ConfigKey::NodeAddress;

    fn from_config(value: ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Address(bytes) => Some(PhysicalAddress::new(bytes)),
            ConfigValue::U8(_) => None,
        }
    }
}

/// File-backed node configuration.
///
/// ```toml
/// [node]
/// scheme = "logical"
/// id = 7
/// address = "AA:BB:CC:DD:EE:FF"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeSettings {
    #[serde(default)]
    pub node: NodeSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeSection {
    pub scheme: Option<AddressingScheme>,
    pub id: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_address")]
    pub address: Option<PhysicalAddress>,
}

impl NodeSettings {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Explicit `scheme`, else physical when only an address is given.
    pub fn scheme(&self) -> AddressingScheme {
        match (self.node.scheme, self.node.id, self.node.address) {
            (Some(scheme), _, _) => scheme,
            (None, None, Some(_)) => AddressingScheme::Physical,
            _ => AddressingScheme::Logical,
        }
    }
}

impl Settings for NodeSettings {
    fn get(&self, key: ConfigKey) -> Option<ConfigValue> {
        match key {
            ConfigKey::NodeId => self.node.id.map(ConfigValue::U8),
            ConfigKey::NodeAddress => self.node.address.map(|a| ConfigValue::Address(a.to_bytes())),
        }
    }
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<Option<PhysicalAddress>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    text.map(|s| s.parse().map_err(serde::de::Error::custom)).transpose()
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<ConfigKey, ConfigValue>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ConfigKey, value: ConfigValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: ConfigKey, value: ConfigValue) {
        self.values.insert(key, value);
    }
}

impl Settings for MemorySettings {
    fn get(&self, key: ConfigKey) -> Option<ConfigValue> {
        self.values.get(&key).copied()
    }
}
