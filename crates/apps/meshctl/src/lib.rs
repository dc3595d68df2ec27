//! Host-side tooling for switchmesh nodes: frame inspection, a line-driven
//! engine session and hub report construction.

pub mod hub;
pub mod inspect;
pub mod session;

use anyhow::{anyhow, Context, Result};
use switchmesh_engine::EventType;
use switchmesh_wire::MessageType;

/// Decodes hex, ignoring whitespace and `:` separators.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace() && *c != ':').collect();
    hex::decode(&compact).with_context(|| format!("invalid hex {text:?}"))
}

/// Accepts the wire name (`power_samples`) or the numeric code.
pub fn parse_message_type(text: &str) -> Result<MessageType> {
    if let Some(found) = MessageType::ALL.iter().find(|t| t.to_string() == text) {
        return Ok(*found);
    }
    let code = parse_number(text).ok_or_else(|| anyhow!("unknown message type {text:?}"))?;
    Ok(MessageType::from_code(code)?)
}

/// Accepts a decimal or `0x`-prefixed event code.
pub fn parse_event_type(text: &str) -> Result<EventType> {
    let code = parse_number(text).ok_or_else(|| anyhow!("invalid event code {text:?}"))?;
    EventType::from_code(code).ok_or_else(|| anyhow!("unknown event code 0x{code:04x}"))
}

fn parse_number(text: &str) -> Option<u16> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u16::from_str_radix(digits, 16).ok(),
        None => text.parse().ok(),
    }
}
