use switchmesh_engine::EventType;
use switchmesh_wire::{MeshAddress, MeshMessage, MeshPayload, WireError};

/// Validates and decodes `raw`, returning one line per field group.
pub fn describe<A: MeshAddress>(raw: &[u8]) -> Result<Vec<String>, WireError> {
    let message = MeshMessage::<A>::decode(raw)?;
    let mut lines = vec![format!("{} {} bytes", message.header, raw.len())];

    match message.payload {
        MeshPayload::Event(event) => {
            let name = EventType::from_code(event.event)
                .map(|kind| kind.to_string())
                .unwrap_or_else(|| format!("unknown(0x{:04x})", event.event));
            lines.push(format!("  event {name}"));
        }
        MeshPayload::Beacon(beacon) => {
            lines.push(format!(
                "  beacon major={} minor={} tx_power={} uuid={}",
                beacon.major,
                beacon.minor,
                beacon.tx_power,
                hex::encode(beacon.uuid)
            ));
        }
        MeshPayload::Control(command) | MeshPayload::Config(command) => {
            lines.push(format!(
                "  command 0x{:02x} params={}",
                command.command_type,
                hex::encode(command.params)
            ));
        }
        MeshPayload::Scan(scan) => {
            lines.push(format!("  scan {} entries", scan.len()));
            for entry in scan.entries() {
                lines.push(format!(
                    "    {} rssi={} seen={}",
                    entry.address, entry.rssi, entry.occurrences
                ));
            }
        }
        MeshPayload::PowerSamples(samples) => {
            lines.push(format!("  power_samples {}", hex::encode(samples.as_bytes())));
        }
        MeshPayload::ServiceData(data) => {
            lines.push(format!("  service_data {}", hex::encode(data.as_bytes())));
        }
    }
    Ok(lines)
}
