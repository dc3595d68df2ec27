use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use switchmesh_engine::{ConfiguredIdentity, EventDispatcher, MeshControl, Settings};
use switchmesh_wire::MessageType;

use crate::session::{LineRadio, SharedOutput};

/// Frames `payload` as a hub report from the configured node and sends it
/// through a [`LineRadio`] on `output`. Returns the frame length.
pub fn send_hub_report<A, W>(
    settings: &dyn Settings,
    message_type: MessageType,
    payload: &[u8],
    output: SharedOutput<W>,
) -> Result<usize>
where
    A: ConfiguredIdentity,
    W: Write + Send + 'static,
{
    let radio = Arc::new(LineRadio::new(output));
    let control = MeshControl::<A>::new(settings, radio, Arc::new(EventDispatcher::new()))?;

    let mut message = control.create_hub_message(message_type);
    message.set_payload(payload)?;
    control.send_hub_message(&message)?;
    Ok(message.encoded_len())
}
