//! Line-driven engine session.
//!
//! Each input line is one of:
//!
//! ```text
//! rx <channel> <hex frame>         feed a received frame to the router
//! event <code> [hex data]          publish an event on the bus
//! ```
//!
//! Frames the engine sends are written to the output as `tx <channel> <hex>`;
//! routing outcomes as `ok <type>` or `drop <reason>`.

use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, bail, Context, Result};
use switchmesh_engine::{
    BeaconHandler, CommandHandler, CommandKind, ConfiguredIdentity, Event, EventDispatcher,
    EventListener, HubReportHandler, InboundOutcome, MeshControl, MeshEventBridge, MeshTransport,
    Settings, TransportError,
};
use switchmesh_wire::{BeaconMessage, CommandMessage, MeshAddress, MeshMessage};

use crate::{parse_event_type, parse_hex};

pub type SharedOutput<W> = Arc<Mutex<W>>;

fn write_line<W: Write>(output: &Mutex<W>, line: &str) -> std::io::Result<()> {
    let mut out = output.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(out, "{line}")
}

/// Transport that prints every outbound frame.
pub struct LineRadio<W> {
    output: SharedOutput<W>,
}

impl<W: Write + Send> LineRadio<W> {
    pub fn new(output: SharedOutput<W>) -> Self {
        Self { output }
    }
}

impl<W: Write + Send> MeshTransport for LineRadio<W> {
    fn send(&self, channel: u8, data: &[u8]) -> Result<(), TransportError> {
        write_line(&self.output, &format!("tx {channel} {}", hex::encode(data)))
            .map_err(|err| TransportError::Failure(err.to_string()))
    }
}

/// Logs everything the engine delivers locally.
#[derive(Debug, Default)]
pub struct LogSink;

impl BeaconHandler for LogSink {
    fn handle_beacon(&self, channel: u8, beacon: &BeaconMessage) {
        log::info!(
            "beacon on {channel}: major={} minor={} tx_power={}",
            beacon.major,
            beacon.minor,
            beacon.tx_power
        );
    }
}

impl CommandHandler for LogSink {
    fn handle_command(&self, channel: u8, kind: CommandKind, command: &CommandMessage<'_>) {
        log::info!(
            "{kind:?} command 0x{:02x} on {channel}: {}",
            command.command_type,
            hex::encode(command.params)
        );
    }
}

impl<A: MeshAddress> HubReportHandler<A> for LogSink {
    fn handle_report(&self, channel: u8, message: &MeshMessage<'_, A>) {
        log::info!("report on {channel}: {}", message.header);
    }
}

impl EventListener for LogSink {
    fn handle_event(&self, event: &Event<'_>) {
        log::info!("event {} ({} bytes)", event.kind, event.data.len());
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub received: usize,
    pub delivered: usize,
    pub dropped: usize,
    pub events: usize,
    pub rejected_lines: usize,
}

/// Builds an engine for `A` from `settings` and runs `input` through it.
pub fn run_session<A, R, W>(
    settings: &dyn Settings,
    input: R,
    output: SharedOutput<W>,
) -> Result<SessionStats>
where
    A: ConfiguredIdentity,
    R: BufRead,
    W: Write + Send + 'static,
{
    let events = Arc::new(EventDispatcher::new());
    let sink = Arc::new(LogSink);
    events.add_listener(sink.clone());

    let radio = Arc::new(LineRadio::new(output.clone()));
    let control = MeshControl::<A>::new(settings, radio, events.clone())?
        .with_beacon_handler(sink.clone())
        .with_command_handler(sink.clone())
        .with_hub_report_handler(sink);
    let control = Arc::new(control);
    MeshEventBridge::register(&control);

    let mut stats = SessionStats::default();
    for (index, line) in input.lines().enumerate() {
        let line = line.context("read input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(err) = apply_line(&control, &events, &output, line, &mut stats) {
            log::warn!("line {}: {err:#}", index + 1);
            stats.rejected_lines += 1;
        }
    }
    Ok(stats)
}

fn apply_line<A: MeshAddress, W: Write>(
    control: &MeshControl<A>,
    events: &EventDispatcher,
    output: &Mutex<W>,
    line: &str,
    stats: &mut SessionStats,
) -> Result<()> {
    let mut parts = line.splitn(3, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let first = parts.next().ok_or_else(|| anyhow!("{verb}: missing argument"))?;
    let rest = parts.next().unwrap_or_default();

    match verb {
        "rx" => {
            let channel: u8 = first.parse().with_context(|| format!("invalid channel {first:?}"))?;
            let raw = parse_hex(rest)?;
            stats.received += 1;
            let report = match control.on_receive(channel, &raw) {
                InboundOutcome::Delivered(message_type) => {
                    stats.delivered += 1;
                    format!("ok {message_type}")
                }
                InboundOutcome::Dropped(reason) => {
                    stats.dropped += 1;
                    format!("drop {reason}")
                }
            };
            write_line(output, &report)?;
        }
        "event" => {
            let kind = parse_event_type(first)?;
            let data = if rest.is_empty() { Vec::new() } else { parse_hex(rest)? };
            events.dispatch(&Event::new(kind, &data));
            stats.events += 1;
        }
        other => bail!("unknown command {other:?}"),
    }
    Ok(())
}
