use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meshctl::{hub, inspect, parse_hex, parse_message_type, session};
use switchmesh_engine::NodeSettings;
use switchmesh_wire::{AddressingScheme, NodeId, PhysicalAddress};

#[derive(Parser, Debug)]
#[command(name = "meshctl", about = "Inspect and drive switchmesh frames")]
struct Cli {
    /// Node configuration (TOML, `[node]` table).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and decode one frame.
    Inspect {
        /// Overrides the scheme from the config file.
        #[arg(long, value_parser = parse_scheme)]
        scheme: Option<AddressingScheme>,
        frame: String,
    },
    /// Run an engine over `rx`/`event` lines read from stdin.
    Run,
    /// Frame a hub report from the configured node and print it.
    HubMessage {
        #[arg(long = "type", value_parser = parse_message_type)]
        message_type: switchmesh_wire::MessageType,
        #[arg(long, default_value = "")]
        payload: String,
    },
}

fn parse_scheme(text: &str) -> Result<AddressingScheme, String> {
    match text {
        "physical" => Ok(AddressingScheme::Physical),
        "logical" => Ok(AddressingScheme::Logical),
        other => Err(format!("unknown addressing scheme {other:?}")),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("meshctl error: {err:#}");
        std::process::exit(1);
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<NodeSettings> {
    let path = path.context("--config is required for this command")?;
    NodeSettings::from_path(path).with_context(|| format!("load {}", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Inspect { scheme, frame } => {
            let scheme = match (scheme, cli.config.as_ref()) {
                (Some(scheme), _) => scheme,
                (None, Some(_)) => load_settings(cli.config.as_ref())?.scheme(),
                (None, None) => AddressingScheme::Logical,
            };
            let raw = parse_hex(&frame)?;
            let lines = match scheme {
                AddressingScheme::Logical => inspect::describe::<NodeId>(&raw)?,
                AddressingScheme::Physical => inspect::describe::<PhysicalAddress>(&raw)?,
            };
            for line in lines {
                println!("{line}");
            }
        }
        Command::Run => {
            let settings = load_settings(cli.config.as_ref())?;
            let input = BufReader::new(io::stdin());
            let output = Arc::new(Mutex::new(io::stdout()));
            let stats = match settings.scheme() {
                AddressingScheme::Logical => session::run_session::<NodeId, _, _>(&settings, input, output)?,
                AddressingScheme::Physical => {
                    session::run_session::<PhysicalAddress, _, _>(&settings, input, output)?
                }
            };
            log::info!(
                "session done: {} received, {} delivered, {} dropped, {} events, {} rejected lines",
                stats.received,
                stats.delivered,
                stats.dropped,
                stats.events,
                stats.rejected_lines
            );
        }
        Command::HubMessage { message_type, payload } => {
            let settings = load_settings(cli.config.as_ref())?;
            let payload = parse_hex(&payload)?;
            let output = Arc::new(Mutex::new(io::stdout()));
            let len = match settings.scheme() {
                AddressingScheme::Logical => {
                    hub::send_hub_report::<NodeId, _>(&settings, message_type, &payload, output)?
                }
                AddressingScheme::Physical => {
                    hub::send_hub_report::<PhysicalAddress, _>(&settings, message_type, &payload, output)?
                }
            };
            log::debug!("hub message: {len} bytes");
        }
    }
    Ok(())
}
