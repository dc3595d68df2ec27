//! Event bus to mesh bridge.
//!
//! Producers on the bus (scanner, power sampler, advertiser) publish their
//! results as events; [`MeshEventBridge`] turns the ones meant for the hub
//! into outbound mesh messages.

use std::sync::{Arc, Weak};

use switchmesh_wire::MeshAddress;
#[cfg(feature = "hub")]
use switchmesh_wire::{PowerSamplesPayload, ScanEntry, ServiceDataPayload};

use crate::control::MeshControl;
use crate::events::{Event, EventListener, EventType};

/// Bus listener forwarding reports to a [`MeshControl`].
///
/// Holds the engine weakly: the engine owns the bus the bridge is registered
/// on.
pub struct MeshEventBridge<A: MeshAddress> {
    #[cfg_attr(not(feature = "hub"), allow(dead_code))]
    control: Weak<MeshControl<A>>,
}

impl<A: MeshAddress> MeshEventBridge<A> {
    pub fn new(control: &Arc<MeshControl<A>>) -> Self {
        Self { control: Arc::downgrade(control) }
    }

    /// Creates a bridge and registers it on the engine's own bus.
    pub fn register(control: &Arc<MeshControl<A>>) -> Arc<Self> {
        let bridge = Arc::new(Self::new(control));
        control.events().add_listener(bridge.clone());
        bridge
    }

    #[cfg(feature = "hub")]
    fn forward_report(&self, event: &Event<'_>) {
        let Some(control) = self.control.upgrade() else {
            log::trace!("mesh bridge: engine gone, ignoring {}", event.kind);
            return;
        };

        let result = match event.kind {
            EventType::ScanResults => match ScanEntry::parse_packed(event.data) {
                Ok(entries) if entries.is_empty() => return,
                Ok(entries) => control.send_scan_message(&entries),
                Err(err) => {
                    log::debug!("mesh bridge: bad scan results: {err}");
                    return;
                }
            },
            EventType::PowerSamplesReady => match PowerSamplesPayload::from_slice(event.data) {
                Ok(samples) => control.send_power_samples_message(&samples),
                Err(err) => {
                    log::debug!("mesh bridge: bad power samples: {err}");
                    return;
                }
            },
            EventType::ServiceDataReady => match ServiceDataPayload::from_slice(event.data) {
                Ok(data) => control.send_service_data_message(&data),
                Err(err) => {
                    log::debug!("mesh bridge: bad service data: {err}");
                    return;
                }
            },
            _ => return,
        };

        if let Err(err) = result {
            log::warn!("mesh bridge: failed to forward {}: {}", event.kind, err);
        }
    }
}

impl<A: MeshAddress> EventListener for MeshEventBridge<A> {
    fn handle_event(&self, event: &Event<'_>) {
        match event.kind {
            EventType::ConfigNodeId | EventType::ConfigNodeAddress => {
                log::info!("mesh bridge: {} changed, local address applies after restart", event.kind);
            }
            #[cfg(feature = "hub")]
            EventType::ScanResults | EventType::PowerSamplesReady | EventType::ServiceDataReady => {
                self.forward_report(event);
            }
            _ => {}
        }
    }
}
