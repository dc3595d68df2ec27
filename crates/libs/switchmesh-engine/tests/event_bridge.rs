mod common;

use std::sync::Arc;

use common::{init_logging, logical_node};
use switchmesh_engine::{Event, EventType, MeshEventBridge};

#[test]
fn config_changes_are_only_logged() {
    init_logging();
    let node = logical_node(7);
    MeshEventBridge::register(&node.control);

    node.events.dispatch(&Event::new(EventType::ConfigNodeId, &[9]));

    assert_eq!(node.control.local_address().get(), 7);
    assert!(node.transport.sent().is_empty());
}

#[test]
fn unrelated_events_are_ignored() {
    let node = logical_node(7);
    MeshEventBridge::register(&node.control);

    node.events.dispatch_empty(EventType::PowerToggle);
    node.events.dispatch_empty(EventType::Tick500Ms);

    assert!(node.transport.sent().is_empty());
}

#[test]
fn bridge_does_not_keep_the_engine_alive() {
    let node = logical_node(7);
    let bridge = MeshEventBridge::register(&node.control);
    let common::Node { control, events, transport, .. } = node;
    let weak = Arc::downgrade(&control);

    drop(control);

    assert!(weak.upgrade().is_none());
    events.dispatch_empty(EventType::ScanResults);
    assert_eq!(events.listener_count(), 2);
    assert!(transport.sent().is_empty());
    drop(bridge);
}

#[cfg(feature = "hub")]
mod hub {
    use super::*;
    use switchmesh_engine::wire::{
        MeshMessage, MeshPayload, MeshBuffer, NodeId, PhysicalAddress, ScanEntry, HUB_CHANNEL,
        POWER_SAMPLES_PAYLOAD_SIZE, SERVICE_DATA_PAYLOAD_SIZE,
    };

    fn packed(entries: &[ScanEntry]) -> Vec<u8> {
        let mut out = MeshBuffer::new();
        for entry in entries {
            entry.write(&mut out).expect("write entry");
        }
        out.to_vec()
    }

    #[test]
    fn scan_results_become_one_scan_message() {
        let node = logical_node(7);
        MeshEventBridge::register(&node.control);
        let entries = [
            ScanEntry::new(PhysicalAddress::new([1, 2, 3, 4, 5, 6]), -70, 4),
            ScanEntry::new(PhysicalAddress::new([6, 5, 4, 3, 2, 1]), -55, 1),
        ];

        node.events.dispatch(&Event::new(EventType::ScanResults, &packed(&entries)));

        let sent = node.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, HUB_CHANNEL);
        let decoded = MeshMessage::<NodeId>::decode(&sent[0].1).expect("decode");
        let MeshPayload::Scan(scan) = decoded.payload else {
            panic!("expected scan payload, got {:?}", decoded.payload);
        };
        assert_eq!(scan.entries(), &entries[..]);
    }

    #[test]
    fn empty_or_ragged_scan_results_are_ignored() {
        let node = logical_node(7);
        MeshEventBridge::register(&node.control);

        node.events.dispatch_empty(EventType::ScanResults);
        node.events.dispatch(&Event::new(EventType::ScanResults, &[0u8; ScanEntry::SIZE + 1]));

        assert!(node.transport.sent().is_empty());
    }

    #[test]
    fn fixed_size_reports_require_exact_lengths() {
        let node = logical_node(7);
        MeshEventBridge::register(&node.control);

        node.events.dispatch(&Event::new(EventType::PowerSamplesReady, &[1u8; POWER_SAMPLES_PAYLOAD_SIZE - 1]));
        node.events.dispatch(&Event::new(EventType::ServiceDataReady, &[1u8; SERVICE_DATA_PAYLOAD_SIZE + 1]));
        assert!(node.transport.sent().is_empty());

        node.events.dispatch(&Event::new(EventType::PowerSamplesReady, &[1u8; POWER_SAMPLES_PAYLOAD_SIZE]));
        node.events.dispatch(&Event::new(EventType::ServiceDataReady, &[2u8; SERVICE_DATA_PAYLOAD_SIZE]));

        let types: Vec<_> = node
            .transport
            .sent()
            .iter()
            .map(|(_, raw)| MeshMessage::<NodeId>::decode(raw).expect("decode").header.message_type)
            .collect();
        assert_eq!(
            types,
            vec![
                switchmesh_engine::wire::MessageType::PowerSamples,
                switchmesh_engine::wire::MessageType::ServiceData,
            ]
        );
    }

    #[test]
    fn send_failures_are_swallowed() {
        let node = logical_node(7);
        MeshEventBridge::register(&node.control);
        node.transport.set_busy(true);

        node.events.dispatch(&Event::new(EventType::ServiceDataReady, &[2u8; SERVICE_DATA_PAYLOAD_SIZE]));

        assert!(node.transport.sent().is_empty());
    }
}
