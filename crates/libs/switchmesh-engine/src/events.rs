//! Event dispatch bus shared by the engine and the peripheral subsystems.
//!
//! Listeners register a [`EventListener`] trait object; every dispatched
//! event is delivered synchronously, in registration order, on the caller's
//! context.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Event types carried on the bus.
///
/// Ranges:
/// - `0x0000-0x007F`: configuration changes
/// - `0x0080-0x00FF`: state variable changes
/// - `0x0100-0x01FF`: general events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EventType {
    // Configuration (0x0000-0x007F)
    ConfigNodeId = 0x0001,
    ConfigNodeAddress = 0x0002,

    // State (0x0080-0x00FF)
    StateSwitch = 0x0080,
    StatePowerUsage = 0x0081,
    StateTemperature = 0x0082,

    // General (0x0100-0x01FF)
    PowerOn = 0x0100,
    PowerOff = 0x0101,
    PowerToggle = 0x0102,
    Tick500Ms = 0x0103,
    AdvBackgroundParsed = 0x0104,
    ScanResults = 0x0105,
    PowerSamplesReady = 0x0106,
    ServiceDataReady = 0x0107,
}

impl EventType {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0001 => Some(Self::ConfigNodeId),
            0x0002 => Some(Self::ConfigNodeAddress),
            0x0080 => Some(Self::StateSwitch),
            0x0081 => Some(Self::StatePowerUsage),
            0x0082 => Some(Self::StateTemperature),
            0x0100 => Some(Self::PowerOn),
            0x0101 => Some(Self::PowerOff),
            0x0102 => Some(Self::PowerToggle),
            0x0103 => Some(Self::Tick500Ms),
            0x0104 => Some(Self::AdvBackgroundParsed),
            0x0105 => Some(Self::ScanResults),
            0x0106 => Some(Self::PowerSamplesReady),
            0x0107 => Some(Self::ServiceDataReady),
            _ => None,
        }
    }

    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn is_config(self) -> bool {
        self.code() < 0x0080
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(0x{:04x})", self, self.code())
    }
}

/// One dispatched event. `data` is only valid for the duration of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event<'a> {
    pub kind: EventType,
    pub data: &'a [u8],
}

impl<'a> Event<'a> {
    pub const fn new(kind: EventType, data: &'a [u8]) -> Self {
        Self { kind, data }
    }

    pub const fn empty(kind: EventType) -> Self {
        Self { kind, data: &[] }
    }
}

/// Anything that reacts to bus events.
pub trait EventListener: Send + Sync {
    fn handle_event(&self, event: &Event<'_>);
}

/// Synchronous fan-out bus.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
    dispatched: AtomicU64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner).push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Delivers `event` to every listener and returns how many were called.
    ///
    /// The listener list is snapshotted first, so listeners may dispatch or
    /// register listeners from inside `handle_event`.
    pub fn dispatch(&self, event: &Event<'_>) -> usize {
        let listeners: Vec<Arc<dyn EventListener>> =
            self.listeners.read().unwrap_or_else(PoisonError::into_inner).clone();

        self.dispatched.fetch_add(1, Ordering::Relaxed);
        log::trace!("events: dispatch {} ({} bytes) to {}", event.kind, event.data.len(), listeners.len());

        for listener in &listeners {
            listener.handle_event(event);
        }
        listeners.len()
    }

    pub fn dispatch_empty(&self, kind: EventType) -> usize {
        self.dispatch(&Event::empty(kind))
    }

    pub fn events_dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listener_count())
            .field("dispatched", &self.events_dispatched())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(EventType, Vec<u8>)>>,
    }

    impl EventListener for Recorder {
        fn handle_event(&self, event: &Event<'_>) {
            self.seen.lock().expect("seen lock").push((event.kind, event.data.to_vec()));
        }
    }

    #[test]
    fn codes_roundtrip() {
        for kind in [
            EventType::ConfigNodeId,
            EventType::StateSwitch,
            EventType::PowerToggle,
            EventType::ServiceDataReady,
        ] {
            assert_eq!(EventType::from_code(kind.code()), Some(kind));
        }
        assert_eq!(EventType::from_code(0xFFFF), None);
        assert!(EventType::ConfigNodeAddress.is_config());
        assert!(!EventType::PowerOn.is_config());
    }

    #[test]
    fn dispatch_reaches_every_listener_in_order() {
        let bus = EventDispatcher::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        bus.add_listener(first.clone());
        bus.add_listener(second.clone());

        assert_eq!(bus.dispatch(&Event::new(EventType::PowerOn, &[1, 2])), 2);
        bus.dispatch_empty(EventType::PowerOff);

        let expected = vec![(EventType::PowerOn, vec![1, 2]), (EventType::PowerOff, vec![])];
        assert_eq!(*first.seen.lock().expect("seen lock"), expected);
        assert_eq!(*second.seen.lock().expect("seen lock"), expected);
        assert_eq!(bus.events_dispatched(), 2);
    }

    struct Relay {
        bus: Arc<EventDispatcher>,
    }

    impl EventListener for Relay {
        fn handle_event(&self, event: &Event<'_>) {
            if event.kind == EventType::PowerToggle {
                self.bus.dispatch_empty(EventType::PowerOn);
            }
        }
    }

    #[test]
    fn listeners_may_dispatch_reentrantly() {
        let bus = Arc::new(EventDispatcher::new());
        let recorder = Arc::new(Recorder::default());
        bus.add_listener(Arc::new(Relay { bus: bus.clone() }));
        bus.add_listener(recorder.clone());

        bus.dispatch_empty(EventType::PowerToggle);

        let kinds: Vec<EventType> =
            recorder.seen.lock().expect("seen lock").iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![EventType::PowerOn, EventType::PowerToggle]);
    }
}
