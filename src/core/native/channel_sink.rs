//=========================================================================
// Channel Sink
//=========================================================================
//
// Message-passing sink for engines running on their own thread.
//
// Architecture:
// ```text
//  Platform Thread                         Engine Thread
//  ┌───────────────────────┐              ┌──────────────────────┐
//  │ Bridge                │              │ CallCollector        │
//  │   ↓ NativeSink calls  │   ordered    │   collect_frame()    │
//  │ ChannelSink ──────────┼──────────────┼─→ frame calls        │
//  │   └─ KeyTable lookup  │   channel    │   ↓                  │
//  └───────────────────────┘              │ engine tick          │
//                                         └──────────────────────┘
// ```
//
// The queue bound applies to frame, input and sensor traffic only. When
// the engine falls behind, such notifications are dropped (and counted)
// rather than blocking the platform thread. Configuration and lifecycle
// calls (dirs, surface, pause, resume, exit) are always queued, in order.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Sender};
use log::warn;

//=== Internal Dependencies ===============================================

use super::call_collector::CallCollector;
use super::interface::{NativeCall, NativeSink};
use super::key_table::KeyTable;
use crate::core::input::event::{EngineKey, PlatformKey};

//=== ChannelSink =========================================================

/// Sink forwarding notifications over a channel to the engine thread.
pub struct ChannelSink {
    sender: Sender<NativeCall>,
    capacity: usize,
    keys: KeyTable,
    dropped: u64,
}

impl ChannelSink {
    /// Queue length past which droppable notifications are discarded.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a connected sink/collector pair.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn bounded(capacity: usize, keys: KeyTable) -> (Self, CallCollector) {
        assert!(capacity > 0, "Channel capacity must be positive");

        let (sender, receiver) = unbounded();
        let sink = Self {
            sender,
            capacity,
            keys,
            dropped: 0,
        };

        (sink, CallCollector::new(receiver))
    }

    /// Number of notifications dropped (queue full or engine gone).
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl NativeSink for ChannelSink {
    fn dispatch(&mut self, call: NativeCall) {
        if call.is_droppable() && self.sender.len() >= self.capacity {
            self.dropped += 1;
            warn!(
                target: "bridge::native",
                "Engine queue full, dropping {:?} ({} dropped so far)",
                call,
                self.dropped
            );
            return;
        }

        if let Err(e) = self.sender.send(call) {
            self.dropped += 1;
            warn!(target: "bridge::native", "Engine disconnected, dropping {:?}", e.into_inner());
        }
    }

    fn translate_key(&self, key: PlatformKey) -> EngineKey {
        self.keys.lookup(key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
