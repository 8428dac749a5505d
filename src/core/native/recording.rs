//=========================================================================
// Recording Sink
//=========================================================================
//
// In-memory sink that keeps every notification in order. Used as the
// stand-in engine when exercising translators and the bridge.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::interface::{NativeCall, NativeSink};
use super::key_table::KeyTable;
use crate::core::input::event::{EngineKey, Motion, PlatformKey};

//=== RecordingSink =======================================================

#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<NativeCall>,
    keys: KeyTable,
}

impl RecordingSink {
    /// Creates a sink with no key mappings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(keys: KeyTable) -> Self {
        Self { calls: Vec::new(), keys }
    }

    pub fn calls(&self) -> &[NativeCall] {
        &self.calls
    }

    /// Returns recorded calls and starts a fresh recording.
    pub fn take(&mut self) -> Vec<NativeCall> {
        std::mem::take(&mut self.calls)
    }

    /// Only the motion notifications, in order.
    pub fn motions(&self) -> Vec<Motion> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                NativeCall::Motion(motion) => Some(*motion),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl NativeSink for RecordingSink {
    fn dispatch(&mut self, call: NativeCall) {
        self.calls.push(call);
    }

    fn translate_key(&self, key: PlatformKey) -> EngineKey {
        self.keys.lookup(key)
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_and_takes() {
        let mut sink = RecordingSink::new();
        sink.pause();
        sink.send_motion(Motion::clear());
        sink.resume();

        assert_eq!(sink.motions(), vec![Motion::clear()]);

        let calls = sink.take();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], NativeCall::Pause);
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn translates_through_key_table() {
        let sink = RecordingSink::with_keys(KeyTable::android_defaults());
        assert_eq!(sink.translate_key(PlatformKey::ENTER), EngineKey::RETURN);
        assert_eq!(RecordingSink::new().translate_key(PlatformKey::ENTER), EngineKey::UNMAPPED);
    }
}
