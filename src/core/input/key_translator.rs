//=========================================================================
// Key Translator
//=========================================================================
//
// Forwards platform key presses the engine asks for.
//
// The engine-side lookup decides: a zero engine key means the key stays
// with the platform (volume, home, ...) and nothing is sent.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::PlatformKey;
use crate::core::native::NativeSink;

//=== KeyTranslator =======================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct KeyTranslator;

impl KeyTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Returns `true` when the engine consumed the key.
    pub fn key_down<S: NativeSink + ?Sized>(&self, key: PlatformKey, sink: &mut S) -> bool {
        self.forward(key, true, sink)
    }

    /// Returns `true` when the engine consumed the key.
    pub fn key_up<S: NativeSink + ?Sized>(&self, key: PlatformKey, sink: &mut S) -> bool {
        self.forward(key, false, sink)
    }

    fn forward<S: NativeSink + ?Sized>(&self, key: PlatformKey, pressed: bool, sink: &mut S) -> bool {
        let engine_key = sink.translate_key(key);

        if !engine_key.is_mapped() {
            trace!(target: "bridge::input", "Key {:?} not mapped, deferring to platform", key);
            return false;
        }

        sink.send_key(engine_key, pressed);
        true
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::EngineKey;
    use crate::core::native::{KeyTable, NativeCall, RecordingSink};

    #[test]
    fn mapped_key_is_forwarded() {
        let mut sink = RecordingSink::with_keys(KeyTable::android_defaults());
        let translator = KeyTranslator::new();

        assert!(translator.key_down(PlatformKey::DPAD_LEFT, &mut sink));
        assert!(translator.key_up(PlatformKey::DPAD_LEFT, &mut sink));

        assert_eq!(
            sink.calls(),
            &[
                NativeCall::Key { key: EngineKey::LEFT, pressed: true },
                NativeCall::Key { key: EngineKey::LEFT, pressed: false },
            ]
        );
    }

    #[test]
    fn unmapped_key_defers_to_platform() {
        let mut sink = RecordingSink::with_keys(KeyTable::android_defaults());
        let translator = KeyTranslator::new();

        // AKEYCODE_VOLUME_DOWN
        assert!(!translator.key_down(PlatformKey(25), &mut sink));
        assert!(!translator.key_up(PlatformKey(25), &mut sink));
        assert!(sink.calls().is_empty());
    }
}
