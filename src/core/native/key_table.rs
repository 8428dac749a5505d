//=========================================================================
// Key Table
//=========================================================================
//
// Platform key code → engine key lookup used by message-based sinks.
//
// The default table covers letters, digits, the D-pad, and the common
// editing keys. Everything else is unmapped and left to the platform.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use crate::core::input::event::{EngineKey, PlatformKey};

//=== KeyTable ============================================================

#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    entries: HashMap<PlatformKey, EngineKey>,
}

impl KeyTable {
    /// Creates an empty table (every key unmapped).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds or replaces one mapping.
    pub fn bind(mut self, platform: PlatformKey, engine: EngineKey) -> Self {
        self.insert(platform, engine);
        self
    }

    pub fn insert(&mut self, platform: PlatformKey, engine: EngineKey) {
        self.entries.insert(platform, engine);
    }

    /// Returns the engine key, or [`EngineKey::UNMAPPED`].
    pub fn lookup(&self, platform: PlatformKey) -> EngineKey {
        self.entries
            .get(&platform)
            .copied()
            .unwrap_or(EngineKey::UNMAPPED)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Standard mapping for Android key codes.
    pub fn android_defaults() -> Self {
        let mut table = Self::empty();

        //--- Letters & Digits ---------------------------------------------

        for offset in 0..=(PlatformKey::KEY_Z.0 - PlatformKey::KEY_A.0) {
            table.insert(
                PlatformKey(PlatformKey::KEY_A.0 + offset),
                EngineKey(EngineKey::KEY_A.0 + offset),
            );
        }
        for offset in 0..=(PlatformKey::DIGIT_9.0 - PlatformKey::DIGIT_0.0) {
            table.insert(
                PlatformKey(PlatformKey::DIGIT_0.0 + offset),
                EngineKey(EngineKey::DIGIT_0.0 + offset),
            );
        }

        //--- Navigation ---------------------------------------------------

        table.insert(PlatformKey::DPAD_UP, EngineKey::UP);
        table.insert(PlatformKey::DPAD_DOWN, EngineKey::DOWN);
        table.insert(PlatformKey::DPAD_LEFT, EngineKey::LEFT);
        table.insert(PlatformKey::DPAD_RIGHT, EngineKey::RIGHT);
        table.insert(PlatformKey::DPAD_CENTER, EngineKey::RETURN);

        //--- Special ------------------------------------------------------

        table.insert(PlatformKey::BACK, EngineKey::ESCAPE);
        table.insert(PlatformKey::ESCAPE, EngineKey::ESCAPE);
        table.insert(PlatformKey::ENTER, EngineKey::RETURN);
        table.insert(PlatformKey::SPACE, EngineKey::SPACE);
        table.insert(PlatformKey::TAB, EngineKey::TAB);
        table.insert(PlatformKey::DEL, EngineKey::BACKSPACE);
        table.insert(PlatformKey::FORWARD_DEL, EngineKey::DELETE);
        table.insert(PlatformKey::MENU, EngineKey::MENU);

        table
    }
}

//=========================================================================
// Tests
//=========================================================================
