//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit keyboard events into platform key codes.
//
// Architecture:
//   Winit KeyEvent → InputProcessor → KeyInput (Android key code) → Bridge
//
// Desktop keys are mapped onto the Android key codes the engine's key
// table is written against. Android native key codes pass through
// unchanged. Unmapped keys (F-keys, numpad, media keys) are filtered
// (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode as WinitKeyCode, NativeKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::PlatformKey;

//=== KeyInput ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeyInput {
    pub key: PlatformKey,
    pub pressed: bool,
}

//=== InputProcessor ======================================================

/// Converts Winit key events to platform key presses.
///
/// Key repeats are dropped: the engine sees one press per physical press.
pub(crate) struct InputProcessor;

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Converts a Winit KeyEvent (filters repeats and unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<KeyInput> {
        if key_event.repeat {
            return None;
        }
        self.process_key(key_event.physical_key, key_event.state)
    }

    pub(crate) fn process_key(&self, physical_key: PhysicalKey, state: ElementState) -> Option<KeyInput> {
        let key = platform_key(physical_key)?;
        Some(KeyInput {
            key,
            pressed: state == ElementState::Pressed,
        })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Maps a Winit physical key to its Android key code.
pub(crate) fn platform_key(physical_key: PhysicalKey) -> Option<PlatformKey> {
    match physical_key {
        PhysicalKey::Code(code) => from_key_code(code),
        PhysicalKey::Unidentified(NativeKeyCode::Android(scancode)) => {
            i32::try_from(scancode).ok().map(PlatformKey)
        }
        PhysicalKey::Unidentified(_) => None,
    }
}

fn from_key_code(code: WinitKeyCode) -> Option<PlatformKey> {
    use WinitKeyCode::*;

    let key = match code {
        //--- Digits -------------------------------------------------------

        Digit0 => digit(0),
        Digit1 => digit(1),
        Digit2 => digit(2),
        Digit3 => digit(3),
        Digit4 => digit(4),
        Digit5 => digit(5),
        Digit6 => digit(6),
        Digit7 => digit(7),
        Digit8 => digit(8),
        Digit9 => digit(9),

        //--- Letters ------------------------------------------------------

        KeyA => letter(0),
        KeyB => letter(1),
        KeyC => letter(2),
        KeyD => letter(3),
        KeyE => letter(4),
        KeyF => letter(5),
        KeyG => letter(6),
        KeyH => letter(7),
        KeyI => letter(8),
        KeyJ => letter(9),
        KeyK => letter(10),
        KeyL => letter(11),
        KeyM => letter(12),
        KeyN => letter(13),
        KeyO => letter(14),
        KeyP => letter(15),
        KeyQ => letter(16),
        KeyR => letter(17),
        KeyS => letter(18),
        KeyT => letter(19),
        KeyU => letter(20),
        KeyV => letter(21),
        KeyW => letter(22),
        KeyX => letter(23),
        KeyY => letter(24),
        KeyZ => letter(25),

        //--- Arrows -------------------------------------------------------

        ArrowUp => PlatformKey::DPAD_UP,
        ArrowDown => PlatformKey::DPAD_DOWN,
        ArrowLeft => PlatformKey::DPAD_LEFT,
        ArrowRight => PlatformKey::DPAD_RIGHT,

        //--- Special ------------------------------------------------------

        Space => PlatformKey::SPACE,
        Enter => PlatformKey::ENTER,
        Escape => PlatformKey::ESCAPE,
        Tab => PlatformKey::TAB,
        Backspace => PlatformKey::DEL,
        Delete => PlatformKey::FORWARD_DEL,
        ContextMenu => PlatformKey::MENU,
        BrowserBack => PlatformKey::BACK,

        _ => return None,
    };

    Some(key)
}

const fn digit(n: i32) -> PlatformKey {
    PlatformKey(PlatformKey::DIGIT_0.0 + n)
}

const fn letter(n: i32) -> PlatformKey {
    PlatformKey(PlatformKey::KEY_A.0 + n)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_digits_use_android_codes() {
        assert_eq!(platform_key(PhysicalKey::Code(WinitKeyCode::KeyA)), Some(PlatformKey::KEY_A));
        assert_eq!(platform_key(PhysicalKey::Code(WinitKeyCode::KeyZ)), Some(PlatformKey::KEY_Z));
        assert_eq!(platform_key(PhysicalKey::Code(WinitKeyCode::Digit0)), Some(PlatformKey::DIGIT_0));
        assert_eq!(platform_key(PhysicalKey::Code(WinitKeyCode::Digit9)), Some(PlatformKey::DIGIT_9));
    }

    #[test]
    fn arrows_map_to_dpad() {
        assert_eq!(
            platform_key(PhysicalKey::Code(WinitKeyCode::ArrowLeft)),
            Some(PlatformKey::DPAD_LEFT)
        );
        assert_eq!(
            platform_key(PhysicalKey::Code(WinitKeyCode::ArrowDown)),
            Some(PlatformKey::DPAD_DOWN)
        );
    }

    #[test]
    fn editing_keys() {
        assert_eq!(platform_key(PhysicalKey::Code(WinitKeyCode::Backspace)), Some(PlatformKey::DEL));
        assert_eq!(
            platform_key(PhysicalKey::Code(WinitKeyCode::Delete)),
            Some(PlatformKey::FORWARD_DEL)
        );
    }

    #[test]
    fn android_native_codes_pass_through() {
        // AKEYCODE_VOLUME_UP
        let key = PhysicalKey::Unidentified(NativeKeyCode::Android(24));
        assert_eq!(platform_key(key), Some(PlatformKey(24)));
    }

    #[test]
    fn unmapped_keys_are_filtered() {
        assert_eq!(platform_key(PhysicalKey::Code(WinitKeyCode::F13)), None);
        assert_eq!(platform_key(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)), None);
    }

    #[test]
    fn press_and_release() {
        let processor = InputProcessor::new();

        let down = processor.process_key(PhysicalKey::Code(WinitKeyCode::Space), ElementState::Pressed);
        let up = processor.process_key(PhysicalKey::Code(WinitKeyCode::Space), ElementState::Released);

        assert_eq!(down, Some(KeyInput { key: PlatformKey::SPACE, pressed: true }));
        assert_eq!(up, Some(KeyInput { key: PlatformKey::SPACE, pressed: false }));
    }
}
