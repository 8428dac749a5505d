//=========================================================================
// Input Event Types
//
// Defines the engine-facing representation of touch and key input.
//
// This module abstracts platform touch records (Android MotionEvent,
// winit Touch) and key codes into small copyable types shared by the
// translators and the native sink.
//
// Responsibilities:
// - Encode/decode Android-style raw touch action codes
// - Identify pointers, including the reserved sentinel ids
// - Describe per-pointer motions sent to the engine (MOVE/UP/DOWN)
// - Wrap platform and engine key codes in distinct newtypes
//
// Event Flow:
// ```text
// Platform Layer (winit / Android)
//         ↓
//    TouchGesture / PlatformKey (this module)
//         ↓
//    TouchTranslator / KeyTranslator
//         ↓
//    Motion / EngineKey → NativeSink
// ```
//
//=========================================================================

//=== Raw Action Codes ====================================================

/// Mask selecting the action kind from a raw action code.
pub const ACTION_MASK: i32 = 0xff;

/// Mask selecting the pointer index from a raw action code.
pub const ACTION_POINTER_INDEX_MASK: i32 = 0xff00;

/// Bit shift of the pointer index inside a raw action code.
pub const ACTION_POINTER_INDEX_SHIFT: i32 = 8;

pub const ACTION_DOWN: i32 = 0;
pub const ACTION_UP: i32 = 1;
pub const ACTION_MOVE: i32 = 2;
pub const ACTION_CANCEL: i32 = 3;
pub const ACTION_OUTSIDE: i32 = 4;
pub const ACTION_POINTER_DOWN: i32 = 5;
pub const ACTION_POINTER_UP: i32 = 6;

//=== PointerId ===========================================================

/// Platform-assigned identity of one contact point.
///
/// Ids are stable for the lifetime of a contact and are reused by the
/// platform once the contact lifts. Negative values are reserved for
/// sentinels understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub i32);

impl PointerId {
    /// Resets transient per-frame touch state inside the engine.
    pub const CLEAR: PointerId = PointerId(-1);

    /// Marks the end of a batch of motions for one notification.
    pub const END_OF_BATCH: PointerId = PointerId(-2);

    pub fn is_sentinel(self) -> bool {
        self.0 < 0
    }
}

//=== Pointer =============================================================

/// One active contact: id plus position in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub fn new(id: i32, x: f32, y: f32) -> Self {
        Self { id: PointerId(id), x, y }
    }

    /// Integer pixel coordinates, truncated toward zero.
    pub fn pixel(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

//=== TouchAction =========================================================

/// Classified action of a gesture notification.
///
/// `PointerDown` / `PointerUp` carry the index (not the id) of the pointer
/// that changed state, as the platform reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchAction {
    /// First pointer touched the surface.
    Down,

    /// Last pointer lifted.
    Up,

    /// One or more pointers moved.
    Move,

    /// The platform aborted the gesture.
    Cancel,

    /// Touch landed outside the window bounds.
    Outside,

    /// An additional pointer touched while others were down.
    PointerDown(usize),

    /// A non-last pointer lifted.
    PointerUp(usize),

    /// Any action code this layer does not interpret (hover, scroll...).
    Other(i32),
}

impl TouchAction {
    /// Decodes a raw Android action code (kind plus pointer index bits).
    pub fn from_raw(raw: i32) -> Self {
        let index = ((raw & ACTION_POINTER_INDEX_MASK) >> ACTION_POINTER_INDEX_SHIFT) as usize;

        match raw & ACTION_MASK {
            ACTION_DOWN => Self::Down,
            ACTION_UP => Self::Up,
            ACTION_MOVE => Self::Move,
            ACTION_CANCEL => Self::Cancel,
            ACTION_OUTSIDE => Self::Outside,
            ACTION_POINTER_DOWN => Self::PointerDown(index),
            ACTION_POINTER_UP => Self::PointerUp(index),
            other => Self::Other(other),
        }
    }

    /// Encodes back into a raw Android action code.
    pub fn to_raw(self) -> i32 {
        let with_index = |code: i32, index: usize| {
            code | (((index as i32) << ACTION_POINTER_INDEX_SHIFT) & ACTION_POINTER_INDEX_MASK)
        };

        match self {
            Self::Down => ACTION_DOWN,
            Self::Up => ACTION_UP,
            Self::Move => ACTION_MOVE,
            Self::Cancel => ACTION_CANCEL,
            Self::Outside => ACTION_OUTSIDE,
            Self::PointerDown(index) => with_index(ACTION_POINTER_DOWN, index),
            Self::PointerUp(index) => with_index(ACTION_POINTER_UP, index),
            Self::Other(code) => code,
        }
    }

    /// Index of the pointer this action refers to (0 for primary actions).
    pub fn action_index(self) -> usize {
        match self {
            Self::PointerDown(index) | Self::PointerUp(index) => index,
            _ => 0,
        }
    }
}

//=== MotionKind ==========================================================

/// Per-pointer transition tag understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MotionKind {
    Move = 0,
    Up = 1,
    Down = 2,
}

impl MotionKind {
    pub fn code(self) -> i32 {
        self as i32
    }
}

//=== Motion ==============================================================

/// A single per-pointer motion notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Motion {
    pub pointer: PointerId,
    pub x: i32,
    pub y: i32,
    pub pressed: bool,
    pub kind: MotionKind,
}

impl Motion {
    /// Sentinel motion resetting engine touch state before a batch.
    pub const fn clear() -> Self {
        Self {
            pointer: PointerId::CLEAR,
            x: 0,
            y: 0,
            pressed: false,
            kind: MotionKind::Move,
        }
    }

    /// Sentinel motion closing a batch.
    pub const fn end_of_batch() -> Self {
        Self {
            pointer: PointerId::END_OF_BATCH,
            x: 0,
            y: 0,
            pressed: false,
            kind: MotionKind::Move,
        }
    }

    /// Sentinel signalling that every pointer has lifted.
    pub const fn all_released() -> Self {
        Self {
            pointer: PointerId::END_OF_BATCH,
            x: 0,
            y: 0,
            pressed: false,
            kind: MotionKind::Up,
        }
    }

    pub fn for_pointer(pointer: &Pointer, pressed: bool, kind: MotionKind) -> Self {
        let (x, y) = pointer.pixel();
        Self { pointer: pointer.id, x, y, pressed, kind }
    }
}

//=== Key Codes ===========================================================

/// Key code as reported by the platform (Android `AKEYCODE_*` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlatformKey(pub i32);

impl PlatformKey {
    pub const BACK: PlatformKey = PlatformKey(4);
    pub const DIGIT_0: PlatformKey = PlatformKey(7);
    pub const DIGIT_9: PlatformKey = PlatformKey(16);
    pub const DPAD_UP: PlatformKey = PlatformKey(19);
    pub const DPAD_DOWN: PlatformKey = PlatformKey(20);
    pub const DPAD_LEFT: PlatformKey = PlatformKey(21);
    pub const DPAD_RIGHT: PlatformKey = PlatformKey(22);
    pub const DPAD_CENTER: PlatformKey = PlatformKey(23);
    pub const KEY_A: PlatformKey = PlatformKey(29);
    pub const KEY_Z: PlatformKey = PlatformKey(54);
    pub const TAB: PlatformKey = PlatformKey(61);
    pub const SPACE: PlatformKey = PlatformKey(62);
    pub const ENTER: PlatformKey = PlatformKey(66);
    pub const DEL: PlatformKey = PlatformKey(67);
    pub const MENU: PlatformKey = PlatformKey(82);
    pub const ESCAPE: PlatformKey = PlatformKey(111);
    pub const FORWARD_DEL: PlatformKey = PlatformKey(112);
}

/// Key code understood by the engine. Zero means "not mapped".
///
/// Engine codes follow the virtual-key numbering used on desktop builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineKey(pub i32);

impl EngineKey {
    pub const UNMAPPED: EngineKey = EngineKey(0);
    pub const LBUTTON: EngineKey = EngineKey(0x01);
    pub const BACKSPACE: EngineKey = EngineKey(0x08);
    pub const TAB: EngineKey = EngineKey(0x09);
    pub const RETURN: EngineKey = EngineKey(0x0D);
    pub const ESCAPE: EngineKey = EngineKey(0x1B);
    pub const SPACE: EngineKey = EngineKey(0x20);
    pub const LEFT: EngineKey = EngineKey(0x25);
    pub const UP: EngineKey = EngineKey(0x26);
    pub const RIGHT: EngineKey = EngineKey(0x27);
    pub const DOWN: EngineKey = EngineKey(0x28);
    pub const DELETE: EngineKey = EngineKey(0x2E);
    pub const DIGIT_0: EngineKey = EngineKey(0x30);
    pub const KEY_A: EngineKey = EngineKey(0x41);
    pub const MENU: EngineKey = EngineKey(0x5D);

    pub fn is_mapped(self) -> bool {
        self != Self::UNMAPPED
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // TouchAction Tests
    //=====================================================================

    #[test]
    fn decodes_primary_actions() {
        assert_eq!(TouchAction::from_raw(0), TouchAction::Down);
        assert_eq!(TouchAction::from_raw(1), TouchAction::Up);
        assert_eq!(TouchAction::from_raw(2), TouchAction::Move);
        assert_eq!(TouchAction::from_raw(3), TouchAction::Cancel);
        assert_eq!(TouchAction::from_raw(4), TouchAction::Outside);
    }

    #[test]
    fn decodes_pointer_index_bits() {
        // ACTION_POINTER_DOWN for the pointer at index 2
        assert_eq!(TouchAction::from_raw(0x0205), TouchAction::PointerDown(2));
        assert_eq!(TouchAction::from_raw(0x0106), TouchAction::PointerUp(1));
    }

    #[test]
    fn unknown_codes_are_preserved() {
        // ACTION_HOVER_MOVE
        assert_eq!(TouchAction::from_raw(7), TouchAction::Other(7));
    }

    #[test]
    fn encodes_pointer_actions_with_index() {
        assert_eq!(TouchAction::PointerUp(3).to_raw(), 0x0306);
        assert_eq!(TouchAction::from_raw(TouchAction::PointerDown(1).to_raw()), TouchAction::PointerDown(1));
    }

    #[test]
    fn action_index_is_zero_for_primary_actions() {
        assert_eq!(TouchAction::Down.action_index(), 0);
        assert_eq!(TouchAction::PointerUp(4).action_index(), 4);
    }

    //=====================================================================
    // Motion Tests
    //=====================================================================

    #[test]
    fn motion_kind_codes_match_engine() {
        assert_eq!(MotionKind::Move.code(), 0);
        assert_eq!(MotionKind::Up.code(), 1);
        assert_eq!(MotionKind::Down.code(), 2);
    }

    #[test]
    fn sentinel_motions_use_reserved_ids() {
        assert!(Motion::clear().pointer.is_sentinel());
        assert_eq!(Motion::clear().pointer, PointerId::CLEAR);
        assert_eq!(Motion::end_of_batch().kind, MotionKind::Move);
        assert_eq!(Motion::all_released().kind, MotionKind::Up);
        assert!(!Motion::all_released().pressed);
    }

    #[test]
    fn pointer_pixels_truncate() {
        let pointer = Pointer::new(3, 10.9, 20.2);
        let motion = Motion::for_pointer(&pointer, true, MotionKind::Down);
        assert_eq!((motion.x, motion.y), (10, 20));
        assert_eq!(motion.pointer, PointerId(3));
    }

    #[test]
    fn unmapped_engine_key_is_zero() {
        assert!(!EngineKey(0).is_mapped());
        assert!(EngineKey::LBUTTON.is_mapped());
    }
}
