//=========================================================================
// Input Translation
//
// Turns platform input into engine notifications.
//
// Responsibilities:
// - Represent touch gestures and key codes in a platform-neutral way
// - Translate multi-touch gestures into the per-pointer motion stream
// - Forward mapped keys and defer unmapped ones to the platform
//
// Notes:
// Both translators write to a `NativeSink` passed in by the caller, so
// they hold no reference to the engine and can be driven by any
// platform backend or by tests.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod gesture;
pub mod key_translator;
pub mod touch_translator;

//=== Public API ==========================================================

pub use event::{EngineKey, Motion, MotionKind, Pointer, PointerId, PlatformKey, TouchAction};
pub use gesture::{MotionSource, PointerIndexError, TouchGesture};
pub use key_translator::KeyTranslator;
pub use touch_translator::{TouchResponse, TouchTranslator};
