//=========================================================================
// Core Systems
//
// Platform-independent half of the bridge.
//
// Responsibilities:
// - Deploy the packaged asset bundle into writable storage
// - Translate touch and key input into engine notifications
// - Define the native sink the engine receives notifications through
// - Track motion and location sensors
// - Resolve the engine's storage layout
//
// Notes:
// Nothing here touches a window or an event loop. The platform layer
// feeds these modules and the bridge context ties them together.
//
//=========================================================================

pub mod deploy;
pub mod input;
pub mod native;
pub mod sensors;
pub mod storage;
