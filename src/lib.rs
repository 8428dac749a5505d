//=========================================================================
// Linderdaum Bridge: Library Root
//
// Platform shim between an operating system and the Linderdaum Engine.
//
// Responsibilities:
// - Deploy the packaged asset bundle into writable storage on startup
// - Translate multi-touch gestures and keys into engine notifications
// - Forward lifecycle, surface and sensor events to the native engine
// - Keep the window and event loop (`platform`) out of the public API
//
// Typical usage:
// ```no_run
// use linderdaum_bridge::prelude::*;
//
// fn main() -> Result<(), BridgeError> {
//     linderdaum_bridge::logging::init(log::LevelFilter::Info);
//
//     let (bridge, _engine_calls) = BridgeBuilder::new()
//         .with_unpack_resources(true)
//         .build_channeled(KeyTable::android_defaults());
//
//     bridge.run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent pieces: deployment, input
// translation, the native sink, sensors and storage layout.
//
pub mod core;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` holds the Winit integration and is reached through
// `Bridge::run`.
//
mod bridge;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use bridge::{Bridge, BridgeBuilder, BridgeError, LifecycleState};
pub use platform::{BridgeEvent, PlatformError};
