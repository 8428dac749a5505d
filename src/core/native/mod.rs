//=========================================================================
// Native Engine Boundary
//=========================================================================
//
// Bridges the platform layer with the native engine.
//
// Everything the bridge tells the engine flows through `NativeSink`, so
// translators and the deployer never depend on a concrete engine binding
// and can be exercised against `RecordingSink`.
//
// Components:
// - `interface`: NativeSink trait, NativeCall message, Dpi
// - `key_table`: platform → engine key lookup
// - `recording`: in-memory sink
// - `channel_sink`: bounded message-passing sink
// - `call_collector`: engine-side per-frame drain
//
//=========================================================================

//=== Module Declarations =================================================

pub mod call_collector;
pub mod channel_sink;
pub mod interface;
pub mod key_table;
pub mod recording;

//=== Public API ==========================================================

pub use call_collector::{CallCollector, TickControl};
pub use channel_sink::ChannelSink;
pub use interface::{Dpi, NativeCall, NativeSink};
pub use key_table::KeyTable;
pub use recording::RecordingSink;
