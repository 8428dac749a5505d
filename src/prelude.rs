//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use linderdaum_bridge::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Bridge context
pub use crate::{Bridge, BridgeBuilder, BridgeError, LifecycleState};

// Asset deployment
pub use crate::core::deploy::{AssetSource, DeployError, DeployJob, DeployOutcome, DeployReport, DeployTask, Deployer, DirAssetSource};

// Input translation
pub use crate::core::input::{EngineKey, MotionSource, PlatformKey, Pointer, TouchAction, TouchGesture, TouchTranslator};

// Native engine
pub use crate::core::native::{CallCollector, ChannelSink, Dpi, KeyTable, NativeCall, NativeSink, RecordingSink, TickControl};

// Sensors and storage
pub use crate::core::sensors::{GpsFix, SensorKind, SensorProvider};
pub use crate::core::storage::StorageLayout;
