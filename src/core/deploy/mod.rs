//=========================================================================
// Asset Deployment
//
// Mirrors the packaged asset bundle into writable storage before the
// engine starts.
//
// Responsibilities:
// - Abstract the read-only bundle behind `AssetSource`
// - Copy bundle subtrees, skipping files already deployed since install
// - Run deployment off the main thread with cancellation and a single
//   completion callback
//
//=========================================================================

//=== Submodules ==========================================================

pub mod asset_source;
pub mod deployer;
pub mod task;

//=== Public API ==========================================================

pub use asset_source::{AssetSource, DirAssetSource};
pub use deployer::{DeployFailure, DeployReport, Deployer};
pub use task::{DeployError, DeployJob, DeployOutcome, DeployTask};
