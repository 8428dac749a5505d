//=========================================================================
// Deploy Task
//=========================================================================
//
// Runs asset deployment on a dedicated background thread.
//
// Lifecycle:
// ```text
//   DeployTask::spawn(job, on_complete)
//        │
//        ├─ worker: job.run(cancel flag) → DeployOutcome
//        │            └─ on_complete(outcome)   (exactly once)
//        │
//        └─ owner: cancel() / is_finished() / join()
// ```
//
// The completion callback is the single hand-off back to the owner; on
// the platform runner it posts a user event onto the main event loop.
// Per-entry failures never stop the worker, but they are surfaced in the
// outcome instead of being swallowed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{error, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::asset_source::AssetSource;
use super::deployer::{DeployReport, Deployer};

//=== DeployError =========================================================

/// Deployment did not complete cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    /// Cancelled before every entry was visited.
    #[error("deployment cancelled after {} entries", .0.entries())]
    Cancelled(DeployReport),

    /// Finished, but some entries could not be deployed.
    #[error("{} of {} entries failed to deploy", .0.failures.len(), .0.entries())]
    EntriesFailed(DeployReport),

    /// The worker thread panicked.
    #[error("deploy worker panicked")]
    WorkerPanicked,
}

/// Result delivered to the completion callback.
pub type DeployOutcome = Result<DeployReport, DeployError>;

//=== DeployJob ===========================================================

/// What to deploy, and where.
pub struct DeployJob {
    deployer: Deployer<Box<dyn AssetSource + Send>>,
    target_dir: PathBuf,
    roots: Vec<String>,
    unpack: bool,
}

impl DeployJob {
    pub fn new(
        deployer: Deployer<Box<dyn AssetSource + Send>>,
        target_dir: impl Into<PathBuf>,
        roots: Vec<String>,
    ) -> Self {
        Self {
            deployer,
            target_dir: target_dir.into(),
            roots,
            unpack: true,
        }
    }

    /// When disabled the job completes immediately without copying.
    pub fn with_unpack(mut self, unpack: bool) -> Self {
        self.unpack = unpack;
        self
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Deploys every root in order, honouring `cancel` between entries.
    pub fn run(&self, cancel: &AtomicBool) -> DeployOutcome {
        let mut report = DeployReport::default();

        if !self.unpack {
            info!(target: "bridge::deploy", "Resource unpacking disabled");
            return Ok(report);
        }

        for root in &self.roots {
            report.merge(self.deployer.deploy_until(&self.target_dir, root, cancel));
            if report.cancelled {
                return Err(DeployError::Cancelled(report));
            }
        }

        if report.failures.is_empty() {
            Ok(report)
        } else {
            Err(DeployError::EntriesFailed(report))
        }
    }
}

//=== DeployTask ==========================================================

/// Handle to a running background deployment.
pub struct DeployTask {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl DeployTask {
    /// Spawns the worker thread.
    ///
    /// `on_complete` runs on the worker thread exactly once, including
    /// after cancellation or a worker panic.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be created.
    pub fn spawn<F>(job: DeployJob, on_complete: F) -> io::Result<Self>
    where
        F: FnOnce(DeployOutcome) + Send + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name("asset-deploy".into())
            .spawn(move || {
                let started = Instant::now();

                let outcome = panic::catch_unwind(AssertUnwindSafe(|| job.run(&flag)))
                    .unwrap_or_else(|_| {
                        error!(target: "bridge::deploy", "Deploy worker panicked");
                        Err(DeployError::WorkerPanicked)
                    });

                info!(
                    target: "bridge::deploy",
                    "Deployment finished in {:?}: {}",
                    started.elapsed(),
                    match &outcome {
                        Ok(report) => format!("{} copied, {} skipped", report.copied, report.skipped),
                        Err(e) => e.to_string(),
                    }
                );

                on_complete(outcome);
            })?;

        Ok(Self { cancel, handle })
    }

    /// Requests the worker to stop before its next entry.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the worker to exit.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
