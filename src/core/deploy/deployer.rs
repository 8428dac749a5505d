//=========================================================================
// Asset Deployer
//=========================================================================
//
// Mirrors a subtree of the read-only bundle into writable storage.
//
// Algorithm (per relative path):
// ```text
//   list(path)
//     ├─ non-empty → mkdir -p target/path, recurse into path/child
//     └─ empty / error → leaf:
//          target/path newer than install time? → skip
//          otherwise → stream copy through a buffered writer
// ```
//
// Listing errors are logged and fall through to the leaf branch. Copy
// errors are logged and recorded in the report; the remaining entries are
// still deployed. Nothing is retried.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::asset_source::AssetSource;

//=== DeployReport ========================================================

/// One entry that could not be deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployFailure {
    pub path: String,
    pub kind: io::ErrorKind,
    pub message: String,
}

/// Summary of a deployment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub directories: usize,
    pub copied: usize,
    pub skipped: usize,
    pub cancelled: bool,
    pub failures: Vec<DeployFailure>,
}

impl DeployReport {
    /// Leaf entries visited (copied, skipped or failed).
    pub fn entries(&self) -> usize {
        self.copied + self.skipped + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        !self.cancelled && self.failures.is_empty()
    }

    pub fn merge(&mut self, other: DeployReport) {
        self.directories += other.directories;
        self.copied += other.copied;
        self.skipped += other.skipped;
        self.cancelled |= other.cancelled;
        self.failures.extend(other.failures);
    }

    fn record_failure(&mut self, path: &str, error: &io::Error) {
        self.failures.push(DeployFailure {
            path: path.to_owned(),
            kind: error.kind(),
            message: error.to_string(),
        });
    }
}

//=== Deployer ============================================================

/// Copies bundle subtrees, skipping files deployed after installation.
pub struct Deployer<A> {
    source: A,
    install_time: SystemTime,
}

impl<A: AssetSource> Deployer<A> {
    const BUFFERED_STREAM_SIZE: usize = 256_000;

    //--- Construction -----------------------------------------------------

    pub fn new(source: A, install_time: SystemTime) -> Self {
        Self { source, install_time }
    }

    /// Uses the package archive's modification time as the install time.
    ///
    /// A missing or unreadable archive yields the UNIX epoch, so every
    /// asset is copied.
    pub fn for_package(source: A, package_path: &Path) -> Self {
        let install_time = fs::metadata(package_path)
            .and_then(|meta| meta.modified())
            .unwrap_or_else(|e| {
                warn!(
                    target: "bridge::deploy",
                    "No install time for {}: {}",
                    package_path.display(),
                    e
                );
                SystemTime::UNIX_EPOCH
            });

        Self::new(source, install_time)
    }

    pub fn install_time(&self) -> SystemTime {
        self.install_time
    }

    //--- Deployment -------------------------------------------------------

    /// Deploys `root` (a bundle-relative path) under `target_dir`.
    pub fn deploy(&self, target_dir: &Path, root: &str) -> DeployReport {
        self.deploy_until(target_dir, root, &AtomicBool::new(false))
    }

    /// Like [`Deployer::deploy`], stopping before the next entry once
    /// `cancel` is set.
    pub fn deploy_until(&self, target_dir: &Path, root: &str, cancel: &AtomicBool) -> DeployReport {
        let mut report = DeployReport::default();
        self.copy_assets(target_dir, root, cancel, &mut report);
        report
    }

    //--- Internal Helpers -------------------------------------------------

    fn copy_assets(&self, target_dir: &Path, root: &str, cancel: &AtomicBool, report: &mut DeployReport) {
        if cancel.load(Ordering::Relaxed) {
            report.cancelled = true;
            return;
        }

        let children = self.source.list(root).unwrap_or_else(|e| {
            warn!(target: "bridge::deploy", "Cannot list {:?}: {}", root, e);
            Vec::new()
        });

        if children.is_empty() {
            self.copy_leaf(target_dir, root, report);
            return;
        }

        debug!(target: "bridge::deploy", "Processing folder {}", root);

        let dir = target_dir.join(root);
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!(target: "bridge::deploy", "Cannot create {}: {}", dir.display(), e);
        }
        report.directories += 1;

        for child in children {
            let path = if root.is_empty() {
                child
            } else {
                format!("{root}/{child}")
            };
            self.copy_assets(target_dir, &path, cancel, report);
            if report.cancelled {
                return;
            }
        }
    }

    fn copy_leaf(&self, target_dir: &Path, asset: &str, report: &mut DeployReport) {
        let target = target_dir.join(asset);

        if self.is_deployed(&target) {
            debug!(target: "bridge::deploy", "Skipping {}", asset);
            report.skipped += 1;
            return;
        }

        debug!(target: "bridge::deploy", "Copying {} to {}", asset, target.display());

        match self.copy_file(asset, &target) {
            Ok(bytes) => {
                debug!(target: "bridge::deploy", "Copied {} ({} bytes)", asset, bytes);
                report.copied += 1;
            }
            Err(e) => {
                warn!(target: "bridge::deploy", "Failed to copy {}: {}", asset, e);
                report.record_failure(asset, &e);
            }
        }
    }

    /// Destination exists and is strictly newer than the install time.
    fn is_deployed(&self, target: &Path) -> bool {
        fs::metadata(target)
            .and_then(|meta| meta.modified())
            .map(|modified| modified > self.install_time)
            .unwrap_or(false)
    }

    /// Streams `asset` into `target`.
    ///
    /// An existing `target` is only touched once the asset is open. If the
    /// copy fails after that, the partial file is removed so it does not
    /// pass for a deployed one on the next run.
    fn copy_file(&self, asset: &str, target: &Path) -> io::Result<u64> {
        let mut input = self.source.open(asset)?;
        let mut output = BufWriter::with_capacity(Self::BUFFERED_STREAM_SIZE, File::create(target)?);

        let copied = io::copy(&mut input, &mut output).and_then(|bytes| {
            output.flush()?;
            Ok(bytes)
        });

        if copied.is_err() {
            drop(output);
            if let Err(e) = fs::remove_file(target) {
                warn!(
                    target: "bridge::deploy",
                    "Cannot remove partial {}: {}",
                    target.display(),
                    e
                );
            }
        }

        copied
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deploy::DirAssetSource;
    use std::io::Read;
    use std::time::Duration;
    use tempfile::TempDir;

    fn an_hour_ago() -> SystemTime {
        SystemTime::now() - Duration::from_secs(3600)
    }

    fn bundle() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("Data");
        fs::create_dir_all(data.join("Shaders/GLSL")).unwrap();
        fs::write(data.join("config.cfg"), b"width=800\n").unwrap();
        fs::write(data.join("Shaders/basic.sp"), b"shader program").unwrap();
        fs::write(data.join("Shaders/GLSL/common.h"), vec![7u8; 300_000]).unwrap();
        fs::write(dir.path().join("CommonMedia.tar"), b"tarball").unwrap();
        dir
    }

    /// Source whose listing always fails.
    struct BrokenListing(DirAssetSource);

    impl AssetSource for BrokenListing {
        fn list(&self, _path: &str) -> io::Result<Vec<String>> {
            Err(io::Error::new(io::ErrorKind::Other, "listing unavailable"))
        }

        fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
            self.0.open(path)
        }
    }

    //=====================================================================
    // Copying
    //=====================================================================

    #[test]
    fn mirrors_directory_tree_with_identical_contents() {
        let bundle = bundle();
        let target = tempfile::tempdir().unwrap();
        let deployer = Deployer::new(DirAssetSource::new(bundle.path()), an_hour_ago());

        let report = deployer.deploy(target.path(), "Data");

        assert_eq!(report.copied, 3);
        assert_eq!(report.directories, 3);
        assert!(report.is_clean());
        for file in ["config.cfg", "Shaders/basic.sp", "Shaders/GLSL/common.h"] {
            assert_eq!(
                fs::read(target.path().join("Data").join(file)).unwrap(),
                fs::read(bundle.path().join("Data").join(file)).unwrap(),
                "{file} differs"
            );
        }
    }

    #[test]
    fn top_level_leaf_is_copied() {
        let bundle = bundle();
        let target = tempfile::tempdir().unwrap();
        let deployer = Deployer::new(DirAssetSource::new(bundle.path()), an_hour_ago());

        let report = deployer.deploy(target.path(), "CommonMedia.tar");

        assert_eq!(report.copied, 1);
        assert_eq!(report.directories, 0);
        assert_eq!(fs::read(target.path().join("CommonMedia.tar")).unwrap(), b"tarball");
    }

    #[test]
    fn second_run_copies_nothing() {
        let bundle = bundle();
        let target = tempfile::tempdir().unwrap();
        let deployer = Deployer::new(DirAssetSource::new(bundle.path()), an_hour_ago());

        deployer.deploy(target.path(), "Data");
        let second = deployer.deploy(target.path(), "Data");

        assert_eq!(second.copied, 0);
        assert_eq!(second.skipped, 3);
    }

    #[test]
    fn stale_destination_is_overwritten() {
        let bundle = bundle();
        let target = tempfile::tempdir().unwrap();
        let stale = target.path().join("CommonMedia.tar");
        fs::write(&stale, b"old").unwrap();
        File::options()
            .write(true)
            .open(&stale)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(7200))
            .unwrap();

        let deployer = Deployer::new(DirAssetSource::new(bundle.path()), an_hour_ago());
        let report = deployer.deploy(target.path(), "CommonMedia.tar");

        assert_eq!(report.copied, 1);
        assert_eq!(fs::read(&stale).unwrap(), b"tarball");
    }

    //=====================================================================
    // Failures
    //=====================================================================

    #[test]
    fn failed_entry_does_not_abort_others() {
        let bundle = bundle();
        // Empty directory lists as a leaf and cannot be copied as a file
        fs::create_dir_all(bundle.path().join("Data/Empty")).unwrap();
        let target = tempfile::tempdir().unwrap();
        let deployer = Deployer::new(DirAssetSource::new(bundle.path()), an_hour_ago());

        let report = deployer.deploy(target.path(), "Data");

        assert_eq!(report.copied, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "Data/Empty");
        assert!(!report.is_clean());
    }

    #[test]
    fn listing_error_falls_through_to_leaf_copy() {
        let bundle = bundle();
        let target = tempfile::tempdir().unwrap();
        let deployer = Deployer::new(BrokenListing(DirAssetSource::new(bundle.path())), an_hour_ago());

        let report = deployer.deploy(target.path(), "CommonMedia.tar");

        assert_eq!(report.copied, 1);
    }

    #[test]
    fn missing_asset_is_recorded() {
        let bundle = bundle();
        let target = tempfile::tempdir().unwrap();
        let deployer = Deployer::new(DirAssetSource::new(bundle.path()), an_hour_ago());

        let report = deployer.deploy(target.path(), "Missing.bin");

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, io::ErrorKind::NotFound);
        assert!(!target.path().join("Missing.bin").exists());
    }

    #[test]
    fn unreadable_asset_keeps_stale_destination() {
        let bundle = bundle();
        let target = tempfile::tempdir().unwrap();
        let stale = target.path().join("Missing.bin");
        fs::write(&stale, b"previous build").unwrap();
        File::options()
            .write(true)
            .open(&stale)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(7200))
            .unwrap();

        let deployer = Deployer::new(DirAssetSource::new(bundle.path()), an_hour_ago());
        let report = deployer.deploy(target.path(), "Missing.bin");

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, io::ErrorKind::NotFound);
        assert_eq!(fs::read(&stale).unwrap(), b"previous build");
    }

    //=====================================================================
    // Cancellation & Install Time
    //=====================================================================

    #[test]
    fn cancelled_flag_stops_before_first_entry() {
        let bundle = bundle();
        let target = tempfile::tempdir().unwrap();
        let deployer = Deployer::new(DirAssetSource::new(bundle.path()), an_hour_ago());

        let report = deployer.deploy_until(target.path(), "Data", &AtomicBool::new(true));

        assert!(report.cancelled);
        assert_eq!(report.entries(), 0);
    }

    #[test]
    fn missing_package_means_epoch_install_time() {
        let bundle = bundle();
        let deployer = Deployer::for_package(
            DirAssetSource::new(bundle.path()),
            &bundle.path().join("no-such.apk"),
        );

        assert_eq!(deployer.install_time(), SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn package_mtime_is_install_time() {
        let bundle = bundle();
        let apk = bundle.path().join("CommonMedia.tar");
        let deployer = Deployer::for_package(DirAssetSource::new(bundle.path()), &apk);

        assert_eq!(
            deployer.install_time(),
            fs::metadata(&apk).unwrap().modified().unwrap()
        );
    }

    #[test]
    fn report_merge_accumulates() {
        let mut total = DeployReport { copied: 1, ..Default::default() };
        total.merge(DeployReport { skipped: 2, cancelled: true, ..Default::default() });

        assert_eq!(total.entries(), 3);
        assert!(total.cancelled);
    }
}
