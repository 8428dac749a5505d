//=========================================================================
// Linderdaum Bridge
//
// Platform context shared by the asset deployer, the input translators
// and the native engine.
//
// Architecture:
// ```text
//     BridgeBuilder  ──build(sink)──>  Bridge<S>  ──start()──>  DeployJob
//         │                              │
//         ├─ with_storage()              ├─ on_deploy_finished()
//         ├─ with_assets()               ├─ on_surface_* / on_frame
//         ├─ with_locale()               ├─ on_touch / on_key_*
//         └─ with_deploy_roots() ...     └─ shutdown()
// ```
//
// Lifecycle:
// ```text
//   Created ──start()──> Deploying ──deploy finished──> Running <──> Paused
//      │                    │                              │          │
//      └────────────────────┴──────────shutdown()──────────┴──────────┴──> Exited
// ```
//
// The engine view exists from the moment deployment finishes. Until then
// surface, frame, pause and input notifications are not forwarded.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::deploy::{AssetSource, DeployError, DeployJob, DeployOutcome, Deployer, DirAssetSource};
use crate::core::input::{MotionSource, PlatformKey, KeyTranslator, TouchResponse, TouchTranslator};
use crate::core::native::{CallCollector, ChannelSink, Dpi, KeyTable, NativeSink};
use crate::core::sensors::{GpsFix, NullSensorProvider, SensorHub, SensorKind, SensorProvider};
use crate::core::storage::{uri_path, StorageLayout};

//=== BridgeError =========================================================

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Storage directories could not be created.
    #[error("cannot prepare storage at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `start()` was called more than once.
    #[error("bridge already started")]
    AlreadyStarted,

    /// The deploy worker thread could not be spawned.
    #[error("cannot spawn deploy worker: {0}")]
    DeployWorker(#[source] io::Error),

    /// The platform event loop failed.
    #[error(transparent)]
    Platform(#[from] crate::platform::PlatformError),
}

//=== LifecycleState ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Built, nothing sent to the engine yet.
    Created,
    /// Assets are being deployed; the engine view does not exist.
    Deploying,
    Running,
    Paused,
    Exited,
}

impl LifecycleState {
    /// The engine view exists (deployment finished, not exited).
    pub fn has_view(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

//=== BridgeBuilder =======================================================

/// Builder for configuring and constructing a [`Bridge`].
///
/// # Default Values
///
/// - **Storage**: `linderdaum` under the user's local data directory
/// - **Assets**: `./assets`
/// - **Locale**: `"en"`
/// - **Unpack resources**: `false`
/// - **Deploy roots**: `CommonMedia.tar`, `Data`
/// - **Channel capacity**: 1024 calls
///
/// # Examples
///
/// ```no_run
/// use linderdaum_bridge::prelude::*;
///
/// let bridge = BridgeBuilder::new()
///     .with_storage(StorageLayout::at("/tmp/linderdaum"))
///     .with_assets(DirAssetSource::new("assets"))
///     .with_unpack_resources(true)
///     .build(RecordingSink::with_keys(KeyTable::android_defaults()));
///
/// assert_eq!(bridge.state(), LifecycleState::Created);
/// ```
pub struct BridgeBuilder {
    storage: Option<StorageLayout>,
    assets: Option<Box<dyn AssetSource + Send>>,
    apk_path: PathBuf,
    locale: String,
    license_key: Option<String>,
    launch_uri: Option<String>,
    unpack_resources: bool,
    deploy_roots: Vec<String>,
    channel_capacity: usize,
    sensor_provider: Option<Box<dyn SensorProvider + Send>>,
}

impl BridgeBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            storage: None,
            assets: None,
            apk_path: PathBuf::new(),
            locale: "en".into(),
            license_key: None,
            launch_uri: None,
            unpack_resources: false,
            deploy_roots: vec!["CommonMedia.tar".into(), "Data".into()],
            channel_capacity: ChannelSink::DEFAULT_CAPACITY,
            sensor_provider: None,
        }
    }

    /// Sets where the engine cache and files live.
    pub fn with_storage(mut self, layout: StorageLayout) -> Self {
        self.storage = Some(layout);
        self
    }

    /// Sets the packaged asset bundle.
    pub fn with_assets(mut self, assets: impl AssetSource + Send + 'static) -> Self {
        self.assets = Some(Box::new(assets));
        self
    }

    /// Sets the application package path.
    ///
    /// Its modification time is the install time deployed files are
    /// compared against; it is also reported to the engine.
    pub fn with_apk_path(mut self, apk_path: impl Into<PathBuf>) -> Self {
        self.apk_path = apk_path.into();
        self
    }

    /// Sets the language code reported to the engine.
    ///
    /// Default: `"en"`
    ///
    /// # Panics
    ///
    /// Panics if `locale` is empty.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        assert!(!locale.is_empty(), "Locale must not be empty");
        self.locale = locale;
        self
    }

    pub fn with_license_key(mut self, key: impl Into<String>) -> Self {
        self.license_key = Some(key.into());
        self
    }

    /// Sets the URI the application was launched with.
    pub fn with_launch_uri(mut self, uri: impl Into<String>) -> Self {
        self.launch_uri = Some(uri.into());
        self
    }

    /// Enables copying the asset bundle on start.
    ///
    /// Default: `false`
    pub fn with_unpack_resources(mut self, unpack: bool) -> Self {
        self.unpack_resources = unpack;
        self
    }

    /// Sets the bundle paths deployed on start, in order.
    pub fn with_deploy_roots<I, R>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.deploy_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the capacity of the channel built by [`BridgeBuilder::build_channeled`].
    ///
    /// Default: 1024
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn with_sensor_provider(mut self, provider: impl SensorProvider + Send + 'static) -> Self {
        self.sensor_provider = Some(Box::new(provider));
        self
    }

    /// Builds a bridge notifying `sink`.
    pub fn build<S: NativeSink>(self, sink: S) -> Bridge<S> {
        let storage = self.storage.unwrap_or_else(default_storage);
        let assets = self
            .assets
            .unwrap_or_else(|| Box::new(DirAssetSource::new("assets")));
        let sensors = match self.sensor_provider {
            Some(provider) => SensorHub::new(provider),
            None => SensorHub::new(Box::new(NullSensorProvider)),
        };

        info!(
            target: "bridge::native",
            "Building bridge (storage: {}, locale: {}, unpack: {})",
            storage.prefix().display(),
            self.locale,
            self.unpack_resources
        );

        Bridge {
            sink,
            storage,
            assets: Some(assets),
            apk_path: self.apk_path,
            locale: self.locale,
            license_key: self.license_key,
            launch_uri: self.launch_uri,
            unpack_resources: self.unpack_resources,
            deploy_roots: self.deploy_roots,
            touch: TouchTranslator::new(),
            keys: KeyTranslator::new(),
            sensors,
            state: LifecycleState::Created,
        }
    }

    /// Builds a bridge whose notifications go through a bounded channel.
    ///
    /// The returned collector is the engine's end of the channel.
    pub fn build_channeled(self, keys: KeyTable) -> (Bridge<ChannelSink>, CallCollector) {
        let (sink, collector) = ChannelSink::bounded(self.channel_capacity, keys);
        (self.build(sink), collector)
    }
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_storage() -> StorageLayout {
    let root = dirs::data_local_dir().unwrap_or_else(env::temp_dir);
    StorageLayout::at(root.join("linderdaum"))
}

//=== Bridge ==============================================================

/// Platform context around one native engine instance.
///
/// Create via [`BridgeBuilder`]. Every platform callback goes through one
/// of the `on_*` methods, which decide from the [`LifecycleState`] whether
/// the engine hears about it.
pub struct Bridge<S: NativeSink> {
    sink: S,
    storage: StorageLayout,
    assets: Option<Box<dyn AssetSource + Send>>,
    apk_path: PathBuf,
    locale: String,
    license_key: Option<String>,
    launch_uri: Option<String>,
    unpack_resources: bool,
    deploy_roots: Vec<String>,
    touch: TouchTranslator,
    keys: KeyTranslator,
    sensors: SensorHub,
    state: LifecycleState,
}

impl<S: NativeSink> Bridge<S> {
    //--- Startup ----------------------------------------------------------

    /// Prepares storage and hands out the deployment to run.
    ///
    /// Sends the license key (when configured) and the launch command line.
    ///
    /// # Errors
    ///
    /// [`BridgeError::AlreadyStarted`] on a second call, or
    /// [`BridgeError::Storage`] if the storage directories cannot be created.
    pub fn start(&mut self) -> Result<DeployJob, BridgeError> {
        if self.state != LifecycleState::Created {
            return Err(BridgeError::AlreadyStarted);
        }
        self.storage.create_dirs().map_err(|source| BridgeError::Storage {
            path: self.storage.prefix().to_path_buf(),
            source,
        })?;
        let assets = self.assets.take().ok_or(BridgeError::AlreadyStarted)?;

        if let Some(key) = &self.license_key {
            self.sink.set_key(key);
        }
        let command_line = uri_path(self.launch_uri.as_deref());
        debug!(target: "bridge::native", "Command line: {:?}", command_line);
        self.sink.set_command_line(&command_line);

        self.state = LifecycleState::Deploying;

        let deployer = Deployer::for_package(assets, &self.apk_path);
        Ok(DeployJob::new(deployer, self.storage.files_dir(), self.deploy_roots.clone())
            .with_unpack(self.unpack_resources))
    }

    /// Completes startup once the deploy task reports back.
    ///
    /// Failed entries are logged and the engine starts anyway. A cancelled
    /// deployment leaves the engine untouched.
    pub fn on_deploy_finished(&mut self, outcome: &DeployOutcome) {
        if self.state != LifecycleState::Deploying {
            debug!(target: "bridge::deploy", "Deploy outcome ignored in state {:?}", self.state);
            return;
        }

        match outcome {
            Ok(report) => {
                info!(
                    target: "bridge::deploy",
                    "Assets deployed ({} copied, {} skipped)",
                    report.copied,
                    report.skipped
                );
            }
            Err(DeployError::Cancelled(_)) => {
                info!(target: "bridge::deploy", "Deployment cancelled");
                return;
            }
            Err(DeployError::EntriesFailed(report)) => {
                for failure in &report.failures {
                    warn!(
                        target: "bridge::deploy",
                        "Not deployed: {} ({})",
                        failure.path,
                        failure.message
                    );
                }
            }
            Err(e @ DeployError::WorkerPanicked) => {
                error!(target: "bridge::deploy", "{}", e);
            }
        }

        self.sink.set_dirs(&self.storage.cache_dir(), &self.storage.files_dir());
        self.sink.set_apk_path(&self.apk_path);
        self.sink.set_locale(&self.locale);

        self.state = LifecycleState::Running;
        info!(target: "bridge::native", "Engine view ready");
    }

    //--- Surface ----------------------------------------------------------

    pub fn on_surface_created(&mut self) {
        if self.state.has_view() {
            self.sink.surface_created();
        }
    }

    pub fn on_surface_changed(&mut self, width: u32, height: u32, dpi: Dpi) {
        if self.state.has_view() {
            debug!(target: "bridge::native", "Surface {}x{} @ {:?}", width, height, dpi);
            self.sink.surface_changed(width, height, dpi);
        }
    }

    /// Renders one frame. Returns whether a step was sent.
    pub fn on_frame(&mut self) -> bool {
        if self.state != LifecycleState::Running {
            return false;
        }
        self.sink.step();
        true
    }

    //--- Activity ---------------------------------------------------------

    pub fn on_pause(&mut self) {
        if self.state == LifecycleState::Running {
            self.sink.pause();
            self.state = LifecycleState::Paused;
        }
    }

    pub fn on_resume(&mut self) {
        if self.state == LifecycleState::Paused {
            self.sink.resume();
            self.state = LifecycleState::Running;
        }
    }

    /// Stops sensors and tells the engine to exit. Idempotent.
    pub fn shutdown(&mut self) {
        if self.state == LifecycleState::Exited {
            return;
        }

        info!(target: "bridge::native", "Shutting down from {:?}", self.state);
        self.sensors.disable_all(&mut self.sink);
        self.sink.exit();
        self.state = LifecycleState::Exited;
    }

    //--- Input ------------------------------------------------------------

    pub fn on_touch<M: MotionSource + ?Sized>(&mut self, gesture: &M) -> TouchResponse {
        if !self.state.has_view() {
            return TouchResponse { handled: false };
        }
        self.touch.translate(gesture, &mut self.sink)
    }

    /// Returns `true` when the engine consumed the key.
    pub fn on_key_down(&mut self, key: PlatformKey) -> bool {
        self.state.has_view() && self.keys.key_down(key, &mut self.sink)
    }

    /// Returns `true` when the engine consumed the key.
    pub fn on_key_up(&mut self, key: PlatformKey) -> bool {
        self.state.has_view() && self.keys.key_up(key, &mut self.sink)
    }

    pub fn on_menu_selected(&mut self, menu_id: i32) {
        self.sink.send_menu(menu_id);
    }

    /// Result of an image picker; `None` when nothing was picked.
    pub fn on_image_picked(&mut self, uri: Option<&str>) {
        self.sink.send_selected_image(&uri_path(uri));
    }

    //--- Sensors ----------------------------------------------------------

    pub fn enable_sensor(&mut self, kind: SensorKind, active: bool) {
        self.sensors.enable(kind, active, &mut self.sink);
    }

    pub fn on_accelerometer(&mut self, values: [f32; 3]) {
        self.sensors.on_accelerometer(values, &mut self.sink);
    }

    pub fn on_gyroscope(&mut self, values: [f32; 3]) {
        self.sensors.on_gyroscope(values, &mut self.sink);
    }

    pub fn on_location(&mut self, fix: GpsFix) {
        self.sensors.on_location(fix, &mut self.sink);
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn storage(&self) -> &StorageLayout {
        &self.storage
    }

    pub fn apk_path(&self) -> &Path {
        &self.apk_path
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn touch_translator(&self) -> &TouchTranslator {
        &self.touch
    }
}

//=== Execution ===========================================================

impl<S: NativeSink + 'static> Bridge<S> {
    /// Starts the bridge and runs it on a desktop window until it closes.
    ///
    /// Deployment runs in the background; the engine view appears once it
    /// finishes.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if startup fails or the event loop cannot
    /// be created or run.
    pub fn run(mut self) -> Result<(), BridgeError> {
        let job = self.start()?;
        crate::platform::run(self, job)
    }

    /// Like [`Bridge::run`], inside an Android native activity.
    #[cfg(target_os = "android")]
    pub fn run_android(
        mut self,
        app: winit::platform::android::activity::AndroidApp,
    ) -> Result<(), BridgeError> {
        let job = self.start()?;
        crate::platform::run_android(self, job, app)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
