//=========================================================================
// Native Sink Interface
//=========================================================================
//
// Bridge-to-engine contract (one-way notifications).
//
// Every call into the native engine is a fire-and-forget notification with
// no acknowledgment. The only value flowing back is the key translation
// lookup. Each notification kind has its own trait method; by default the
// methods package their arguments into a `NativeCall` and hand it to
// `dispatch`, so message-based sinks implement a single method while FFI
// bindings override the typed ones.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{EngineKey, Motion, PlatformKey};
use crate::core::sensors::GpsFix;

//=== Dpi =================================================================

/// Surface density in dots per inch, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dpi {
    pub x: u32,
    pub y: u32,
}

impl Dpi {
    /// Baseline density of a scale factor of 1.0.
    pub const BASELINE: u32 = 160;

    pub fn uniform(dpi: u32) -> Self {
        Self { x: dpi, y: dpi }
    }

    pub fn from_scale_factor(scale_factor: f64) -> Self {
        Self::uniform((scale_factor * Self::BASELINE as f64).round() as u32)
    }
}

//=== NativeCall ==========================================================

/// One notification sent to the native engine.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCall {
    //--- Startup Configuration --------------------------------------------

    /// Writable cache and files directories.
    SetDirs { cache_dir: PathBuf, files_dir: PathBuf },

    /// Installed package archive path.
    SetApkPath(PathBuf),

    SetLocale(String),

    /// License-derived key string.
    SetKey(String),

    /// Command line derived from the launch URI (empty when none).
    SetCommandLine(String),

    //--- Surface & Frame --------------------------------------------------

    SurfaceCreated,

    SurfaceChanged { width: u32, height: u32, dpi: Dpi },

    /// Per-frame render trigger.
    Step,

    Pause,

    Resume,

    //--- Input ------------------------------------------------------------

    Key { key: EngineKey, pressed: bool },

    Motion(Motion),

    /// Absolute cursor position in surface pixels.
    MouseMove { x: i32, y: i32 },

    /// Options menu item selected.
    Menu(i32),

    /// Absolute path of a picked image, or empty when nothing was picked.
    SelectedImage(String),

    //--- Sensors ----------------------------------------------------------

    LinearAcceleration([f32; 3]),

    Velocity([f32; 3]),

    Gps(GpsFix),

    //--- Shutdown ---------------------------------------------------------

    Exit,
}

impl NativeCall {
    /// Per-frame, input and sensor traffic the engine can afford to lose
    /// when it falls behind. Configuration and lifecycle calls are not.
    pub fn is_droppable(&self) -> bool {
        matches!(
            self,
            Self::Step
                | Self::Key { .. }
                | Self::Motion(_)
                | Self::MouseMove { .. }
                | Self::Menu(_)
                | Self::SelectedImage(_)
                | Self::LinearAcceleration(_)
                | Self::Velocity(_)
                | Self::Gps(_)
        )
    }
}

//=== NativeSink ==========================================================

/// One-way notification interface to the native engine.
pub trait NativeSink {
    /// Delivers a packaged notification.
    fn dispatch(&mut self, call: NativeCall);

    /// Maps a platform key code to an engine key.
    ///
    /// [`EngineKey::UNMAPPED`] means the engine does not want the key and
    /// the platform should apply its default handling.
    fn translate_key(&self, key: PlatformKey) -> EngineKey;

    //--- Startup Configuration --------------------------------------------

    fn set_dirs(&mut self, cache_dir: &Path, files_dir: &Path) {
        self.dispatch(NativeCall::SetDirs {
            cache_dir: cache_dir.to_path_buf(),
            files_dir: files_dir.to_path_buf(),
        });
    }

    fn set_apk_path(&mut self, apk_path: &Path) {
        self.dispatch(NativeCall::SetApkPath(apk_path.to_path_buf()));
    }

    fn set_locale(&mut self, locale: &str) {
        self.dispatch(NativeCall::SetLocale(locale.to_owned()));
    }

    fn set_key(&mut self, key: &str) {
        self.dispatch(NativeCall::SetKey(key.to_owned()));
    }

    fn set_command_line(&mut self, command_line: &str) {
        self.dispatch(NativeCall::SetCommandLine(command_line.to_owned()));
    }

    //--- Surface & Frame --------------------------------------------------

    fn surface_created(&mut self) {
        self.dispatch(NativeCall::SurfaceCreated);
    }

    fn surface_changed(&mut self, width: u32, height: u32, dpi: Dpi) {
        self.dispatch(NativeCall::SurfaceChanged { width, height, dpi });
    }

    fn step(&mut self) {
        self.dispatch(NativeCall::Step);
    }

    fn pause(&mut self) {
        self.dispatch(NativeCall::Pause);
    }

    fn resume(&mut self) {
        self.dispatch(NativeCall::Resume);
    }

    //--- Input ------------------------------------------------------------

    fn send_key(&mut self, key: EngineKey, pressed: bool) {
        self.dispatch(NativeCall::Key { key, pressed });
    }

    fn send_motion(&mut self, motion: Motion) {
        self.dispatch(NativeCall::Motion(motion));
    }

    fn move_mouse(&mut self, x: i32, y: i32) {
        self.dispatch(NativeCall::MouseMove { x, y });
    }

    fn send_menu(&mut self, menu_id: i32) {
        self.dispatch(NativeCall::Menu(menu_id));
    }

    fn send_selected_image(&mut self, path: &str) {
        self.dispatch(NativeCall::SelectedImage(path.to_owned()));
    }

    //--- Sensors ----------------------------------------------------------

    fn update_linear_acceleration(&mut self, acceleration: [f32; 3]) {
        self.dispatch(NativeCall::LinearAcceleration(acceleration));
    }

    fn update_velocity(&mut self, velocity: [f32; 3]) {
        self.dispatch(NativeCall::Velocity(velocity));
    }

    fn update_gps(&mut self, fix: GpsFix) {
        self.dispatch(NativeCall::Gps(fix));
    }

    //--- Shutdown ---------------------------------------------------------

    fn exit(&mut self) {
        self.dispatch(NativeCall::Exit);
    }
}

impl<S: NativeSink + ?Sized> NativeSink for Box<S> {
    fn dispatch(&mut self, call: NativeCall) {
        (**self).dispatch(call);
    }

    fn translate_key(&self, key: PlatformKey) -> EngineKey {
        (**self).translate_key(key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
