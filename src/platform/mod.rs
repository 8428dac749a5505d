//=========================================================================
// Platform Subsystem
//
// Drives the bridge from the Winit event loop.
//
// Architecture:
// ```text
//  Main Thread:                              Deploy Thread:
//  ┌───────────────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop                 │    │  DeployTask          │
//  │   ├─ Touch → TouchAssembler ─┐    │    │   └─ DeployJob::run  │
//  │   ├─ Key   → InputProcessor ─┤    │    │         │            │
//  │   ├─ Resized / Redraw ───────┤    │    └─────────┼────────────┘
//  │   │                          ↓    │              │
//  │   │                     Bridge<S> │              │
//  │   │                          ↑    │              │
//  │   └─ user_event ─────────────┘ ◄──┼──────────────┘
//  └───────────────────────────────────┘   EventLoopProxy<BridgeEvent>
//
//  Frame Boundary: RedrawRequested
//    → one engine step per redraw while running
//    → no redraw loop while paused or deploying
// ```
//
// Responsibilities:
// - Create and manage the OS window (lazily, in `resumed`)
// - Start asset deployment and deliver its outcome on the main thread
// - Convert Winit touch and key events for the bridge
// - Map window lifecycle onto surface, pause and resume notifications
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;
mod touch_assembler;

//=== External Crates =====================================================

use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{Touch, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::bridge::{Bridge, BridgeError};
use crate::core::deploy::{DeployJob, DeployOutcome, DeployTask};
use crate::core::input::PlatformKey;
use crate::core::native::{Dpi, NativeSink};
use input_processor::InputProcessor;
use touch_assembler::TouchAssembler;

//=== BridgeEvent =========================================================

/// Events posted onto the main event loop from other threads.
#[derive(Debug)]
pub enum BridgeEvent {
    /// The deploy worker finished (successfully or not).
    DeployFinished(DeployOutcome),
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop the engine cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=== Entry Points ========================================================

/// Runs `bridge` on a new desktop event loop until the window closes.
pub(crate) fn run<S: NativeSink + 'static>(bridge: Bridge<S>, job: DeployJob) -> Result<(), BridgeError> {
    let event_loop = EventLoop::<BridgeEvent>::with_user_event()
        .build()
        .map_err(PlatformError::EventLoopCreation)?;

    run_on(event_loop, bridge, job)
}

/// Runs `bridge` inside a native activity.
#[cfg(target_os = "android")]
pub(crate) fn run_android<S: NativeSink + 'static>(
    bridge: Bridge<S>,
    job: DeployJob,
    app: winit::platform::android::activity::AndroidApp,
) -> Result<(), BridgeError> {
    use winit::platform::android::EventLoopBuilderExtAndroid;

    let event_loop = EventLoop::<BridgeEvent>::with_user_event()
        .with_android_app(app)
        .build()
        .map_err(PlatformError::EventLoopCreation)?;

    run_on(event_loop, bridge, job)
}

fn run_on<S: NativeSink + 'static>(
    event_loop: EventLoop<BridgeEvent>,
    bridge: Bridge<S>,
    job: DeployJob,
) -> Result<(), BridgeError> {
    let proxy = event_loop.create_proxy();
    let deploy = spawn_deploy(job, proxy)?;

    let mut platform = Platform::new(bridge, deploy);

    debug!(target: "platform", "Starting Winit event loop");
    event_loop
        .run_app(&mut platform)
        .map_err(PlatformError::EventLoopExecution)?;

    // Covers loops that end without a close request (Android destroy)
    platform.finish();
    Ok(())
}

fn spawn_deploy(job: DeployJob, proxy: EventLoopProxy<BridgeEvent>) -> Result<DeployTask, BridgeError> {
    DeployTask::spawn(job, move |outcome| {
        if proxy.send_event(BridgeEvent::DeployFinished(outcome)).is_err() {
            warn!(target: "platform", "Event loop closed before deployment finished");
        }
    })
    .map_err(BridgeError::DeployWorker)
}

//=== Platform ============================================================

/// Window owner and event router for one bridge.
///
/// # Thread Safety
///
/// This type is NOT Send/Sync - it must remain on the main thread. The
/// deploy worker reaches it only through the event loop proxy.
pub(crate) struct Platform<S: NativeSink> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    bridge: Bridge<S>,

    /// Running deployment (None once finished or cancelled).
    deploy: Option<DeployTask>,

    touches: TouchAssembler,
    input_processor: InputProcessor,
}

impl<S: NativeSink> Platform<S> {
    //--- Construction -----------------------------------------------------

    /// Does not create window yet - that happens lazily in `resumed()`.
    pub fn new(bridge: Bridge<S>, deploy: DeployTask) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            bridge,
            deploy: Some(deploy),
            touches: TouchAssembler::new(),
            input_processor: InputProcessor::new(),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Window size and density, once the window exists.
    fn surface(&self) -> Option<(PhysicalSize<u32>, Dpi)> {
        self.window
            .as_ref()
            .map(|window| (window.inner_size(), Dpi::from_scale_factor(window.scale_factor())))
    }

    /// Reports a fresh surface to the engine. No-op until the view exists.
    fn report_surface(&mut self, size: PhysicalSize<u32>, dpi: Dpi) {
        if !self.bridge.state().has_view() {
            return;
        }
        self.bridge.on_surface_created();
        self.bridge.on_surface_changed(size.width, size.height, dpi);
    }

    /// Reports the window surface once the engine view exists.
    fn announce_surface(&mut self) {
        let Some((size, dpi)) = self.surface() else {
            return;
        };
        self.report_surface(size, dpi);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Resumes a paused engine.
    ///
    /// The engine recreates its GL context on resume, so the surface is
    /// announced again whenever one is known.
    fn resume(&mut self, surface: Option<(PhysicalSize<u32>, Dpi)>) {
        self.bridge.on_resume();
        if let Some((size, dpi)) = surface {
            self.report_surface(size, dpi);
        }
    }

    fn handle_touch(&mut self, touch: &Touch) {
        let Some(gesture) = self
            .touches
            .process(touch.phase, touch.id, touch.location.x, touch.location.y)
        else {
            return;
        };

        let response = self.bridge.on_touch(&gesture);
        trace!(target: "platform::input", "Touch {:?} handled = {}", touch.phase, response.handled);
    }

    /// Forwards a key to the engine. Keys it does not consume, Back
    /// included, are dropped.
    fn handle_key(&mut self, key: PlatformKey, pressed: bool) {
        let consumed = if pressed {
            self.bridge.on_key_down(key)
        } else {
            self.bridge.on_key_up(key)
        };
        trace!(target: "platform::input", "Key {:?} pressed = {} consumed = {}", key, pressed, consumed);
    }

    /// Cancels deployment and tells the engine to exit.
    fn finish(&mut self) {
        if let Some(task) = self.deploy.take() {
            if !task.is_finished() {
                info!(target: "platform", "Cancelling asset deployment");
                task.cancel();
            }
        }
        self.bridge.shutdown();
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.finish();
        event_loop.exit();
    }
}

//=== Winit Integration ===================================================

impl<S: NativeSink> ApplicationHandler<BridgeEvent> for Platform<S> {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window if it doesn't exist yet. On mobile, this may be
    /// called multiple times (suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = WindowAttributes::default()
                .with_title("Linderdaum Engine")
                .with_inner_size(LogicalSize::new(800, 480));

            match event_loop.create_window(attrs) {
                Ok(window) => {
                    info!(
                        target: "platform",
                        "Window created: {}x{} @ {}x DPI",
                        window.inner_size().width,
                        window.inner_size().height,
                        window.scale_factor()
                    );
                    self.window = Some(window);
                }
                Err(e) => {
                    error!(target: "platform", "Window creation failed: {}", e);
                    self.close(event_loop);
                    return;
                }
            }
        }

        let surface = self.surface();
        self.resume(surface);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Suspended");
        self.bridge.on_pause();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: BridgeEvent) {
        match event {
            BridgeEvent::DeployFinished(outcome) => {
                self.deploy = None;
                self.bridge.on_deploy_finished(&outcome);
                self.announce_surface();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::Resized(size) => {
                let Some(window) = &self.window else {
                    return;
                };
                let dpi = Dpi::from_scale_factor(window.scale_factor());
                self.bridge.on_surface_changed(size.width, size.height, dpi);
            }

            WindowEvent::Touch(touch) => self.handle_touch(touch),

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let Some(input) = self.input_processor.process_key_event(key_event) else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                    return;
                };
                self.handle_key(input.key, input.pressed);
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: one engine step, then ask for the next frame
                if self.bridge.on_frame() {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }

            _ => {
                // Ignore: Focused, CursorMoved, etc.
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Event loop exiting");
        self.finish();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
