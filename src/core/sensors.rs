//=========================================================================
// Sensor Hub
//=========================================================================
//
// Motion and location sensors the engine can switch on at runtime.
//
// The hub tracks which sensors are active, asks the platform provider to
// start or stop delivering readings, and forwards readings for active
// sensors to the engine. The accelerometer is run through a gravity
// low-pass filter so the engine only sees linear acceleration.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::native::NativeSink;

//=== GpsFix ==============================================================

/// One location reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpsFix {
    pub altitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Metres per second.
    pub speed: f64,
    /// Degrees east of true north.
    pub bearing: f64,
    /// Milliseconds since the UNIX epoch.
    pub time: f64,
}

//=== SensorKind ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    LinearAccelerometer,
    Gyroscope,
    Gps,
}

impl SensorKind {
    const ALL: [SensorKind; 3] = [Self::LinearAccelerometer, Self::Gyroscope, Self::Gps];

    fn slot(self) -> usize {
        match self {
            Self::LinearAccelerometer => 0,
            Self::Gyroscope => 1,
            Self::Gps => 2,
        }
    }
}

//=== SensorProvider ======================================================

/// Platform side of the sensors.
pub trait SensorProvider {
    /// Starts or stops delivery of readings for `kind`.
    fn set_listening(&mut self, kind: SensorKind, active: bool);

    /// Most recent cached location, if the platform has one.
    fn last_known_location(&self) -> Option<GpsFix> {
        None
    }
}

/// Provider for platforms without sensors.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSensorProvider;

impl SensorProvider for NullSensorProvider {
    fn set_listening(&mut self, kind: SensorKind, active: bool) {
        trace!(target: "bridge::native", "No provider for {:?} (active = {})", kind, active);
    }
}

//=== SensorHub ===========================================================

pub struct SensorHub {
    provider: Box<dyn SensorProvider + Send>,
    active: [bool; 3],
    gravity: [f32; 3],
}

impl SensorHub {
    /// Low-pass filter constant, `t / (t + dT)`.
    pub const GRAVITY_ALPHA: f32 = 0.8;

    pub fn new(provider: Box<dyn SensorProvider + Send>) -> Self {
        Self {
            provider,
            active: [false; 3],
            gravity: [0.0; 3],
        }
    }

    pub fn is_active(&self, kind: SensorKind) -> bool {
        self.active[kind.slot()]
    }

    /// Switches a sensor on or off. Repeating the current state is a no-op.
    ///
    /// Enabling GPS forwards the provider's last known fix straight away.
    pub fn enable<S: NativeSink + ?Sized>(&mut self, kind: SensorKind, active: bool, sink: &mut S) {
        if self.is_active(kind) == active {
            return;
        }

        debug!(target: "bridge::native", "Sensor {:?} active = {}", kind, active);
        self.provider.set_listening(kind, active);
        self.active[kind.slot()] = active;

        if kind == SensorKind::Gps && active {
            if let Some(fix) = self.provider.last_known_location() {
                sink.update_gps(fix);
            }
        }
    }

    /// Stops every active sensor.
    pub fn disable_all<S: NativeSink + ?Sized>(&mut self, sink: &mut S) {
        for kind in SensorKind::ALL {
            self.enable(kind, false, sink);
        }
    }

    /// Raw accelerometer reading, gravity included.
    pub fn on_accelerometer<S: NativeSink + ?Sized>(&mut self, values: [f32; 3], sink: &mut S) {
        if !self.is_active(SensorKind::LinearAccelerometer) {
            return;
        }

        let alpha = Self::GRAVITY_ALPHA;
        let mut linear = [0.0; 3];
        for axis in 0..3 {
            self.gravity[axis] = alpha * self.gravity[axis] + (1.0 - alpha) * values[axis];
            linear[axis] = values[axis] - self.gravity[axis];
        }

        sink.update_linear_acceleration(linear);
    }

    /// Angular velocity in radians per second.
    pub fn on_gyroscope<S: NativeSink + ?Sized>(&mut self, values: [f32; 3], sink: &mut S) {
        if self.is_active(SensorKind::Gyroscope) {
            sink.update_velocity(values);
        }
    }

    pub fn on_location<S: NativeSink + ?Sized>(&mut self, fix: GpsFix, sink: &mut S) {
        if self.is_active(SensorKind::Gps) {
            sink.update_gps(fix);
        }
    }
}

impl Default for SensorHub {
    fn default() -> Self {
        Self::new(Box::new(NullSensorProvider))
    }
}

//=========================================================================
// Tests
//=========================================================================
