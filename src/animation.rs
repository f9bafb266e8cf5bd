use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Orbit speed of the camera in radians per second
pub const ORBIT_SPEED: f32 = 0.5;
/// Vertical bob amplitude around an object's base height
pub const BOB_AMPLITUDE: f32 = 0.5;
/// Phase offsets of the green and blue channels (120 and 240 degrees)
pub const GREEN_PHASE_OFFSET: f32 = 2.094;
pub const BLUE_PHASE_OFFSET: f32 = 4.188;

/// Range new objects draw their phase speed from, max exclusive
pub const MIN_SPEED: f32 = 1.0;
pub const MAX_SPEED: f32 = 3.0;

/// Starting orbit radius and eye height of the camera
pub const DEFAULT_CAMERA_DISTANCE: f32 = 5.0;
pub const DEFAULT_CAMERA_HEIGHT: f32 = 2.0;

/// Animated object drawn as a cube
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicObject {
    pub position: Vec3,
    pub size: f32,
    pub color: [f32; 3],
    base_y: f32,
    speed: f32,
    phase: f32,
}

impl DynamicObject {
    /// Create an object with a speed drawn from [MIN_SPEED, MAX_SPEED)
    pub fn new<R: Rng + ?Sized>(position: Vec3, size: f32, rng: &mut R) -> Self {
        Self::with_speed(position, size, rng.gen_range(MIN_SPEED..MAX_SPEED))
    }

    pub fn with_speed(position: Vec3, size: f32, speed: f32) -> Self {
        Self {
            position,
            size,
            color: [1.0, 0.0, 0.0],
            base_y: position.y,
            speed,
            phase: 0.0,
        }
    }

    pub fn base_y(&self) -> f32 {
        self.base_y
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Place the object; the new height becomes the oscillation center
    pub fn move_to(&mut self, position: Vec3) {
        self.position = position;
        self.base_y = position.y;
    }

    fn step(&mut self, delta: f32) {
        self.phase += delta * self.speed;
        self.position.y = self.base_y + self.phase.sin() * BOB_AMPLITUDE;
        self.color = phase_color(self.phase);
    }
}

/// RGB cycle with channels 120 degrees apart, each in [0, 1]
pub fn phase_color(phase: f32) -> [f32; 3] {
    [
        0.5 + 0.5 * phase.sin(),
        0.5 + 0.5 * (phase + GREEN_PHASE_OFFSET).sin(),
        0.5 + 0.5 * (phase + BLUE_PHASE_OFFSET).sin(),
    ]
}

/// Camera orbiting the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOrbit {
    pub angle: f32,
    pub distance: f32,
    pub height: f32,
}

impl CameraOrbit {
    pub fn new(angle: f32, distance: f32, height: f32) -> Self {
        Self { angle, distance, height }
    }

    /// Derive an orbit from a world-space eye position looking at the origin
    pub fn from_eye(eye: Vec3) -> Self {
        Self {
            angle: eye.x.atan2(eye.z).rem_euclid(TAU),
            distance: Vec3::new(eye.x, 0.0, eye.z).length(),
            height: eye.y,
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.angle.sin() * self.distance,
            self.height,
            self.angle.cos() * self.distance,
        )
    }

    pub fn target(&self) -> Vec3 {
        Vec3::ZERO
    }
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_CAMERA_DISTANCE, DEFAULT_CAMERA_HEIGHT)
    }
}

/// Negative and non-finite deltas never move time backward
fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta > 0.0 {
        delta
    } else {
        0.0
    }
}

/// Advance the camera orbit and every object by `delta` seconds.
///
/// Positions and colors are recomputed from each object's accumulated phase,
/// never from the previous frame's values. Does nothing when `enabled` is false.
pub fn advance(delta: f32, objects: &mut [DynamicObject], camera: &mut CameraOrbit, enabled: bool) {
    if !enabled {
        return;
    }

    let delta = sanitize_delta(delta);

    camera.angle = (camera.angle + delta * ORBIT_SPEED).rem_euclid(TAU);

    for object in objects.iter_mut() {
        object.step(delta);
    }
}

/// Pausable animation clock driving [`advance`]
#[derive(Debug, Clone)]
pub struct Animator {
    enabled: bool,
    elapsed: f32,
}

impl Animator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, elapsed: 0.0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Total animated time in seconds, frozen while paused
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Flip the enabled flag and return the new value
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn step(&mut self, delta: f32, objects: &mut [DynamicObject], camera: &mut CameraOrbit) {
        if self.enabled {
            self.elapsed += sanitize_delta(delta);
        }
        advance(delta, objects, camera, self.enabled);
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(true)
    }
}
