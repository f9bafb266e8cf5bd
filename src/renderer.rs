use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::{Animator, CameraOrbit, DynamicObject};
use crate::config::RendererConfig;
use crate::core::{ModeState, RenderPath, SoftwareCanvas};
use crate::error::RendererError;
use crate::scene_data::SceneData;
use crate::traits::{ImmediateDraw, RenderDevice, WindowHandle};

#[cfg(feature = "native")]
pub type PlatformDevice = crate::core::WgpuDevice;
#[cfg(not(feature = "native"))]
pub type PlatformDevice = crate::core::NullDevice;

/// Renderer with the device this build supports and the software canvas
pub type DefaultRenderer = SceneRenderer<PlatformDevice, SoftwareCanvas>;

/// Animated cube scene with a native device path and a software fallback.
///
/// One `render_frame` call is one frame: the animation advances once, then
/// exactly one render path runs.
pub struct SceneRenderer<D: RenderDevice, C: ImmediateDraw> {
    device: D,
    canvas: C,
    objects: Vec<DynamicObject>,
    camera: CameraOrbit,
    animator: Animator,
    mode: ModeState,
    frame_count: u64,
    clear_color: [f32; 3],
    window: Option<WindowHandle>,
    width: u32,
    height: u32,
    status_log_interval: u64,
    rng: StdRng,
}

impl DefaultRenderer {
    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(
            PlatformDevice::default(),
            SoftwareCanvas::new(config.width, config.height),
            config,
        )
    }
}

impl<D: RenderDevice, C: ImmediateDraw> SceneRenderer<D, C> {
    pub fn new(device: D, mut canvas: C, config: &RendererConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let camera = CameraOrbit::default();
        canvas.set_view(&camera);

        let mut renderer = Self {
            device,
            canvas,
            objects: Vec::new(),
            camera,
            animator: Animator::new(config.animation_enabled),
            mode: ModeState::new(),
            frame_count: 0,
            clear_color: config.clear_color,
            window: None,
            width: config.width,
            height: config.height,
            status_log_interval: config.status_log_interval,
            rng,
        };

        log::info!("Scene renderer created {}x{}", config.width, config.height);

        if config.default_object {
            renderer.add_object(0.0, 0.0, 0.0, 1.0);
        }

        renderer
    }

    /// Advance animation by `delta` seconds and draw one frame
    pub fn render_frame(&mut self, delta: f32) -> RenderPath {
        self.frame_count += 1;

        self.animator.step(delta, &mut self.objects, &mut self.camera);

        let path = self.mode.path();
        match path {
            RenderPath::Native => {
                if let Err(e) = self.device.clear_and_present(self.clear_color) {
                    log::warn!("Native render error on frame {}: {}", self.frame_count, e);
                }
            }
            RenderPath::NativePending => {}
            RenderPath::Fallback => self.draw_fallback(),
        }

        if self.status_log_due() {
            log::info!(
                "{} rendering frame {} with {} objects",
                path.label(),
                self.frame_count,
                self.objects.len()
            );
        }

        path
    }

    /// Whether the current frame hits the periodic status log; 0 disables it
    fn status_log_due(&self) -> bool {
        self.status_log_interval > 0 && self.frame_count % self.status_log_interval == 0
    }

    fn draw_fallback(&mut self) {
        self.canvas.set_view(&self.camera);
        self.canvas.clear_buffer(self.clear_color);
        for object in &self.objects {
            self.canvas
                .draw_wireframe_cube(object.position, object.size, object.color);
        }
    }

    /// Resize device and canvas; zero dimensions are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }

        self.width = width;
        self.height = height;
        if self.mode.native_ready() {
            self.device.resize(width, height);
        }
        self.canvas.resize(width, height);
        log::debug!("Renderer resized to {}x{}", width, height);
    }

    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32) {
        self.clear_color = [r, g, b];
        log::debug!("Clear color set to RGB({:.2}, {:.2}, {:.2})", r, g, b);
    }

    /// Add an animated cube and return its index
    pub fn add_object(&mut self, x: f32, y: f32, z: f32, size: f32) -> usize {
        let object = DynamicObject::new(Vec3::new(x, y, z), size, &mut self.rng);
        log::debug!(
            "Added animated cube at ({}, {}, {}) size {} speed {:.2}",
            x,
            y,
            z,
            size,
            object.speed()
        );
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Add an object with a fixed speed instead of a random one
    pub fn add_object_with_speed(&mut self, position: Vec3, size: f32, speed: f32) -> usize {
        self.objects.push(DynamicObject::with_speed(position, size, speed));
        self.objects.len() - 1
    }

    /// Move an object; the new height becomes its oscillation center
    pub fn move_object(&mut self, index: usize, x: f32, y: f32, z: f32) -> Result<(), RendererError> {
        let len = self.objects.len();
        let object = self
            .objects
            .get_mut(index)
            .ok_or(RendererError::IndexOutOfRange { index, len })?;

        object.move_to(Vec3::new(x, y, z));
        log::debug!("Moved object {} to ({}, {}, {})", index, x, y, z);
        Ok(())
    }

    /// Try to switch to the native device path.
    ///
    /// Failure is not fatal: the request is rolled back and rendering
    /// continues on the fallback path. Nothing retries automatically.
    pub fn enable_native(&mut self) -> bool {
        if self.mode.native_ready() {
            return true;
        }

        let (window, width, height) = (self.window, self.width, self.height);
        let device = &mut self.device;
        match self.mode.try_enable(|| device.initialize(window, width, height)) {
            Ok(()) => {
                log::info!("Native {} rendering enabled", self.device.name());
                true
            }
            Err(e) => {
                log::warn!("Native rendering unavailable, using fallback: {}", e);
                false
            }
        }
    }

    /// Set the host window used by the next `enable_native`; 0 clears it
    pub fn set_window_handle(&mut self, handle: u64) {
        self.window = (handle != 0).then_some(WindowHandle(handle));
        log::debug!("Window handle set to {:#x}", handle);
    }

    /// Pause or resume animation, returning whether it is now enabled
    pub fn toggle_animation(&mut self) -> bool {
        let enabled = self.animator.toggle();
        log::info!("Animation {}", if enabled { "enabled" } else { "disabled" });
        enabled
    }

    pub fn set_camera_orbit(&mut self, angle: f32, distance: f32, height: f32) {
        self.camera = CameraOrbit::new(angle, distance, height);
        log::debug!(
            "Camera orbit: angle={}, distance={}, height={}",
            angle,
            distance,
            height
        );
    }

    /// Import cube-like objects and the camera from a JSON scene snapshot.
    /// Returns the number of objects added.
    pub fn load_scene_data(&mut self, json: &str) -> Result<usize, RendererError> {
        let scene = SceneData::from_json(json)?;

        let mut added = 0;
        for (position, size) in scene.cubes() {
            self.add_object(position.x, position.y, position.z, size);
            added += 1;
        }

        if let Some(camera) = &scene.camera {
            self.camera = CameraOrbit::from_eye(Vec3::from_array(camera.position));
        }

        log::info!(
            "Scene data loaded: {} cubes added ({} objects, {} lights)",
            added,
            scene.objects.len(),
            scene.lights.len()
        );
        Ok(added)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn status(&self) -> &'static str {
        self.mode.status()
    }

    /// Human-readable description of the active renderer
    pub fn renderer_info(&self) -> String {
        match self.mode.path() {
            RenderPath::Native => format!("Native {} renderer (animated)", self.device.name()),
            RenderPath::NativePending => {
                format!("Native {} renderer (initializing...)", self.device.name())
            }
            RenderPath::Fallback => "Software fallback renderer".to_string(),
        }
    }

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn objects(&self) -> &[DynamicObject] {
        &self.objects
    }

    pub fn camera(&self) -> &CameraOrbit {
        &self.camera
    }

    pub fn is_animation_enabled(&self) -> bool {
        self.animator.is_enabled()
    }

    /// Animated seconds so far
    pub fn elapsed(&self) -> f32 {
        self.animator.elapsed()
    }

    pub fn clear_color(&self) -> [f32; 3] {
        self.clear_color
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn window_handle(&self) -> Option<WindowHandle> {
        self.window
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }
}

impl<D: RenderDevice, C: ImmediateDraw> Drop for SceneRenderer<D, C> {
    fn drop(&mut self) {
        self.device.release();
        log::debug!("Scene renderer destroyed after {} frames", self.frame_count);
    }
}
