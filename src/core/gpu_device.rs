use std::sync::Arc;
use wgpu::{Adapter, Device, DeviceDescriptor, Instance, Queue, Surface, SurfaceConfiguration};
use winit::window::Window;

use crate::error::DeviceError;
use crate::traits::{RenderDevice, WindowHandle};

type Result<T> = std::result::Result<T, DeviceError>;

/// Resources acquired by a successful initialization.
/// Released surface first, then queue, then device.
struct GpuState {
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    queue: Queue,
    device: Device,
}

/// Native render device backed by wgpu
///
/// The host attaches its winit window; `initialize` then only succeeds for the
/// handle of that window (see [`WgpuDevice::handle_for`]).
pub struct WgpuDevice {
    window: Option<Arc<Window>>,
    state: Option<GpuState>,
    adapter_name: String,
}

impl WgpuDevice {
    /// Create a device with no window attached
    pub fn new() -> Self {
        Self {
            window: None,
            state: None,
            adapter_name: String::new(),
        }
    }

    pub fn with_window(window: Arc<Window>) -> Self {
        let mut device = Self::new();
        device.attach_window(window);
        device
    }

    /// Attach the window whose surface `initialize` will create
    pub fn attach_window(&mut self, window: Arc<Window>) {
        self.window = Some(window);
    }

    /// Handle the host should pass to `set_window_handle` for this window
    pub fn handle_for(window: &Window) -> WindowHandle {
        WindowHandle(u64::from(window.id()))
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Name of the adapter picked during initialization
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn create_state(&mut self, window: Arc<Window>, width: u32, height: u32) -> Result<GpuState> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| DeviceError::Surface(e.to_string()))?;
        let adapter = pollster::block_on(Self::request_adapter(&instance, &surface))?;
        let (device, queue) = pollster::block_on(Self::request_device(&adapter))?;

        let surface_config = Self::create_surface_config(&surface, &adapter, width, height)?;
        surface.configure(&device, &surface_config);

        self.adapter_name = adapter.get_info().name;

        Ok(GpuState {
            surface,
            surface_config,
            queue,
            device,
        })
    }

    /// Request adapter with surface compatibility
    pub(crate) async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| DeviceError::Adapter(format!("{:?}", e)))
    }

    pub(crate) async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        adapter
            .request_device(&DeviceDescriptor {
                label: Some("Scene Bridge Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| DeviceError::Device(format!("{:?}", e)))
    }

    /// Largest surface side the requested device limits allow
    pub(crate) fn max_dimension() -> u32 {
        wgpu::Limits::default().max_texture_dimension_2d
    }

    pub(crate) fn create_surface_config(
        surface: &Surface,
        adapter: &Adapter,
        width: u32,
        height: u32,
    ) -> Result<SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| DeviceError::Surface("surface reports no formats".into()))?;

        Ok(SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.clamp(1, Self::max_dimension()),
            height: height.clamp(1, Self::max_dimension()),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }
}

impl Default for WgpuDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderDevice for WgpuDevice {
    fn initialize(
        &mut self,
        window: Option<WindowHandle>,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if self.state.is_some() {
            return Ok(());
        }

        let handle = window.ok_or(DeviceError::NoWindowHandle)?;
        let attached = self
            .window
            .clone()
            .filter(|w| Self::handle_for(w) == handle)
            .ok_or(DeviceError::WindowMismatch(handle.raw()))?;

        let state = self.create_state(attached, width, height)?;
        log::info!(
            "wgpu device created on '{}' ({}x{})",
            self.adapter_name,
            state.surface_config.width,
            state.surface_config.height
        );
        self.state = Some(state);
        Ok(())
    }

    fn clear_and_present(&mut self, color: [f32; 3]) -> Result<()> {
        let state = self.state.as_mut().ok_or(DeviceError::NotInitialized)?;

        let output = match state.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                state.surface.configure(&state.device, &state.surface_config);
                return Err(DeviceError::Surface("surface lost, reconfigured".into()));
            }
            Err(e) => return Err(DeviceError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = state
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });

        {
            let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: color[0] as f64,
                            g: color[1] as f64,
                            b: color[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        state.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width > Self::max_dimension() || height > Self::max_dimension() {
            log::warn!("Ignoring surface resize to {}x{}", width, height);
            return;
        }

        if let Some(state) = self.state.as_mut() {
            state.surface_config.width = width;
            state.surface_config.height = height;
            state.surface.configure(&state.device, &state.surface_config);
        }
    }

    fn release(&mut self) {
        if let Some(GpuState {
            surface,
            surface_config: _,
            queue,
            device,
        }) = self.state.take()
        {
            drop(surface);
            drop(queue);
            drop(device);
            log::info!("wgpu device released");
        }
    }

    fn name(&self) -> &str {
        "wgpu"
    }
}

impl Drop for WgpuDevice {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_without_handle_fails() {
        let mut device = WgpuDevice::new();
        assert!(matches!(
            device.initialize(None, 800, 600),
            Err(DeviceError::NoWindowHandle)
        ));
        assert!(!device.is_initialized());
    }

    #[test]
    fn initialize_without_attached_window_fails() {
        let mut device = WgpuDevice::new();
        assert!(matches!(
            device.initialize(Some(WindowHandle(42)), 800, 600),
            Err(DeviceError::WindowMismatch(42))
        ));
    }

    #[test]
    fn present_before_init_fails() {
        let mut device = WgpuDevice::new();
        assert!(matches!(
            device.clear_and_present([0.0; 3]),
            Err(DeviceError::NotInitialized)
        ));
    }

    #[test]
    fn oversized_resize_before_init_is_ignored() {
        let mut device = WgpuDevice::new();
        device.resize(70_000, 70_000);
        device.resize(u32::MAX, 1);
        assert!(!device.is_initialized());
    }

    #[test]
    fn release_is_idempotent() {
        let mut device = WgpuDevice::new();
        device.release();
        device.release();
        assert!(!device.is_initialized());
    }
}
