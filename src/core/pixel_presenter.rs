use std::sync::Arc;
use wgpu::{
    BindGroup, BindGroupLayout, Device, Instance, Queue, RenderPipeline, Sampler, Surface,
    SurfaceConfiguration, Texture,
};
use winit::window::Window;

use super::gpu_device::WgpuDevice;
use crate::error::DeviceError;

type Result<T> = std::result::Result<T, DeviceError>;

/// Fullscreen triangle sampling the uploaded canvas
const BLIT_SHADER: &str = r#"
@group(0) @binding(0) var canvas_texture: texture_2d<f32>;
@group(0) @binding(1) var canvas_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(canvas_texture, canvas_sampler, in.uv);
}
"#;

/// Puts a CPU RGBA buffer on a window surface
///
/// Hosts use this to show the software canvas while the native device path
/// is off. It owns its own surface, so drop it before enabling the native
/// device on the same window.
pub struct PixelPresenter {
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    sampler: Sampler,
    texture: Texture,
    bind_group: BindGroup,
    texture_size: (u32, u32),
    queue: Queue,
    device: Device,
}

impl PixelPresenter {
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| DeviceError::Surface(e.to_string()))?;
        let adapter = pollster::block_on(WgpuDevice::request_adapter(&instance, &surface))?;
        let (device, queue) = pollster::block_on(WgpuDevice::request_device(&adapter))?;

        let surface_config =
            WgpuDevice::create_surface_config(&surface, &adapter, size.width, size.height)?;
        surface.configure(&device, &surface_config);

        let bind_group_layout = Self::create_bind_group_layout(&device);
        let pipeline = Self::create_pipeline(&device, &bind_group_layout, surface_config.format);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Canvas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let texture = Self::create_texture(&device, 1, 1);
        let bind_group = Self::create_bind_group(&device, &bind_group_layout, &texture, &sampler);

        log::info!(
            "Software canvas presenter on '{}' ({}x{})",
            adapter.get_info().name,
            surface_config.width,
            surface_config.height
        );

        Ok(Self {
            surface,
            surface_config,
            pipeline,
            bind_group_layout,
            sampler,
            texture,
            bind_group,
            texture_size: (1, 1),
            queue,
            device,
        })
    }

    /// Upload `pixels` and present them stretched over the whole surface
    pub fn present(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()> {
        check_pixels(pixels, width, height)?;

        if self.texture_size != (width, height) {
            self.texture = Self::create_texture(&self.device, width, height);
            self.bind_group = Self::create_bind_group(
                &self.device,
                &self.bind_group_layout,
                &self.texture,
                &self.sampler,
            );
            self.texture_size = (width, height);
        }

        self.queue.write_texture(
            self.texture.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return Err(DeviceError::Surface("surface lost, reconfigured".into()));
            }
            Err(e) => return Err(DeviceError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Canvas Present Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width.min(WgpuDevice::max_dimension());
        self.surface_config.height = height.min(WgpuDevice::max_dimension());
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn create_texture(device: &Device, width: u32, height: u32) -> Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Canvas Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn create_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Canvas Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    fn create_pipeline(
        device: &Device,
        bind_group_layout: &BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Canvas Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Canvas Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Canvas Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_bind_group(
        device: &Device,
        layout: &BindGroupLayout,
        texture: &Texture,
        sampler: &Sampler,
    ) -> BindGroup {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Canvas Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }
}

/// Reject buffers that do not hold exactly `width` x `height` RGBA pixels
fn check_pixels(pixels: &[u8], width: u32, height: u32) -> Result<()> {
    if width > WgpuDevice::max_dimension() || height > WgpuDevice::max_dimension() {
        return Err(DeviceError::Surface(format!(
            "canvas {}x{} exceeds texture limit",
            width, height
        )));
    }

    let expected = width as usize * height as usize * 4;
    if expected == 0 || pixels.len() != expected {
        return Err(DeviceError::PixelBuffer {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SoftwareCanvas;

    #[test]
    fn test_pixel_buffer_validation() {
        assert!(check_pixels(&[0; 16], 2, 2).is_ok());
        assert!(matches!(
            check_pixels(&[0; 15], 2, 2),
            Err(DeviceError::PixelBuffer {
                expected: 16,
                actual: 15
            })
        ));
        assert!(check_pixels(&[], 0, 0).is_err());
        assert!(check_pixels(&[], u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_canvas_buffer_is_presentable() {
        let canvas = SoftwareCanvas::new(40, 30);
        let (width, height) = canvas.dimensions();
        assert!(check_pixels(canvas.pixels(), width, height).is_ok());
    }
}
