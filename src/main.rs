use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use scene_bridge::cli::Cli;
use scene_bridge::config::RendererConfig;
use scene_bridge::renderer::DefaultRenderer;

// === Constants ===

const HEADLESS_DELTA: f32 = 1.0 / 60.0;

fn load_config(cli: &Cli) -> Result<RendererConfig> {
    let base = match &cli.config {
        Some(path) => RendererConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RendererConfig::default(),
    };
    Ok(cli.apply(base))
}

fn read_scene(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading scene {}", path.display()))
}

fn run_headless(cli: &Cli, config: &RendererConfig, scene: Option<&str>) -> Result<()> {
    let mut renderer = DefaultRenderer::from_config(config);

    if let Some(json) = scene {
        renderer.load_scene_data(json).context("importing scene")?;
    }
    if cli.native && !renderer.enable_native() {
        log::info!("No window in headless mode, continuing with {}", renderer.status());
    }

    for _ in 0..cli.frames {
        renderer.render_frame(HEADLESS_DELTA);
    }

    log::info!(
        "Rendered {} frames ({}), {:.2}s animated, {} objects",
        renderer.frame_count(),
        renderer.renderer_info(),
        renderer.elapsed(),
        renderer.objects().len()
    );

    if let Some(path) = &cli.dump {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        renderer
            .canvas()
            .write_ppm(&mut BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Canvas written to {}", path.display());
    }

    Ok(())
}

#[cfg(feature = "native")]
mod windowed {
    use anyhow::Result;
    use std::sync::Arc;
    use winit::{
        application::ApplicationHandler,
        event::*,
        event_loop::{ActiveEventLoop, EventLoop},
        keyboard::{KeyCode, PhysicalKey},
        window::{Window, WindowId},
    };

    use scene_bridge::cli::Cli;
    use scene_bridge::config::RendererConfig;
    use scene_bridge::core::{Clock, PixelPresenter, RenderPath, SoftwareCanvas, WgpuDevice};
    use scene_bridge::renderer::SceneRenderer;

    const TITLE_UPDATE_INTERVAL: u64 = 60;

    type WindowRenderer = SceneRenderer<WgpuDevice, SoftwareCanvas>;

    struct App {
        native: bool,
        config: RendererConfig,
        scene: Option<String>,
        renderer: Option<WindowRenderer>,
        window: Option<Arc<Window>>,
        /// Shows the software canvas while the native path is off
        presenter: Option<PixelPresenter>,
        presenter_failed: bool,
        clock: Clock,
    }

    impl App {
        fn create_renderer(&self, window: &Arc<Window>) -> WindowRenderer {
            let size = window.inner_size();
            let mut config = self.config.clone();
            if size.width > 0 && size.height > 0 {
                config.width = size.width;
                config.height = size.height;
            }

            let mut renderer = SceneRenderer::new(
                WgpuDevice::with_window(window.clone()),
                SoftwareCanvas::new(config.width, config.height),
                &config,
            );

            if let Some(json) = &self.scene {
                if let Err(e) = renderer.load_scene_data(json) {
                    log::error!("Failed to import scene: {}", e);
                }
            }

            renderer.set_window_handle(WgpuDevice::handle_for(window).raw());
            if self.native {
                renderer.enable_native();
            }
            renderer
        }

        fn handle_key(&mut self, code: KeyCode) {
            let Some(renderer) = self.renderer.as_mut() else {
                return;
            };

            match code {
                KeyCode::Space => {
                    renderer.toggle_animation();
                }
                KeyCode::KeyN => {
                    // the native device needs the window surface to itself
                    self.presenter = None;
                    self.presenter_failed = false;
                    renderer.enable_native();
                }
                _ => {}
            }
        }

        fn redraw(&mut self) {
            let delta = self.clock.tick();
            if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                let path = renderer.render_frame(delta);

                if path == RenderPath::Fallback && !self.presenter_failed {
                    if self.presenter.is_none() {
                        match PixelPresenter::new(window.clone()) {
                            Ok(presenter) => self.presenter = Some(presenter),
                            Err(e) => {
                                log::warn!("Software canvas cannot be shown: {}", e);
                                self.presenter_failed = true;
                            }
                        }
                    }
                    if let Some(presenter) = self.presenter.as_mut() {
                        let canvas = renderer.canvas();
                        let (width, height) = canvas.dimensions();
                        if let Err(e) = presenter.present(canvas.pixels(), width, height) {
                            log::warn!("Canvas present failed: {}", e);
                        }
                    }
                }

                if renderer.frame_count() % TITLE_UPDATE_INTERVAL == 1 {
                    window.set_title(&format!("Scene Bridge - {}", renderer.renderer_info()));
                }
            }
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Scene Bridge")
                    .with_inner_size(winit::dpi::PhysicalSize::new(
                        self.config.width,
                        self.config.height,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.renderer = Some(self.create_renderer(&window));
            self.window = Some(window);
            self.clock.reset();
        }

        fn window_event(
            &mut self,
            event_loop: &ActiveEventLoop,
            _window_id: WindowId,
            event: WindowEvent,
        ) {
            match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => event_loop.exit(),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(code),
                            repeat: false,
                            ..
                        },
                    ..
                } => self.handle_key(code),
                WindowEvent::Resized(size) => {
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.resize(size.width, size.height);
                    }
                    if let Some(presenter) = self.presenter.as_mut() {
                        presenter.resize(size.width, size.height);
                    }
                }
                WindowEvent::RedrawRequested => self.redraw(),
                _ => {}
            }
        }

        fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    pub fn run(cli: &Cli, config: RendererConfig, scene: Option<String>) -> Result<()> {
        let event_loop = EventLoop::new()?;
        let mut app = App {
            native: cli.native,
            config,
            scene,
            renderer: None,
            window: None,
            presenter: None,
            presenter_failed: false,
            clock: Clock::new(),
        };

        log::info!("Scene Bridge - Space: toggle animation, N: native path, Escape: quit");
        event_loop.run_app(&mut app)?;

        Ok(())
    }
}

#[cfg(feature = "native")]
fn run_windowed(cli: &Cli, config: RendererConfig, scene: Option<String>) -> Result<()> {
    windowed::run(cli, config, scene)
}

#[cfg(not(feature = "native"))]
fn run_windowed(cli: &Cli, config: RendererConfig, scene: Option<String>) -> Result<()> {
    log::warn!("Built without the native feature, running headless");
    run_headless(cli, &config, scene.as_deref())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let scene = cli.scene.as_deref().map(read_scene).transpose()?;

    if cli.headless {
        run_headless(&cli, &config, scene.as_deref())
    } else {
        run_windowed(&cli, config, scene)
    }
}
