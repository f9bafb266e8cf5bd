pub mod animation;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod ffi;
pub mod renderer;
pub mod scene_data;
pub mod traits;

pub use animation::{advance, Animator, CameraOrbit, DynamicObject};
pub use config::RendererConfig;
pub use error::{ConfigError, DeviceError, RendererError};
pub use renderer::{DefaultRenderer, PlatformDevice, SceneRenderer};
