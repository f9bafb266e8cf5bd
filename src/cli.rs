// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::config::RendererConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-bridge")]
#[command(about = "Animated cube renderer with native and software paths", long_about = None)]
pub struct Cli {
    /// JSON renderer config; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Seed for object speeds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with animation paused
    #[arg(long = "no-animation", default_value = "false")]
    pub no_animation: bool,

    /// JSON scene snapshot to import at startup
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Request the native device path
    #[arg(long, default_value = "false")]
    pub native: bool,

    /// Run without a window for a fixed number of frames
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Frames to render in headless mode
    #[arg(long, default_value_t = 120)]
    pub frames: u64,

    /// Write the software canvas as a PPM image after a headless run
    #[arg(long)]
    pub dump: Option<PathBuf>,
}

impl Cli {
    /// Apply flag overrides on top of a base config
    pub fn apply(&self, mut config: RendererConfig) -> RendererConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_animation {
            config.animation_enabled = false;
        }
        config
    }
}
