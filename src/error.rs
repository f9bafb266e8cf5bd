use thiserror::Error;

#[derive(Error, Debug)]
pub enum RendererError {
    #[error("object index {index} out of range ({len} objects)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid scene data: {0}")]
    SceneData(#[from] serde_json::Error),
}

/// Failures reported by a native render device
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("no window handle set")]
    NoWindowHandle,

    #[error("window handle {0:#x} is not attached to this device")]
    WindowMismatch(u64),

    #[error("native rendering is not supported on this build")]
    Unsupported,

    #[error("device not initialized")]
    NotInitialized,

    #[error("surface error: {0}")]
    Surface(String),

    #[error("failed to find appropriate adapter: {0}")]
    Adapter(String),

    #[error("failed to create device: {0}")]
    Device(String),

    #[error("invalid pixel buffer size: expected {expected} bytes, got {actual}")]
    PixelBuffer { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
