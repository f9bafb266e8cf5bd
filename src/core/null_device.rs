use crate::error::DeviceError;
use crate::traits::{RenderDevice, WindowHandle};

/// Device for builds without a native graphics backend.
/// Initialization always fails, so the renderer stays on the fallback path.
#[derive(Debug, Default)]
pub struct NullDevice;

impl RenderDevice for NullDevice {
    fn initialize(
        &mut self,
        _window: Option<WindowHandle>,
        _width: u32,
        _height: u32,
    ) -> Result<(), DeviceError> {
        Err(DeviceError::Unsupported)
    }

    fn clear_and_present(&mut self, _color: [f32; 3]) -> Result<(), DeviceError> {
        Err(DeviceError::NotInitialized)
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn release(&mut self) {}

    fn name(&self) -> &str {
        "null"
    }
}
