use crate::error::DeviceError;

/// Opaque native window identifier handed over by the host shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

impl WindowHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Native device path - owns device, context and swap chain
pub trait RenderDevice {
    /// Acquire device resources for the given window
    fn initialize(
        &mut self,
        window: Option<WindowHandle>,
        width: u32,
        height: u32,
    ) -> Result<(), DeviceError>;

    /// Clear the back buffer to `color` and present it
    fn clear_and_present(&mut self, color: [f32; 3]) -> Result<(), DeviceError>;

    /// Reconfigure the swap chain for new dimensions
    fn resize(&mut self, width: u32, height: u32);

    /// Release everything acquired by `initialize`, in reverse order
    fn release(&mut self);

    /// Short backend name used in renderer info
    fn name(&self) -> &str;
}
