pub mod canvas;
pub mod clock;
#[cfg(feature = "native")]
pub mod gpu_device;
pub mod mode;
pub mod null_device;
#[cfg(feature = "native")]
pub mod pixel_presenter;

pub use canvas::SoftwareCanvas;
pub use clock::Clock;
#[cfg(feature = "native")]
pub use gpu_device::WgpuDevice;
pub use mode::{ModeState, RenderPath};
pub use null_device::NullDevice;
#[cfg(feature = "native")]
pub use pixel_presenter::PixelPresenter;
