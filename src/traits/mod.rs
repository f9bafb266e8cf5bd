pub mod device;
pub mod draw;

pub use device::*;
pub use draw::*;
