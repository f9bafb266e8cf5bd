use glam::Vec3;

use crate::animation::CameraOrbit;

/// Immediate-mode drawing used by the software fallback path
pub trait ImmediateDraw {
    /// Set the camera used for subsequent draws
    fn set_view(&mut self, camera: &CameraOrbit);

    /// Fill the whole buffer with color
    fn clear_buffer(&mut self, color: [f32; 3]);

    /// Draw the 12 edges of a unit cube scaled by `scale` and centered at `position`
    fn draw_wireframe_cube(&mut self, position: Vec3, scale: f32, color: [f32; 3]);

    fn resize(&mut self, width: u32, height: u32);
}
