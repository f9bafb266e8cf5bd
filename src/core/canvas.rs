use glam::{Mat4, Vec3, Vec4Swizzles};
use std::io::{self, Write};

use crate::animation::CameraOrbit;
use crate::traits::ImmediateDraw;

const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;
/// Edges reaching further outside NDC than this are skipped
const NDC_LIMIT: f32 = 8.0;
/// Largest width or height the buffer accepts, matching wgpu's default 2D texture limit
pub const MAX_DIMENSION: u32 = 8192;

const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
];

/// Front face, back face, connecting edges
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// CPU wireframe renderer - RGBA pixel buffer with an orbit camera
#[derive(Clone)]
pub struct SoftwareCanvas {
    /// RGBA pixel buffer
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    view_proj: Mat4,
}

impl SoftwareCanvas {
    /// Create a cleared canvas; each side is clamped to [`MAX_DIMENSION`]
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = if width > MAX_DIMENSION || height > MAX_DIMENSION {
            log::warn!(
                "Canvas {}x{} exceeds {} per side, clamping",
                width,
                height,
                MAX_DIMENSION
            );
            (width.min(MAX_DIMENSION), height.min(MAX_DIMENSION))
        } else {
            (width, height)
        };

        let mut canvas = Self {
            pixels: vec![0; buffer_len(width, height).unwrap_or(0)],
            width,
            height,
            view_proj: Mat4::IDENTITY,
        };
        canvas.set_view(&CameraOrbit::default());
        canvas
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGBA at (x, y), None outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(rgba)
    }

    /// Number of pixels exactly matching `rgba`
    pub fn count_pixels(&self, rgba: [u8; 4]) -> usize {
        self.pixels.chunks_exact(4).filter(|p| *p == rgba).count()
    }

    /// Write the buffer as a binary PPM (P6) image
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        for rgba in self.pixels.chunks_exact(4) {
            out.write_all(&rgba[..3])?;
        }
        Ok(())
    }

    /// Byte offset of (x, y); callers check bounds first
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Project a world point to pixel coordinates; None when behind the camera
    fn project(&self, point: Vec3) -> Option<(i32, i32)> {
        let clip = self.view_proj * point.extend(1.0);
        if clip.w <= Z_NEAR {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.x.abs() > NDC_LIMIT || ndc.y.abs() > NDC_LIMIT {
            return None;
        }

        let x = (ndc.x * 0.5 + 0.5) * self.width as f32;
        let y = (0.5 - ndc.y * 0.5) * self.height as f32;
        Some((x as i32, y as i32))
    }

    fn set_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }

        let idx = self.index(x as u32, y as u32);
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Draw line using Bresenham's algorithm
    fn draw_line(&mut self, (x1, y1): (i32, i32), (x2, y2): (i32, i32), rgba: [u8; 4]) {
        let (mut x, mut y) = (x1, y1);

        let dx = (x2 - x).abs();
        let dy = -(y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, rgba);

            if x == x2 && y == y2 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// RGBA byte count for `width` x `height`, None past [`MAX_DIMENSION`]
fn buffer_len(width: u32, height: u32) -> Option<usize> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return None;
    }
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
}

pub fn to_rgba8(color: [f32; 3]) -> [u8; 4] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(color[0]), channel(color[1]), channel(color[2]), 255]
}

impl ImmediateDraw for SoftwareCanvas {
    fn set_view(&mut self, camera: &CameraOrbit) {
        let (eye, target) = (camera.eye(), camera.target());
        // An eye on the up axis through the target has no defined view
        if (target - eye).cross(Vec3::Y).length_squared() <= f32::EPSILON {
            log::debug!("Degenerate camera eye {:?}, keeping previous view", eye);
            return;
        }

        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_Y, self.aspect(), Z_NEAR, Z_FAR);
        let view_proj = proj * view;
        if view_proj.is_finite() {
            self.view_proj = view_proj;
        }
    }

    fn clear_buffer(&mut self, color: [f32; 3]) {
        let rgba = to_rgba8(color);
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    fn draw_wireframe_cube(&mut self, position: Vec3, scale: f32, color: [f32; 3]) {
        let rgba = to_rgba8(color);
        let corners = CUBE_CORNERS.map(|corner| self.project(position + corner * scale));

        for (a, b) in CUBE_EDGES {
            if let (Some(start), Some(end)) = (corners[a], corners[b]) {
                self.draw_line(start, end, rgba);
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let Some(len) = buffer_len(width, height) else {
            log::warn!(
                "Ignoring canvas resize to {}x{}, limit is {} per side",
                width,
                height,
                MAX_DIMENSION
            );
            return;
        };

        self.width = width;
        self.height = height;
        self.pixels = vec![0; len];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_conversion_clamps() {
        assert_eq!(to_rgba8([1.0, 0.0, 0.5]), [255, 0, 128, 255]);
        assert_eq!(to_rgba8([2.0, -1.0, 1.0]), [255, 0, 255, 255]);
    }

    #[test]
    fn test_project_origin_hits_center() {
        let canvas = SoftwareCanvas::new(200, 100);
        let (x, y) = canvas.project(Vec3::ZERO).unwrap();
        assert!((x - 100).abs() <= 1);
        assert!((y - 50).abs() <= 1);
    }

    #[test]
    fn test_point_behind_camera_is_culled() {
        let canvas = SoftwareCanvas::new(100, 100);
        // default eye is at (0, 2, 5) looking at the origin
        assert!(canvas.project(Vec3::new(0.0, 2.0, 20.0)).is_none());
    }

    #[test]
    fn test_line_stays_in_bounds() {
        let mut canvas = SoftwareCanvas::new(10, 10);
        canvas.draw_line((-5, -5), (20, 20), [255; 4]);
        assert_eq!(canvas.pixels().len(), 10 * 10 * 4);
        assert_eq!(canvas.pixel(0, 0), Some([255; 4]));
        assert_eq!(canvas.pixel(9, 9), Some([255; 4]));
    }

    #[test]
    fn test_oversized_resize_keeps_buffer() {
        let mut canvas = SoftwareCanvas::new(16, 8);
        canvas.resize(70_000, 70_000);
        assert_eq!(canvas.dimensions(), (16, 8));
        assert_eq!(canvas.pixels().len(), 16 * 8 * 4);

        canvas.resize(u32::MAX, 1);
        assert_eq!(canvas.dimensions(), (16, 8));

        canvas.resize(MAX_DIMENSION, 2);
        assert_eq!(canvas.dimensions(), (MAX_DIMENSION, 2));
        assert_eq!(canvas.pixels().len(), MAX_DIMENSION as usize * 2 * 4);
    }

    #[test]
    fn test_oversized_new_is_clamped() {
        let canvas = SoftwareCanvas::new(100_000, 3);
        assert_eq!(canvas.dimensions(), (MAX_DIMENSION, 3));
        assert_eq!(canvas.pixels().len(), MAX_DIMENSION as usize * 3 * 4);
    }

    #[test]
    fn test_buffer_len_rejects_overflow() {
        assert_eq!(buffer_len(2, 3), Some(24));
        assert_eq!(buffer_len(u32::MAX, u32::MAX), None);
        assert_eq!(buffer_len(MAX_DIMENSION + 1, 1), None);
    }

    #[test]
    fn test_degenerate_eye_keeps_previous_view() {
        let mut canvas = SoftwareCanvas::new(200, 100);
        let before = canvas.project(Vec3::ZERO);

        canvas.set_view(&CameraOrbit::new(0.3, 0.0, 0.0));
        assert_eq!(canvas.project(Vec3::ZERO), before);

        canvas.set_view(&CameraOrbit::new(1.0, 0.0, 4.0));
        assert_eq!(canvas.project(Vec3::ZERO), before);
    }

    #[test]
    fn test_degenerate_eye_still_draws_cube() {
        let mut canvas = SoftwareCanvas::new(64, 64);
        canvas.set_view(&CameraOrbit::new(0.0, 0.0, 0.0));
        canvas.clear_buffer([0.0; 3]);
        canvas.draw_wireframe_cube(Vec3::ZERO, 1.0, [1.0, 0.0, 0.0]);

        // lines spread across the image instead of collapsing onto (0, 0)
        assert!(canvas.count_pixels([255, 0, 0, 255]) > 4);
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_ppm_header() {
        let canvas = SoftwareCanvas::new(3, 2);
        let mut out = Vec::new();
        canvas.write_ppm(&mut out).unwrap();
        assert!(out.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(out.len(), b"P6\n3 2\n255\n".len() + 3 * 2 * 3);
    }
}
