//! C ABI for host shells.
//!
//! A renderer is an opaque pointer from [`scene_bridge_create`] and must be
//! released with [`scene_bridge_destroy`]. Every other function accepts a null
//! renderer and returns a neutral value for it.

use std::ffi::{c_char, CStr};

use crate::config::RendererConfig;
use crate::renderer::DefaultRenderer;

/// Opaque renderer handle seen by C callers
pub type BridgeRenderer = DefaultRenderer;

unsafe fn with_renderer<T>(
    renderer: *mut BridgeRenderer,
    fallback: T,
    f: impl FnOnce(&mut BridgeRenderer) -> T,
) -> T {
    match renderer.as_mut() {
        Some(renderer) => f(renderer),
        None => fallback,
    }
}

/// Copy `text` into `buf` as a NUL-terminated string, truncating to fit.
/// Returns the full length of `text` in bytes.
unsafe fn copy_c_string(text: &str, buf: *mut c_char, len: usize) -> usize {
    if !buf.is_null() && len > 0 {
        let n = text.len().min(len - 1);
        std::ptr::copy_nonoverlapping(text.as_ptr() as *const c_char, buf, n);
        *buf.add(n) = 0;
    }
    text.len()
}

#[no_mangle]
pub extern "C" fn scene_bridge_create(width: u32, height: u32) -> *mut BridgeRenderer {
    let renderer = DefaultRenderer::from_config(&RendererConfig::new(width, height));
    Box::into_raw(Box::new(renderer))
}

/// # Safety
/// `renderer` must come from [`scene_bridge_create`] and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_destroy(renderer: *mut BridgeRenderer) {
    if !renderer.is_null() {
        drop(Box::from_raw(renderer));
    }
}

/// Render one frame; returns the frame count afterwards.
///
/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_render_frame(renderer: *mut BridgeRenderer, delta_seconds: f32) -> u64 {
    with_renderer(renderer, 0, |r| {
        r.render_frame(delta_seconds);
        r.frame_count()
    })
}

/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_resize(renderer: *mut BridgeRenderer, width: u32, height: u32) {
    with_renderer(renderer, (), |r| r.resize(width, height))
}

/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_set_clear_color(renderer: *mut BridgeRenderer, r: f32, g: f32, b: f32) {
    with_renderer(renderer, (), |renderer| renderer.set_clear_color(r, g, b))
}

/// Returns the new object's index, or -1 for a null renderer.
///
/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_add_object(
    renderer: *mut BridgeRenderer,
    x: f32,
    y: f32,
    z: f32,
    size: f32,
) -> i64 {
    with_renderer(renderer, -1, |r| r.add_object(x, y, z, size) as i64)
}

/// Returns false when `index` is out of range.
///
/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_move_object(
    renderer: *mut BridgeRenderer,
    index: usize,
    x: f32,
    y: f32,
    z: f32,
) -> bool {
    with_renderer(renderer, false, |r| match r.move_object(index, x, y, z) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("move_object rejected: {}", e);
            false
        }
    })
}

/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_enable_native(renderer: *mut BridgeRenderer) -> bool {
    with_renderer(renderer, false, |r| r.enable_native())
}

/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_set_window_handle(renderer: *mut BridgeRenderer, handle: u64) {
    with_renderer(renderer, (), |r| r.set_window_handle(handle))
}

/// Returns whether animation is enabled after the toggle.
///
/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_toggle_animation(renderer: *mut BridgeRenderer) -> bool {
    with_renderer(renderer, false, |r| r.toggle_animation())
}

/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_set_camera_orbit(
    renderer: *mut BridgeRenderer,
    angle: f32,
    distance: f32,
    height: f32,
) {
    with_renderer(renderer, (), |r| r.set_camera_orbit(angle, distance, height))
}

/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_frame_count(renderer: *mut BridgeRenderer) -> u64 {
    with_renderer(renderer, 0, |r| r.frame_count())
}

/// Write the status string into `buf` (NUL-terminated, truncated to `len`).
/// Returns the untruncated length.
///
/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`];
/// `buf` must be null or valid for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_status(renderer: *mut BridgeRenderer, buf: *mut c_char, len: usize) -> usize {
    let status = with_renderer(renderer, "", |r| r.status());
    copy_c_string(status, buf, len)
}

/// Same contract as [`scene_bridge_status`] for the descriptive renderer info.
///
/// # Safety
/// See [`scene_bridge_status`].
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_renderer_info(
    renderer: *mut BridgeRenderer,
    buf: *mut c_char,
    len: usize,
) -> usize {
    let info = with_renderer(renderer, String::new(), |r| r.renderer_info());
    copy_c_string(&info, buf, len)
}

/// Import a JSON scene snapshot. Returns the number of objects added, or -1
/// on a null pointer, invalid UTF-8 or malformed JSON.
///
/// # Safety
/// `renderer` must be null or a live pointer from [`scene_bridge_create`];
/// `json` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn scene_bridge_load_scene_data(renderer: *mut BridgeRenderer, json: *const c_char) -> i64 {
    if json.is_null() {
        return -1;
    }
    let Ok(json) = CStr::from_ptr(json).to_str() else {
        return -1;
    };

    with_renderer(renderer, -1, |r| match r.load_scene_data(json) {
        Ok(added) => added as i64,
        Err(e) => {
            log::warn!("Rejected scene data: {}", e);
            -1
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn status_of(renderer: *mut BridgeRenderer) -> String {
        let mut buf = [0 as c_char; 64];
        unsafe {
            scene_bridge_status(renderer, buf.as_mut_ptr(), buf.len());
            CStr::from_ptr(buf.as_ptr()).to_string_lossy().into_owned()
        }
    }

    #[test]
    fn test_lifecycle() {
        let renderer = scene_bridge_create(64, 48);
        unsafe {
            assert_eq!(scene_bridge_add_object(renderer, 1.0, 2.0, 3.0, 0.5), 1);
            assert!(scene_bridge_move_object(renderer, 1, 0.0, 0.0, 0.0));
            assert!(!scene_bridge_move_object(renderer, 9, 0.0, 0.0, 0.0));
            assert_eq!(scene_bridge_render_frame(renderer, 0.016), 1);
            assert_eq!(scene_bridge_render_frame(renderer, 0.016), 2);
            assert!(!scene_bridge_enable_native(renderer));
            assert_eq!(status_of(renderer), "fallback");
            scene_bridge_destroy(renderer);
        }
    }

    #[test]
    fn test_null_renderer_is_tolerated() {
        let null = ptr::null_mut();
        unsafe {
            assert_eq!(scene_bridge_render_frame(null, 0.1), 0);
            assert_eq!(scene_bridge_add_object(null, 0.0, 0.0, 0.0, 1.0), -1);
            assert!(!scene_bridge_toggle_animation(null));
            scene_bridge_resize(null, 10, 10);
            scene_bridge_destroy(null);
        }
        assert_eq!(status_of(null), "");
    }

    #[test]
    fn test_status_truncates() {
        let renderer = scene_bridge_create(8, 8);
        let mut buf = [0 as c_char; 4];
        unsafe {
            let full = scene_bridge_status(renderer, buf.as_mut_ptr(), buf.len());
            assert_eq!(full, "fallback".len());
            assert_eq!(CStr::from_ptr(buf.as_ptr()).to_str().unwrap(), "fal");
            scene_bridge_destroy(renderer);
        }
    }

    #[test]
    fn test_oversized_dimensions_do_not_abort() {
        let renderer = scene_bridge_create(70_000, 4);
        unsafe {
            assert_eq!(scene_bridge_render_frame(renderer, 0.016), 1);
            scene_bridge_resize(renderer, 70_000, 70_000);
            scene_bridge_resize(renderer, u32::MAX, u32::MAX);
            assert_eq!(scene_bridge_render_frame(renderer, 0.016), 2);
            scene_bridge_destroy(renderer);
        }
    }

    #[test]
    fn test_load_scene_data() {
        let renderer = scene_bridge_create(8, 8);
        let json = c"{\"objects\": [{\"name\": \"cube\", \"position\": [0.0, 1.0, 0.0]}]}";
        let bad = c"not json";
        unsafe {
            assert_eq!(scene_bridge_load_scene_data(renderer, json.as_ptr()), 1);
            assert_eq!(scene_bridge_load_scene_data(renderer, bad.as_ptr()), -1);
            assert_eq!(scene_bridge_load_scene_data(renderer, ptr::null()), -1);
            scene_bridge_destroy(renderer);
        }
    }
}
