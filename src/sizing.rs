//! Backing-store sizing for high-density displays.

use crate::backend::GlBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A canvas element: its laid-out size and its pixel buffer.
pub trait Surface {
    /// CSS layout size (`offsetWidth` x `offsetHeight`).
    fn display_size(&self) -> Size;
    /// Device pixel ratio as reported by the host.
    fn pixel_ratio(&self) -> f64;
    fn backing_size(&self) -> Size;
    fn set_backing_size(&self, size: Size);
}

/// Hosts may report nothing usable; fall back to 1:1.
pub fn effective_pixel_ratio(reported: f64) -> f64 {
    if reported.is_finite() && reported > 0.0 {
        reported
    } else {
        1.0
    }
}

pub fn backing_size(display: Size, pixel_ratio: f64) -> Size {
    let ratio = effective_pixel_ratio(pixel_ratio);
    let scale = |v: u32| (f64::from(v) * ratio).round() as u32;
    Size::new(scale(display.width), scale(display.height))
}

/// Resizes the backing store to match the display and updates the viewport,
/// but only when the size actually changed. Returns the new size if it did.
pub fn adjust_canvas_size<S, B>(surface: &S, gl: &B) -> Option<Size>
where
    S: Surface + ?Sized,
    B: GlBackend + ?Sized,
{
    let target = backing_size(surface.display_size(), surface.pixel_ratio());
    if target == surface.backing_size() {
        return None;
    }
    surface.set_backing_size(target);
    let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
    gl.viewport(0, 0, clamp(target.width), clamp(target.height));
    log::debug!("canvas backing store resized to {}x{}", target.width, target.height);
    Some(target)
}
