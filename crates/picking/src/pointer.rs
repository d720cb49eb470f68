//! Screen pixel to normalized device coordinate conversion.

use glam::Vec2;

/// A pointer position in normalized device coordinates.
///
/// `x` grows to the right and `y` grows upward; the viewport maps to
/// `[-1, 1]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Normalized position.
    pub ndc: Vec2,
}

impl PointerSample {
    /// Normalize a pixel position against a viewport of `size` pixels.
    ///
    /// Returns `None` when the viewport has no area.
    pub fn from_screen(position: Vec2, size: (u32, u32)) -> Option<Self> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return None;
        }
        let x = position.x / width as f32 * 2.0 - 1.0;
        let y = -(position.y / height as f32) * 2.0 + 1.0;
        Some(Self {
            ndc: Vec2::new(x, y),
        })
    }
}
