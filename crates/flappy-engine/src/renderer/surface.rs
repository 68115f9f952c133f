//! Drawing-surface abstraction the render pipeline targets.
//!
//! The surface is stateful like a 2D canvas: `save`/`restore` bracket transform changes,
//! and shapes are filled with a [`Paint`] in the current transform.

use std::fmt;

use glam::Vec2;
use lyon::path::Path;

use super::layer::RenderLayer;

/// 8-bit RGB with a float alpha, the way CSS colors are written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from `0xRRGGBB`.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// CSS color string: `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

/// One stop of a gradient; `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// How a shape is filled. Gradient coordinates are in the current transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient {
        start: Vec2,
        end: Vec2,
        stops: &'static [ColorStop],
    },
    RadialGradient {
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        stops: &'static [ColorStop],
    },
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// A 2D drawing target.
///
/// Implemented by the browser canvas and by the recording surface used in tests.
pub trait Surface {
    /// Host image handle a skin is drawn from.
    type Image;

    /// Wipe the `width` x `height` area to transparent.
    fn clear(&mut self, width: f32, height: f32);

    fn fill_rect(&mut self, rect: Rect, paint: Paint);

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);

    /// Fill an ellipse centred on `center`, rotated by `rotation` radians.
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: Paint);

    /// Fill every subpath of `path` (non-zero winding).
    fn fill_path(&mut self, path: &Path, paint: Paint);

    fn draw_image(&mut self, image: &Self::Image, rect: Rect);

    /// Whether `image` has decoded and can be drawn this frame.
    fn image_ready(&self, _image: &Self::Image) -> bool {
        true
    }

    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, offset: Vec2);

    fn rotate(&mut self, radians: f32);

    /// Marks the start of a render pass. Purely informational.
    fn begin_layer(&mut self, _layer: RenderLayer) {}
}
