//! A [`Surface`] that records draw calls instead of rasterizing them.
//! Used to test render order and fallbacks without a browser.

use glam::Vec2;
use lyon::path::Path;

use super::layer::RenderLayer;
use super::surface::{Color, Paint, Rect, Surface};

/// Stand-in for a host image.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedImage {
    pub name: String,
    pub ready: bool,
}

impl RecordedImage {
    pub fn ready(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ready: true,
        }
    }

    /// An image that has not finished decoding.
    pub fn loading(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ready: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    Layer(RenderLayer),
    FillRect { rect: Rect, paint: Paint },
    StrokeRect { rect: Rect, color: Color, line_width: f32 },
    FillEllipse { center: Vec2, radii: Vec2, rotation: f32, paint: Paint },
    /// Only the number of path events is kept.
    FillPath { events: usize, paint: Paint },
    Image { name: String, rect: Rect },
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Layers in the order their passes began.
    pub fn layers(&self) -> Vec<RenderLayer> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Layer(layer) => Some(*layer),
                _ => None,
            })
            .collect()
    }

    /// Commands issued between the start of `layer` and the start of the next pass.
    pub fn commands_in(&self, layer: RenderLayer) -> Vec<DrawCommand> {
        self.commands
            .iter()
            .skip_while(|c| **c != DrawCommand::Layer(layer))
            .skip(1)
            .take_while(|c| !matches!(c, DrawCommand::Layer(_)))
            .cloned()
            .collect()
    }
}

impl Surface for RecordingSurface {
    type Image = RecordedImage;

    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_rect(&mut self, rect: Rect, paint: Paint) {
        self.commands.push(DrawCommand::FillRect { rect, paint });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect { rect, color, line_width });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: Paint) {
        self.commands.push(DrawCommand::FillEllipse { center, radii, rotation, paint });
    }

    fn fill_path(&mut self, path: &Path, paint: Paint) {
        self.commands.push(DrawCommand::FillPath {
            events: path.iter().count(),
            paint,
        });
    }

    fn draw_image(&mut self, image: &RecordedImage, rect: Rect) {
        self.commands.push(DrawCommand::Image {
            name: image.name.clone(),
            rect,
        });
    }

    fn image_ready(&self, image: &RecordedImage) -> bool {
        image.ready
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn begin_layer(&mut self, layer: RenderLayer) {
        self.commands.push(DrawCommand::Layer(layer));
    }
}
