pub mod layer;
pub mod pipeline;
pub mod recording;
pub mod surface;

pub use layer::RenderLayer;
pub use lyon::path::{Path, PathEvent};
pub use pipeline::Pipeline;
pub use surface::{Color, ColorStop, Paint, Rect, Surface};
