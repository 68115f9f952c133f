use flappy_engine::renderer::{Color, ColorStop, Paint, Path, PathEvent, Rect, RenderLayer, Surface};
use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// [`Surface`] backed by a `<canvas>` 2D context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Look up `<canvas id=...>` and take its 2D context.
    pub fn from_canvas_id(canvas_id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("'{canvas_id}' is not a canvas")))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self::new(ctx))
    }

    fn set_fill(&self, paint: Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            Paint::LinearGradient { start, end, stops } => {
                let gradient = self.ctx.create_linear_gradient(
                    start.x as f64,
                    start.y as f64,
                    end.x as f64,
                    end.y as f64,
                );
                self.set_gradient_fill(&gradient, stops);
            }
            Paint::RadialGradient {
                center,
                inner_radius,
                outer_radius,
                stops,
            } => match self.ctx.create_radial_gradient(
                center.x as f64,
                center.y as f64,
                inner_radius as f64,
                center.x as f64,
                center.y as f64,
                outer_radius as f64,
            ) {
                Ok(gradient) => self.set_gradient_fill(&gradient, stops),
                Err(err) => {
                    warn("createRadialGradient", err);
                    if let Some(last) = stops.last() {
                        self.ctx.set_fill_style_str(&last.color.to_css());
                    }
                }
            },
        }
    }

    fn set_gradient_fill(&self, gradient: &CanvasGradient, stops: &[ColorStop]) {
        for stop in stops {
            if let Err(err) = gradient.add_color_stop(stop.offset, &stop.color.to_css()) {
                warn("addColorStop", err);
            }
        }
        self.ctx.set_fill_style_canvas_gradient(gradient);
    }

    fn trace(&self, path: &Path) {
        self.ctx.begin_path();
        for event in path.iter() {
            match event {
                PathEvent::Begin { at } => self.ctx.move_to(at.x as f64, at.y as f64),
                PathEvent::Line { to, .. } => self.ctx.line_to(to.x as f64, to.y as f64),
                PathEvent::Quadratic { ctrl, to, .. } => self.ctx.quadratic_curve_to(
                    ctrl.x as f64,
                    ctrl.y as f64,
                    to.x as f64,
                    to.y as f64,
                ),
                PathEvent::Cubic {
                    ctrl1, ctrl2, to, ..
                } => self.ctx.bezier_curve_to(
                    ctrl1.x as f64,
                    ctrl1.y as f64,
                    ctrl2.x as f64,
                    ctrl2.y as f64,
                    to.x as f64,
                    to.y as f64,
                ),
                PathEvent::End { close, .. } => {
                    if close {
                        self.ctx.close_path();
                    }
                }
            }
        }
    }
}

fn warn(what: &str, err: JsValue) {
    log::warn!("canvas {what} failed: {err:?}");
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_rect(&mut self, rect: Rect, paint: Paint) {
        self.set_fill(paint);
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: Paint) {
        self.set_fill(paint);
        self.ctx.begin_path();
        let traced = self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radii.x as f64,
            radii.y as f64,
            rotation as f64,
            0.0,
            std::f64::consts::TAU,
        );
        match traced {
            Ok(()) => self.ctx.fill(),
            Err(err) => warn("ellipse", err),
        }
    }

    fn fill_path(&mut self, path: &Path, paint: Paint) {
        self.set_fill(paint);
        self.trace(path);
        self.ctx.fill();
    }

    fn draw_image(&mut self, image: &HtmlImageElement, rect: Rect) {
        if let Err(err) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        ) {
            warn("drawImage", err);
        }
    }

    /// Broken or still-loading images report `complete` with no natural size, or not complete.
    fn image_ready(&self, image: &HtmlImageElement) -> bool {
        image.complete() && image.natural_width() > 0
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        if let Err(err) = self.ctx.translate(offset.x as f64, offset.y as f64) {
            warn("translate", err);
        }
    }

    fn rotate(&mut self, radians: f32) {
        if let Err(err) = self.ctx.rotate(radians as f64) {
            warn("rotate", err);
        }
    }

    fn begin_layer(&mut self, layer: RenderLayer) {
        log::trace!("layer {layer:?}");
    }
}
