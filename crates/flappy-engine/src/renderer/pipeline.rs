//! Per-frame scene composition.
//!
//! Reads a [`GameState`] and issues draw calls to a [`Surface`] in layer order:
//! sky and clouds, pipes, ground, then the player. Never mutates the simulation.

use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};

use super::layer::RenderLayer;
use super::surface::{Color, ColorStop, Paint, Rect, Surface};
use crate::api::game::GameConfig;
use crate::core::obstacles::Obstacle;
use crate::core::physics::Player;
use crate::core::session::GameState;

const SKY: &[ColorStop] = &[
    ColorStop::new(0.0, Color::hex(0x60A5FA)),
    ColorStop::new(0.5, Color::hex(0x93C5FD)),
    ColorStop::new(1.0, Color::hex(0xBFDBFE)),
];
const CLOUD: Color = Color::WHITE.with_alpha(0.8);
/// (x, y, scale) of each cloud.
const CLOUDS: [(f32, f32, f32); 3] = [(50.0, 80.0, 1.0), (200.0, 120.0, 0.7), (320.0, 60.0, 0.9)];
/// (dx, dy, radius) of each puff, before scaling.
const PUFFS: [(f32, f32, f32); 4] = [
    (0.0, 0.0, 20.0),
    (25.0, -10.0, 25.0),
    (50.0, 0.0, 20.0),
    (25.0, 5.0, 15.0),
];

const PIPE_BODY: &[ColorStop] = &[
    ColorStop::new(0.0, Color::hex(0x15803D)),
    ColorStop::new(0.3, Color::hex(0x22C55E)),
    ColorStop::new(0.7, Color::hex(0x22C55E)),
    ColorStop::new(1.0, Color::hex(0x15803D)),
];
const PIPE_CAP: Color = Color::hex(0x16A34A);
const PIPE_CAP_EDGE: Color = Color::hex(0x15803D);
const CAP_OVERHANG: f32 = 5.0;
const CAP_HEIGHT: f32 = 25.0;

const SOIL: &[ColorStop] = &[
    ColorStop::new(0.0, Color::hex(0x92400E)),
    ColorStop::new(0.3, Color::hex(0xA16207)),
    ColorStop::new(1.0, Color::hex(0x78350F)),
];
const GRASS: Color = Color::hex(0x22C55E);
const GRASS_HEIGHT: f32 = 15.0;
const BLADE: Color = Color::hex(0x16A34A);
const BLADE_WIDTH: f32 = 10.0;

const BODY: &[ColorStop] = &[
    ColorStop::new(0.0, Color::hex(0xFFE066)),
    ColorStop::new(1.0, Color::hex(0xF59E0B)),
];
const PUPIL: Color = Color::hex(0x1A1A1A);
const BEAK: Color = Color::hex(0xEF4444);
const WING: Color = Color::hex(0xD97706);

/// Draws the scene. Holds the paths that never change between frames.
#[derive(Debug, Clone)]
pub struct Pipeline {
    clouds: Path,
    beak: Path,
}

impl Pipeline {
    pub fn new() -> Self {
        let mut clouds = Path::builder();
        for (x, y, scale) in CLOUDS {
            for (dx, dy, radius) in PUFFS {
                clouds.add_circle(
                    point(x + dx * scale, y + dy * scale),
                    radius * scale,
                    Winding::Positive,
                );
            }
        }

        let mut beak = Path::builder();
        beak.begin(point(15.0, 0.0));
        beak.line_to(point(25.0, 3.0));
        beak.line_to(point(15.0, 6.0));
        beak.end(true);

        Self {
            clouds: clouds.build(),
            beak: beak.build(),
        }
    }

    /// Render one frame of `state`. `skin` replaces the player glyph once the surface
    /// reports it ready; until then, or when absent, the glyph is drawn.
    pub fn draw<S: Surface>(&self, surface: &mut S, state: &GameState, skin: Option<&S::Image>) {
        let config = state.config();
        let world = state.world();

        surface.clear(config.world_width, config.world_height);

        surface.begin_layer(RenderLayer::Background);
        self.draw_sky(surface, config);

        surface.begin_layer(RenderLayer::Obstacles);
        for obstacle in world.obstacles.iter() {
            draw_obstacle(surface, obstacle, config);
        }

        surface.begin_layer(RenderLayer::Terrain);
        draw_ground(surface, config, world.ground_offset);

        surface.begin_layer(RenderLayer::Player);
        self.draw_player(surface, &world.player, skin);
    }

    fn draw_sky<S: Surface>(&self, surface: &mut S, config: &GameConfig) {
        let horizon = config.ground_line();
        surface.fill_rect(
            Rect::new(0.0, 0.0, config.world_width, horizon),
            Paint::LinearGradient {
                start: Vec2::ZERO,
                end: Vec2::new(0.0, horizon),
                stops: SKY,
            },
        );
        surface.fill_path(&self.clouds, CLOUD.into());
    }

    fn draw_player<S: Surface>(&self, surface: &mut S, player: &Player, skin: Option<&S::Image>) {
        let half = player.size / 2.0;
        surface.save();
        surface.translate(player.centroid());
        surface.rotate(player.rotation);

        match skin.filter(|image| surface.image_ready(image)) {
            Some(image) => {
                surface.draw_image(image, Rect::new(-half.x, -half.y, player.size.x, player.size.y));
            }
            None => {
                surface.fill_ellipse(
                    Vec2::ZERO,
                    half,
                    0.0,
                    Paint::RadialGradient {
                        center: Vec2::ZERO,
                        inner_radius: 5.0,
                        outer_radius: half.x,
                        stops: BODY,
                    },
                );
                // eye
                surface.fill_ellipse(Vec2::new(8.0, -5.0), Vec2::splat(8.0), 0.0, Color::WHITE.into());
                surface.fill_ellipse(Vec2::new(10.0, -5.0), Vec2::splat(4.0), 0.0, PUPIL.into());
                surface.fill_path(&self.beak, BEAK.into());
                surface.fill_ellipse(Vec2::new(-5.0, 5.0), Vec2::new(10.0, 6.0), -0.3, WING.into());
            }
        }

        surface.restore();
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_obstacle<S: Surface>(surface: &mut S, obstacle: &Obstacle, config: &GameConfig) {
    let body = Paint::LinearGradient {
        start: Vec2::new(obstacle.x, 0.0),
        end: Vec2::new(obstacle.right_edge(), 0.0),
        stops: PIPE_BODY,
    };
    let cap_x = obstacle.x - CAP_OVERHANG;
    let cap_width = obstacle.width + CAP_OVERHANG * 2.0;

    surface.fill_rect(Rect::new(obstacle.x, 0.0, obstacle.width, obstacle.top_height), body);
    let top_cap = Rect::new(cap_x, obstacle.top_height - CAP_HEIGHT, cap_width, CAP_HEIGHT);
    surface.fill_rect(top_cap, PIPE_CAP.into());
    surface.stroke_rect(top_cap, PIPE_CAP_EDGE, 2.0);

    let bottom_height = config.ground_line() - obstacle.bottom_y;
    surface.fill_rect(Rect::new(obstacle.x, obstacle.bottom_y, obstacle.width, bottom_height), body);
    let bottom_cap = Rect::new(cap_x, obstacle.bottom_y, cap_width, CAP_HEIGHT);
    surface.fill_rect(bottom_cap, PIPE_CAP.into());
    surface.stroke_rect(bottom_cap, PIPE_CAP_EDGE, 2.0);
}

fn draw_ground<S: Surface>(surface: &mut S, config: &GameConfig, offset: f32) {
    let top = config.ground_line();
    surface.fill_rect(
        Rect::new(0.0, top, config.world_width, config.ground_height),
        Paint::LinearGradient {
            start: Vec2::new(0.0, top),
            end: Vec2::new(0.0, config.world_height),
            stops: SOIL,
        },
    );
    surface.fill_rect(Rect::new(0.0, top, config.world_width, GRASS_HEIGHT), GRASS.into());
    surface.fill_path(&grass_blades(config, offset), BLADE.into());
}

/// One triangle per tile, shifted left by the scroll offset so the grass moves with the pipes.
fn grass_blades(config: &GameConfig, offset: f32) -> Path {
    let top = config.ground_line();
    let mut blades = Path::builder();
    let mut x = -offset;
    while x < config.world_width {
        blades.begin(point(x, top + GRASS_HEIGHT));
        blades.line_to(point(x + BLADE_WIDTH / 2.0, top));
        blades.line_to(point(x + BLADE_WIDTH, top + GRASS_HEIGHT));
        blades.end(true);
        x += config.ground_tile_width;
    }
    blades.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Command;
    use crate::core::session::Frame;
    use crate::renderer::recording::{DrawCommand, RecordedImage, RecordingSurface};
    use lyon::path::PathEvent;

    fn running_with_obstacles(frames: usize) -> GameState {
        let mut state = GameState::new(GameConfig::default());
        state.apply(Command::Start);
        for _ in 0..frames {
            state.advance(&Frame::tick(16.0));
        }
        state
    }

    #[test]
    fn layers_are_drawn_back_to_front() {
        let state = running_with_obstacles(3);
        let mut surface = RecordingSurface::new();
        Pipeline::new().draw(&mut surface, &state, None);

        assert!(matches!(surface.commands()[0], DrawCommand::Clear { .. }));
        assert_eq!(surface.layers(), RenderLayer::ORDER.to_vec());
    }

    #[test]
    fn each_obstacle_draws_two_bodies_and_two_caps() {
        let state = running_with_obstacles(1);
        assert_eq!(state.world().obstacles.len(), 1);
        let mut surface = RecordingSurface::new();
        Pipeline::new().draw(&mut surface, &state, None);

        let pass = surface.commands_in(RenderLayer::Obstacles);
        let fills = pass.iter().filter(|c| matches!(c, DrawCommand::FillRect { .. })).count();
        let strokes = pass.iter().filter(|c| matches!(c, DrawCommand::StrokeRect { .. })).count();
        assert_eq!(fills, 4);
        assert_eq!(strokes, 2);
    }

    #[test]
    fn bottom_pipe_stops_at_ground() {
        let state = running_with_obstacles(1);
        let obstacle = state.world().obstacles.as_slice()[0];
        let mut surface = RecordingSurface::new();
        Pipeline::new().draw(&mut surface, &state, None);

        let bottom = surface
            .commands_in(RenderLayer::Obstacles)
            .into_iter()
            .find_map(|c| match c {
                DrawCommand::FillRect { rect, .. } if rect.y == obstacle.bottom_y && rect.x == obstacle.x => {
                    Some(rect)
                }
                _ => None,
            })
            .unwrap();
        assert!((bottom.y + bottom.height - 520.0).abs() < 1e-3);
    }

    #[test]
    fn missing_skin_draws_glyph() {
        let state = running_with_obstacles(0);
        let mut surface = RecordingSurface::new();
        Pipeline::new().draw(&mut surface, &state, None);

        let player = surface.commands_in(RenderLayer::Player);
        assert!(!player.iter().any(|c| matches!(c, DrawCommand::Image { .. })));
        let ellipses = player.iter().filter(|c| matches!(c, DrawCommand::FillEllipse { .. })).count();
        assert_eq!(ellipses, 4);
    }

    #[test]
    fn unready_skin_falls_back_to_glyph() {
        let state = running_with_obstacles(0);
        let skin = RecordedImage::loading("skin.png");
        let mut surface = RecordingSurface::new();
        Pipeline::new().draw(&mut surface, &state, Some(&skin));

        let player = surface.commands_in(RenderLayer::Player);
        assert!(!player.iter().any(|c| matches!(c, DrawCommand::Image { .. })));
        assert!(player.iter().any(|c| matches!(c, DrawCommand::FillEllipse { .. })));
    }

    #[test]
    fn ready_skin_replaces_glyph_around_centroid() {
        let state = running_with_obstacles(0);
        let skin = RecordedImage::ready("skin.png");
        let mut surface = RecordingSurface::new();
        Pipeline::new().draw(&mut surface, &state, Some(&skin));

        let player = surface.commands_in(RenderLayer::Player);
        assert_eq!(
            player,
            vec![
                DrawCommand::Save,
                DrawCommand::Translate(Vec2::new(120.0, 275.0)),
                DrawCommand::Rotate(0.0),
                DrawCommand::Image {
                    name: "skin.png".to_string(),
                    rect: Rect::new(-20.0, -15.0, 40.0, 30.0),
                },
                DrawCommand::Restore,
            ]
        );
    }

    #[test]
    fn grass_scrolls_with_offset() {
        let config = GameConfig::default();
        let first_x = |offset| {
            grass_blades(&config, offset)
                .iter()
                .find_map(|event| match event {
                    PathEvent::Begin { at } => Some(at.x),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(first_x(0.0), 0.0);
        assert_eq!(first_x(6.0), -6.0);
        let begins = grass_blades(&config, 6.0)
            .iter()
            .filter(|e| matches!(e, PathEvent::Begin { .. }))
            .count();
        assert_eq!(begins, 21);
    }

    #[test]
    fn render_does_not_touch_state() {
        let state = running_with_obstacles(5);
        let before = state.world().clone();
        Pipeline::new().draw(&mut RecordingSurface::new(), &state, None);
        assert_eq!(state.world(), &before);
    }
}
