//! Explicit Euler integration for the player.
//!
//! One call to [`Player::integrate`] is one simulation step. Only the vertical axis moves;
//! the world scrolls past a player whose `x` never changes.

use glam::Vec2;

use crate::api::game::GameConfig;

/// The player entity. `pos` is the top-left corner of its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Vertical velocity in pixels per step, positive is down.
    pub velocity: f32,
    pub size: Vec2,
    /// Cosmetic tilt in radians, derived from velocity. Never read by the simulation.
    pub rotation: f32,
}

impl Player {
    /// Canonical start position and velocity for a new session.
    pub fn spawn(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::new(config.player_x, config.player_start_y()),
            velocity: 0.0,
            size: Vec2::new(config.player_width, config.player_height),
            rotation: 0.0,
        }
    }

    /// Center of the player's box; the only point collisions are tested against.
    pub fn centroid(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Replace the current velocity with the flap impulse.
    pub fn flap(&mut self, config: &GameConfig) {
        self.velocity = config.flap_impulse;
    }

    /// Advance one step: gravity into velocity, velocity into position.
    pub fn integrate(&mut self, config: &GameConfig) {
        self.velocity += config.gravity;
        self.pos.y += self.velocity;
        self.rotation = tilt_for(self.velocity, config);
    }
}

/// Clamped linear map from vertical velocity to a tilt angle.
pub fn tilt_for(velocity: f32, config: &GameConfig) -> f32 {
    (velocity * config.rotation_factor).clamp(config.min_rotation, config.max_rotation)
}
