//! Centroid collision and pass scoring.
//!
//! Only the player's center point is tested. A box that clips a pillar while its
//! center stays inside the gap survives.

use crate::api::game::GameConfig;
use crate::core::obstacles::ObstacleField;
use crate::core::physics::Player;

/// What ended the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    /// Centroid at or above the top of the playfield.
    Ceiling,
    /// Centroid at or below the ground line.
    Ground,
    /// Centroid inside an obstacle's span but outside its gap.
    Obstacle { index: usize },
}

/// Test the player's centroid against the playfield bounds and every live obstacle.
pub fn check(player: &Player, obstacles: &ObstacleField, config: &GameConfig) -> Option<Collision> {
    let center = player.centroid();

    if center.y <= 0.0 {
        return Some(Collision::Ceiling);
    }
    if center.y >= config.ground_line() {
        return Some(Collision::Ground);
    }

    obstacles
        .iter()
        .position(|o| o.spans(center.x) && !o.gap_contains(center.y))
        .map(|index| Collision::Obstacle { index })
}

/// Flag every obstacle whose right edge has passed the player's `x`.
/// Returns how many obstacles were newly flagged; already-flagged ones never count again.
pub fn award_passed(player: &Player, obstacles: &mut ObstacleField) -> u32 {
    let mut passed = 0;
    for obstacle in obstacles.iter_mut() {
        if !obstacle.scored && obstacle.right_edge() < player.pos.x {
            obstacle.scored = true;
            passed += 1;
        }
    }
    passed
}
