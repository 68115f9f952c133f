use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;
use crate::api::types::{GameEvent, SoundCue};

/// How the frame loop turns display refreshes into simulation steps.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Pacing {
    /// One simulation step per display refresh (frame-coupled).
    #[default]
    PerFrame,
    /// Fixed-rate steps fed by an accumulator, independent of refresh rate.
    Fixed { hz: f32 },
}

/// Configuration for the engine.
///
/// Every field has a default, so a JSON document only needs the fields it overrides.
/// Distances are in playfield pixels, velocities in pixels per step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width.
    pub world_width: f32,
    /// Playfield height, ground band included.
    pub world_height: f32,
    /// Added to the player's vertical velocity every step (positive is down).
    pub gravity: f32,
    /// Velocity a flap sets, overriding the current one. Negative is up.
    pub flap_impulse: f32,
    /// Horizontal distance obstacles (and the ground pattern) scroll per step.
    pub obstacle_speed: f32,
    /// Minimum session time between two obstacle spawns.
    pub spawn_interval_ms: f64,
    pub obstacle_width: f32,
    /// Vertical opening between the top and bottom pillar.
    pub gap_size: f32,
    /// Height of the solid band at the bottom of the playfield.
    pub ground_height: f32,
    /// Smallest top pillar height; the same margin is kept above the ground.
    pub min_top_height: f32,
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Width of one repetition of the ground decoration.
    pub ground_tile_width: f32,
    /// Radians of tilt per unit of vertical velocity.
    pub rotation_factor: f32,
    pub min_rotation: f32,
    pub max_rotation: f32,
    /// Seed for obstacle gap placement.
    pub seed: u64,
    pub pacing: Pacing,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 400.0,
            world_height: 600.0,
            gravity: 0.4,
            flap_impulse: -7.0,
            obstacle_speed: 3.0,
            spawn_interval_ms: 2000.0,
            obstacle_width: 60.0,
            gap_size: 150.0,
            ground_height: 80.0,
            min_top_height: 50.0,
            player_x: 100.0,
            player_width: 40.0,
            player_height: 30.0,
            ground_tile_width: 20.0,
            rotation_factor: 0.05,
            min_rotation: -0.5,
            max_rotation: 1.2,
            seed: 0x5eed_f1a9,
            pacing: Pacing::PerFrame,
        }
    }
}

impl GameConfig {
    /// Parse a config from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Y coordinate of the top of the ground band.
    pub fn ground_line(&self) -> f32 {
        self.world_height - self.ground_height
    }

    /// Canonical top-left y of the player at session start.
    pub fn player_start_y(&self) -> f32 {
        self.world_height / 2.0 - self.ground_height / 2.0
    }

    /// Half-open range `[min, max)` the top pillar height is drawn from.
    pub fn top_height_range(&self) -> (f32, f32) {
        let max = self.ground_line() - self.gap_size - self.min_top_height;
        (self.min_top_height, max)
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut finite = vec![
            ("world_width", f64::from(self.world_width)),
            ("world_height", f64::from(self.world_height)),
            ("gravity", f64::from(self.gravity)),
            ("flap_impulse", f64::from(self.flap_impulse)),
            ("obstacle_speed", f64::from(self.obstacle_speed)),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("obstacle_width", f64::from(self.obstacle_width)),
            ("gap_size", f64::from(self.gap_size)),
            ("ground_height", f64::from(self.ground_height)),
            ("min_top_height", f64::from(self.min_top_height)),
            ("player_x", f64::from(self.player_x)),
            ("player_width", f64::from(self.player_width)),
            ("player_height", f64::from(self.player_height)),
            ("ground_tile_width", f64::from(self.ground_tile_width)),
            ("rotation_factor", f64::from(self.rotation_factor)),
            ("min_rotation", f64::from(self.min_rotation)),
            ("max_rotation", f64::from(self.max_rotation)),
        ];
        if let Pacing::Fixed { hz } = self.pacing {
            finite.push(("pacing.hz", f64::from(hz)));
        }
        // JSON numbers beyond f32 range deserialize to infinity.
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, format!("must be finite, got {value}")));
            }
        }

        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("obstacle_speed", self.obstacle_speed),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("ground_tile_width", self.ground_tile_width),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }
        if !(self.spawn_interval_ms > 0.0) {
            return Err(ConfigError::invalid(
                "spawn_interval_ms",
                format!("must be positive, got {}", self.spawn_interval_ms),
            ));
        }
        if self.ground_height < 0.0 || self.min_top_height < 0.0 || self.gravity < 0.0 {
            return Err(ConfigError::invalid(
                "ground_height/min_top_height/gravity",
                "must not be negative".to_string(),
            ));
        }
        if !(self.flap_impulse < 0.0) {
            return Err(ConfigError::invalid(
                "flap_impulse",
                format!("must point upward (negative), got {}", self.flap_impulse),
            ));
        }
        let (min_top, max_top) = self.top_height_range();
        if max_top <= min_top {
            return Err(ConfigError::invalid(
                "gap_size",
                format!(
                    "a {} gap leaves no room for pillars of at least {} above a ground line at {}",
                    self.gap_size,
                    self.min_top_height,
                    self.ground_line()
                ),
            ));
        }
        if self.min_rotation > self.max_rotation {
            return Err(ConfigError::invalid(
                "min_rotation",
                format!("{} exceeds max_rotation {}", self.min_rotation, self.max_rotation),
            ));
        }
        if let Pacing::Fixed { hz } = self.pacing {
            if !(hz > 0.0) {
                return Err(ConfigError::invalid("pacing.hz", format!("must be positive, got {hz}")));
            }
        }
        Ok(())
    }
}

/// Everything one step (or one command) emitted, in emission order per kind.
/// The harness dispatches it to the audio and lifecycle collaborators after the step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outbox {
    pub sounds: Vec<SoundCue>,
    pub events: Vec<GameEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a sound cue for the audio notifier.
    pub fn emit_sound(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }

    /// Queue a lifecycle event for the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Move everything from `other` to the end of this outbox.
    pub fn append(&mut self, other: &mut Outbox) {
        self.sounds.append(&mut other.sounds);
        self.events.append(&mut other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty() && self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ground_line(), 520.0);
        assert_eq!(config.player_start_y(), 260.0);
        assert_eq!(config.top_height_range(), (50.0, 320.0));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "gravity": 0.5, "seed": 7 }"#).unwrap();
        assert_eq!(config.gravity, 0.5);
        assert_eq!(config.seed, 7);
        assert_eq!(config.gap_size, 150.0);
        assert_eq!(config.pacing, Pacing::PerFrame);
    }

    #[test]
    fn parses_fixed_pacing() {
        let config =
            GameConfig::from_json(r#"{ "pacing": { "mode": "fixed", "hz": 60.0 } }"#).unwrap();
        assert_eq!(config.pacing, Pacing::Fixed { hz: 60.0 });
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn gap_that_cannot_fit_is_rejected() {
        let err = GameConfig::from_json(r#"{ "gap_size": 500.0 }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "gap_size"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn downward_flap_is_rejected() {
        let config = GameConfig {
            flap_impulse: 3.0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_spawn_interval_is_rejected() {
        let config = GameConfig {
            spawn_interval_ms: 0.0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_rotation_range_is_rejected() {
        let config = GameConfig {
            min_rotation: 1.0,
            max_rotation: 0.5,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        let err = GameConfig::from_json(r#"{ "world_height": 1e39 }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "world_height"),
            other => panic!("expected Invalid, got {other:?}"),
        }

        let config = GameConfig {
            gravity: f32::INFINITY,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "gravity", .. })));

        let config = GameConfig {
            player_x: f32::NAN,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            pacing: Pacing::Fixed { hz: f32::INFINITY },
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "pacing.hz", .. })));
    }

    #[test]
    fn outbox_append_moves_everything() {
        let mut a = Outbox::new();
        a.emit_sound(SoundCue::Flap);
        let mut b = Outbox::new();
        b.emit_sound(SoundCue::Score);
        b.emit_event(GameEvent::ScoreChanged(1));

        a.append(&mut b);
        assert!(b.is_empty());
        assert_eq!(a.sounds, vec![SoundCue::Flap, SoundCue::Score]);
        assert_eq!(a.events, vec![GameEvent::ScoreChanged(1)]);
    }
}
