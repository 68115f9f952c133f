//! Session controller: the Idle / Running / Terminal state machine and the per-step update.
//!
//! [`step`] is pure: it takes the state by value plus one frame's input and returns the new
//! state with everything it emitted. Nothing here schedules frames or talks to collaborators.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::api::game::{GameConfig, Outbox};
use crate::api::types::{Command, GameEvent, SoundCue};
use crate::core::collision::{self, Collision};
use crate::core::obstacles::ObstacleField;
use crate::core::physics::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No session; nothing is simulated.
    #[default]
    Idle,
    /// A session is being simulated.
    Running,
    /// The session ended on a collision. Its world is frozen for rendering.
    Terminal,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Terminal => "terminal",
        }
    }
}

/// Everything one session owns. Built fresh for every session, never reused.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub player: Player,
    pub obstacles: ObstacleField,
    pub score: u32,
    /// Horizontal phase of the ground decoration, in `[0, ground_tile_width)`.
    pub ground_offset: f32,
    /// Simulated time since the session started.
    pub elapsed_ms: f64,
}

impl World {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            player: Player::spawn(config),
            obstacles: ObstacleField::new(),
            score: 0,
            ground_offset: 0.0,
            elapsed_ms: 0.0,
        }
    }
}

/// Input for one simulation step.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Time covered by this step; drives the spawn timer only.
    pub dt_ms: f64,
    /// Commands applied, in order, before the step simulates.
    pub commands: &'a [Command],
}

impl Frame<'static> {
    /// A step with no commands.
    pub fn tick(dt_ms: f64) -> Self {
        Self {
            dt_ms,
            commands: &[],
        }
    }
}

/// Result of [`step`].
#[derive(Debug, Clone)]
pub struct Step {
    pub state: GameState,
    pub outbox: Outbox,
}

/// The whole simulation: configuration, phase, the current world and the gap generator.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    phase: Phase,
    world: World,
    rng: Pcg32,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            world: World::new(&config),
            rng: Pcg32::seed_from_u64(config.seed),
            phase: Phase::Idle,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn score(&self) -> u32 {
        self.world.score
    }

    /// The "currently playing" flag the host reads.
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Apply one command immediately, outside any frame.
    /// Commands that make no sense in the current phase are ignored.
    pub fn apply(&mut self, command: Command) -> Outbox {
        let mut outbox = Outbox::new();
        self.apply_into(command, &mut outbox);
        outbox
    }

    /// Apply the frame's commands, then simulate one step if a session is running.
    pub fn advance(&mut self, frame: &Frame<'_>) -> Outbox {
        let mut outbox = Outbox::new();
        for &command in frame.commands {
            self.apply_into(command, &mut outbox);
        }
        if self.phase == Phase::Running {
            self.simulate(frame.dt_ms, &mut outbox);
        }
        outbox
    }

    fn apply_into(&mut self, command: Command, outbox: &mut Outbox) {
        match (command, self.phase) {
            (Command::Start, Phase::Idle) | (Command::Restart, Phase::Terminal) => {
                self.begin_session(outbox);
            }
            (Command::Stop, Phase::Running) => {
                log::info!("session stopped at score {}", self.world.score);
                self.world = World::new(&self.config);
                self.phase = Phase::Idle;
            }
            (Command::Activate, Phase::Running) => {
                self.world.player.flap(&self.config);
                outbox.emit_sound(SoundCue::Flap);
            }
            (command, phase) => {
                log::debug!("ignoring {command:?} while {}", phase.name());
            }
        }
    }

    fn begin_session(&mut self, outbox: &mut Outbox) {
        self.world = World::new(&self.config);
        self.phase = Phase::Running;
        outbox.emit_event(GameEvent::ScoreChanged(0));
        log::info!("session started");
    }

    fn simulate(&mut self, dt_ms: f64, outbox: &mut Outbox) {
        let Self {
            config,
            phase,
            world,
            rng,
        } = self;

        world.elapsed_ms += dt_ms;
        world.player.integrate(config);

        if world
            .obstacles
            .spawn_due(world.elapsed_ms, config.spawn_interval_ms)
        {
            let spawned = world.obstacles.spawn(rng, config, world.elapsed_ms);
            log::debug!(
                "obstacle spawned at {:.0} ms, gap {:.1}..{:.1}",
                world.elapsed_ms,
                spawned.top_height,
                spawned.bottom_y
            );
        }
        world.obstacles.advance(config.obstacle_speed);

        // Points are awarded before the collision test so a frame that both passes
        // one obstacle and hits another keeps the point.
        for _ in 0..collision::award_passed(&world.player, &mut world.obstacles) {
            world.score += 1;
            outbox.emit_event(GameEvent::ScoreChanged(world.score));
            outbox.emit_sound(SoundCue::Score);
        }
        world.obstacles.retire();

        world.ground_offset =
            (world.ground_offset + config.obstacle_speed) % config.ground_tile_width;

        if let Some(hit) = collision::check(&world.player, &world.obstacles, config) {
            *phase = Phase::Terminal;
            outbox.emit_sound(SoundCue::Collision);
            outbox.emit_event(GameEvent::GameOver {
                final_score: world.score,
            });
            match hit {
                Collision::Obstacle { index } => {
                    log::info!("game over: hit obstacle #{index}, score {}", world.score)
                }
                other => log::info!("game over: {other:?}, score {}", world.score),
            }
        }
    }
}

/// Pure step: `(state, frame) -> (state, outbox)`.
pub fn step(mut state: GameState, frame: &Frame<'_>) -> Step {
    let outbox = state.advance(frame);
    Step { state, outbox }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::obstacles::Obstacle;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn running() -> GameState {
        let mut state = GameState::new(GameConfig::default());
        state.apply(Command::Start);
        state
    }

    fn game_overs(outbox: &Outbox) -> usize {
        outbox
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count()
    }

    #[test]
    fn new_state_is_idle() {
        let state = GameState::new(GameConfig::default());
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.is_playing());
    }

    #[test]
    fn idle_does_not_simulate() {
        let mut state = GameState::new(GameConfig::default());
        let before = state.world().clone();
        for _ in 0..10 {
            assert!(state.advance(&Frame::tick(FRAME_MS)).is_empty());
        }
        assert_eq!(state.world(), &before);
    }

    #[test]
    fn start_resets_to_canonical_session() {
        let mut state = GameState::new(GameConfig::default());
        let outbox = state.apply(Command::Start);

        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(outbox.events, vec![GameEvent::ScoreChanged(0)]);
        let world = state.world();
        assert_eq!(world.player.pos.y, 260.0);
        assert_eq!(world.player.velocity, 0.0);
        assert_eq!(world.score, 0);
        assert!(world.obstacles.is_empty());
    }

    #[test]
    fn flap_then_one_frame_of_gravity() {
        let mut state = running();
        let config = *state.config();
        let outbox = state.apply(Command::Activate);
        assert_eq!(outbox.sounds, vec![SoundCue::Flap]);
        assert_eq!(state.world().player.velocity, config.flap_impulse);

        state.advance(&Frame::tick(FRAME_MS));
        assert_eq!(
            state.world().player.velocity,
            config.flap_impulse + config.gravity
        );
    }

    #[test]
    fn flap_in_frame_commands_applies_before_physics() {
        let state = running();
        let config = *state.config();
        let Step { state, outbox } = step(
            state,
            &Frame {
                dt_ms: FRAME_MS,
                commands: &[Command::Activate],
            },
        );
        assert_eq!(outbox.sounds.first(), Some(&SoundCue::Flap));
        assert_eq!(
            state.world().player.velocity,
            config.flap_impulse + config.gravity
        );
    }

    #[test]
    fn velocity_rises_by_gravity_each_frame() {
        let mut state = running();
        let gravity = state.config().gravity;
        for _ in 0..20 {
            let before = state.world().player.velocity;
            state.advance(&Frame::tick(FRAME_MS));
            assert_eq!(state.world().player.velocity, before + gravity);
        }
    }

    #[test]
    fn activate_is_ignored_outside_running() {
        let mut idle = GameState::new(GameConfig::default());
        assert!(idle.apply(Command::Activate).is_empty());
        assert_eq!(idle.world().player.velocity, 0.0);

        let mut state = running();
        state.world.player.pos.y = 600.0;
        state.advance(&Frame::tick(FRAME_MS));
        assert_eq!(state.phase(), Phase::Terminal);
        let frozen = state.world().clone();
        assert!(state.apply(Command::Activate).is_empty());
        assert_eq!(state.world(), &frozen);
    }

    #[test]
    fn first_obstacle_spawns_on_first_running_frame() {
        let mut state = running();
        state.advance(&Frame::tick(FRAME_MS));
        let config = *state.config();
        assert_eq!(state.world().obstacles.len(), 1);
        assert_eq!(
            state.world().obstacles.as_slice()[0].x,
            config.world_width - config.obstacle_speed
        );
    }

    #[test]
    fn spawn_spacing_is_time_driven() {
        let mut state = running();
        state.advance(&Frame::tick(FRAME_MS));
        assert_eq!(state.world().obstacles.len(), 1);

        state.advance(&Frame::tick(1999.0));
        assert_eq!(state.world().obstacles.len(), 1);

        state.advance(&Frame::tick(2.0));
        assert_eq!(state.world().obstacles.len(), 2);
    }

    #[test]
    fn score_counts_each_obstacle_once() {
        let mut state = running();
        let config = *state.config();
        state
            .world
            .obstacles
            .push(Obstacle::new(30.0, 100.0, &config));

        let outbox = state.advance(&Frame::tick(FRAME_MS));
        assert_eq!(state.score(), 1);
        assert_eq!(outbox.events, vec![GameEvent::ScoreChanged(1)]);
        assert_eq!(outbox.sounds, vec![SoundCue::Score]);

        for _ in 0..5 {
            let outbox = state.advance(&Frame::tick(FRAME_MS));
            assert!(outbox.events.is_empty());
        }
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn score_never_decreases_over_a_session() {
        // Gaps so tall that a hovering player threads every one of them.
        let config = GameConfig {
            gap_size: 490.0,
            min_top_height: 10.0,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config);
        state.apply(Command::Start);
        let mut last = 0;
        for i in 0..300 {
            if i % 40 == 0 {
                state
                    .world
                    .obstacles
                    .push(Obstacle::new(config.player_x + 10.0, 0.0, &config));
            }
            state.world.player.pos.y = 260.0;
            state.world.player.velocity = 0.0;
            state.advance(&Frame::tick(FRAME_MS));
            assert!(state.score() >= last);
            last = state.score();
        }
        assert!(last >= 7);
    }

    #[test]
    fn simultaneous_score_and_collision_keeps_the_point() {
        let mut state = running();
        let config = *state.config();
        state
            .world
            .obstacles
            .push(Obstacle::new(30.0, 100.0, &config));
        // Spans the centroid x with a gap far below the player.
        state
            .world
            .obstacles
            .push(Obstacle::new(100.0, 400.0, &config));

        let outbox = state.advance(&Frame::tick(FRAME_MS));
        assert_eq!(state.phase(), Phase::Terminal);
        assert_eq!(
            outbox.events,
            vec![
                GameEvent::ScoreChanged(1),
                GameEvent::GameOver { final_score: 1 }
            ]
        );
        assert_eq!(outbox.sounds, vec![SoundCue::Score, SoundCue::Collision]);
    }

    #[test]
    fn free_fall_hits_the_ground_once() {
        let mut state = running();
        let ground = state.config().ground_line();
        let mut over = 0;
        let mut hit_frame = None;
        for frame in 0..200 {
            let outbox = state.advance(&Frame::tick(FRAME_MS));
            if game_overs(&outbox) > 0 {
                hit_frame.get_or_insert(frame);
                assert!(state.world().player.centroid().y >= ground);
                assert_eq!(
                    outbox.events.last(),
                    Some(&GameEvent::GameOver {
                        final_score: state.score()
                    })
                );
            }
            over += game_overs(&outbox);
        }
        assert_eq!(over, 1);
        assert_eq!(state.phase(), Phase::Terminal);
        // 0.2 * n * (n + 1) >= 245 first holds at n = 35.
        assert_eq!(hit_frame, Some(34));
    }

    #[test]
    fn terminal_state_is_frozen() {
        let mut state = running();
        state.world.player.pos.y = 505.0;
        state.advance(&Frame::tick(FRAME_MS));
        assert_eq!(state.phase(), Phase::Terminal);

        let first = state.world().clone();
        assert!(state.advance(&Frame::tick(FRAME_MS)).is_empty());
        let second = state.world().clone();
        assert!(state.advance(&Frame::tick(FRAME_MS)).is_empty());
        assert_eq!(first, second);
        assert_eq!(second, *state.world());
    }

    #[test]
    fn restart_after_game_over_resets_before_next_frame() {
        let mut state = running();
        let config = *state.config();
        state
            .world
            .obstacles
            .push(Obstacle::new(30.0, 100.0, &config));
        state.advance(&Frame::tick(FRAME_MS));
        state.world.player.pos.y = 600.0;
        state.advance(&Frame::tick(FRAME_MS));
        assert_eq!(state.phase(), Phase::Terminal);
        assert_eq!(state.score(), 1);

        let outbox = state.apply(Command::Restart);
        assert_eq!(outbox.events, vec![GameEvent::ScoreChanged(0)]);
        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(state.score(), 0);
        assert!(state.world().obstacles.is_empty());
        assert_eq!(state.world().player, Player::spawn(&config));
    }

    #[test]
    fn restart_and_start_only_from_their_phases() {
        let mut state = GameState::new(GameConfig::default());
        assert!(state.apply(Command::Restart).is_empty());
        assert_eq!(state.phase(), Phase::Idle);

        state.apply(Command::Start);
        state.advance(&Frame::tick(FRAME_MS));
        let world = state.world().clone();
        assert!(state.apply(Command::Start).is_empty());
        assert!(state.apply(Command::Restart).is_empty());
        assert_eq!(state.world(), &world);
    }

    #[test]
    fn stop_returns_running_session_to_idle() {
        let mut state = running();
        state.advance(&Frame::tick(FRAME_MS));
        state.apply(Command::Stop);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.world().obstacles.is_empty());
    }

    #[test]
    fn stop_does_not_leave_terminal() {
        let mut state = running();
        state.world.player.pos.y = 600.0;
        state.advance(&Frame::tick(FRAME_MS));
        state.apply(Command::Stop);
        assert_eq!(state.phase(), Phase::Terminal);
    }

    #[test]
    fn same_seed_same_session() {
        let run = || {
            let mut state = running();
            for i in 0..90 {
                let commands: &[Command] = if i % 12 == 0 { &[Command::Activate] } else { &[] };
                state = step(
                    state,
                    &Frame {
                        dt_ms: FRAME_MS,
                        commands,
                    },
                )
                .state;
            }
            state.world().clone()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn ground_offset_stays_in_tile() {
        let mut state = running();
        let tile = state.config().ground_tile_width;
        for _ in 0..30 {
            state.world.player.pos.y = 260.0;
            state.advance(&Frame::tick(FRAME_MS));
            let offset = state.world().ground_offset;
            assert!((0.0..tile).contains(&offset));
        }
    }
}
