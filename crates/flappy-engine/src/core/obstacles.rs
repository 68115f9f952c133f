use rand::Rng;

use crate::api::game::GameConfig;

/// A pipe pair. The gap between `top_height` and `bottom_y` is passable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge.
    pub x: f32,
    /// Bottom edge of the top pillar.
    pub top_height: f32,
    /// Top edge of the bottom pillar, always `top_height + gap_size`.
    pub bottom_y: f32,
    pub width: f32,
    /// Set once the player has passed this obstacle and the point was awarded.
    pub scored: bool,
}

impl Obstacle {
    pub fn new(x: f32, top_height: f32, config: &GameConfig) -> Self {
        Self {
            x,
            top_height,
            bottom_y: top_height + config.gap_size,
            width: config.obstacle_width,
            scored: false,
        }
    }

    pub fn right_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Whether the horizontal span `[x, x + width]` contains `x`.
    pub fn spans(&self, x: f32) -> bool {
        x >= self.x && x <= self.right_edge()
    }

    /// Whether `y` lies strictly inside the gap.
    pub fn gap_contains(&self, y: f32) -> bool {
        y > self.top_height && y < self.bottom_y
    }

    /// Fully scrolled past the left edge of the playfield.
    pub fn is_offscreen(&self) -> bool {
        self.x <= -self.width
    }
}

/// Live obstacles, oldest (leftmost) first, plus the spawn timer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    /// Session time of the most recent spawn; `None` until the first one.
    last_spawn_ms: Option<f64>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::with_capacity(8),
            last_spawn_ms: None,
        }
    }

    /// True when nothing has spawned yet this session, or more than
    /// `interval_ms` has elapsed since the last spawn.
    pub fn spawn_due(&self, now_ms: f64, interval_ms: f64) -> bool {
        match self.last_spawn_ms {
            None => true,
            Some(last) => now_ms - last > interval_ms,
        }
    }

    /// Append a new obstacle at the right edge with a uniformly drawn gap.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, config: &GameConfig, now_ms: f64) -> &Obstacle {
        let (min_top, max_top) = config.top_height_range();
        let top_height = rng.gen_range(min_top..max_top);
        self.obstacles
            .push(Obstacle::new(config.world_width, top_height, config));
        self.last_spawn_ms = Some(now_ms);
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Scroll every obstacle left by `speed`.
    pub fn advance(&mut self, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
    }

    /// Drop obstacles that have fully left the playfield. Returns how many were removed.
    pub fn retire(&mut self) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_offscreen());
        before - self.obstacles.len()
    }

    /// Insert an obstacle directly, bypassing the spawn timer.
    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.obstacles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
