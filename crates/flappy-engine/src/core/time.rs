use crate::api::game::Pacing;

/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per tick, in milliseconds.
    dt_ms: f64,
    /// Accumulated time from variable frame deltas.
    accumulator: f64,
}

impl FixedTimestep {
    /// Upper bound on steps per frame, to avoid a spiral of death after a stall.
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt_ms: f64) -> Self {
        Self {
            dt_ms,
            accumulator: 0.0,
        }
    }

    pub fn from_hz(hz: f32) -> Self {
        Self::new(1000.0 / hz as f64)
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_ms: f64) -> u32 {
        self.accumulator += frame_ms.max(0.0);
        self.accumulator = self.accumulator.min(self.dt_ms * Self::MAX_STEPS as f64);
        let steps = (self.accumulator / self.dt_ms) as u32;
        self.accumulator -= steps as f64 * self.dt_ms;
        steps
    }

    pub fn dt_ms(&self) -> f64 {
        self.dt_ms
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Steps to run for one display refresh, each `dt_ms` long.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacedSteps {
    pub count: u32,
    pub dt_ms: f64,
}

/// Turns `requestAnimationFrame` timestamps into simulation steps according to [`Pacing`].
#[derive(Debug, Clone)]
pub struct FramePacer {
    last_timestamp: Option<f64>,
    fixed: Option<FixedTimestep>,
}

impl FramePacer {
    pub fn new(pacing: Pacing) -> Self {
        let fixed = match pacing {
            Pacing::PerFrame => None,
            Pacing::Fixed { hz } => Some(FixedTimestep::from_hz(hz)),
        };
        Self {
            last_timestamp: None,
            fixed,
        }
    }

    /// Feed the timestamp of a display refresh.
    ///
    /// The first refresh after construction or [`reset`](Self::reset) has no delta;
    /// per-frame pacing still runs one zero-length step for it.
    pub fn advance(&mut self, timestamp_ms: f64) -> PacedSteps {
        let frame_ms = match self.last_timestamp {
            Some(last) => (timestamp_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        match &mut self.fixed {
            None => PacedSteps {
                count: 1,
                dt_ms: frame_ms,
            },
            Some(timestep) => PacedSteps {
                count: timestep.accumulate(frame_ms),
                dt_ms: timestep.dt_ms(),
            },
        }
    }

    /// Forget the previous timestamp, e.g. after the loop was cancelled and restarted.
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        if let Some(timestep) = &mut self.fixed {
            timestep.reset();
        }
    }
}
