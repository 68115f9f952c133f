/// A fire-and-forget audio cue emitted by the simulation.
/// The audio notifier maps each cue to a sound; the engine never waits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Flap,
    Score,
    Collision,
}

impl SoundCue {
    /// Stable name handed to JavaScript.
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Flap => "flap",
            SoundCue::Score => "score",
            SoundCue::Collision => "collision",
        }
    }
}

/// A lifecycle event for the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The session score changed (including the reset to 0 at session start).
    ScoreChanged(u32),
    /// The session ended on a collision.
    GameOver { final_score: u32 },
}

/// A discrete command for the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Idle -> Running.
    Start,
    /// Terminal -> Running.
    Restart,
    /// Running -> Idle, abandoning the session.
    Stop,
    /// Flap. Only meaningful while Running.
    Activate,
}
