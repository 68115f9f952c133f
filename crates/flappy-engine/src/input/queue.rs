use crate::api::types::Command;
use crate::core::session::Phase;

/// DOM `keyCode` values the game binds.
pub mod keys {
    pub const ENTER: u32 = 13;
    pub const SPACE: u32 = 32;
    pub const ARROW_UP: u32 = 38;

    /// Keys that flap, start and restart.
    pub fn is_action(key_code: u32) -> bool {
        matches!(key_code, ENTER | SPACE | ARROW_UP)
    }
}

/// Raw input as the host reports it, in playfield coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch or click began.
    PointerDown { x: f32, y: f32 },
    /// A key was pressed.
    KeyDown { key_code: u32 },
    /// The host already decided this is a flap (e.g. an on-screen button).
    Activate,
}

/// Map one input to the command it means in `phase`, if any.
///
/// An action key starts from Idle, restarts from Terminal and flaps while Running.
/// Pointer presses only ever flap; starting a session by click is left to host UI.
pub fn command_for(event: &InputEvent, phase: Phase) -> Option<Command> {
    match (event, phase) {
        (InputEvent::KeyDown { key_code }, phase) if keys::is_action(*key_code) => Some(match phase {
            Phase::Idle => Command::Start,
            Phase::Running => Command::Activate,
            Phase::Terminal => Command::Restart,
        }),
        (InputEvent::PointerDown { .. } | InputEvent::Activate, Phase::Running) => {
            Some(Command::Activate)
        }
        _ => None,
    }
}

/// Input collected between frames.
/// The host pushes events as they arrive; the frame loop drains them once per refresh.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain pending events and translate them into commands, in arrival order.
    ///
    /// Each event is mapped against the phase the previous commands lead to, so a
    /// Start followed by a flap key in the same frame becomes `[Start, Activate]`.
    pub fn commands(&mut self, phase: Phase) -> Vec<Command> {
        let mut phase = phase;
        let mut commands = Vec::new();
        for event in self.drain() {
            if let Some(command) = command_for(&event, phase) {
                phase = match command {
                    Command::Start | Command::Restart => Phase::Running,
                    Command::Stop => Phase::Idle,
                    Command::Activate => phase,
                };
                commands.push(command);
            }
        }
        commands
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
