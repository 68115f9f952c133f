pub mod api;
pub mod assets;
pub mod core;
pub mod input;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::error::{ConfigError, SkinError};
pub use api::game::{GameConfig, Outbox, Pacing};
pub use api::types::{Command, GameEvent, SoundCue};
pub use assets::skins::{Character, SkinCatalog};
pub use crate::core::collision::Collision;
pub use crate::core::obstacles::{Obstacle, ObstacleField};
pub use crate::core::physics::Player;
pub use crate::core::session::{step, Frame, GameState, Phase, Step, World};
pub use crate::core::time::{FixedTimestep, FramePacer, PacedSteps};
pub use input::queue::{command_for, keys, InputEvent, InputQueue};
pub use renderer::{Color, ColorStop, Paint, Path, PathEvent, Pipeline, Rect, RenderLayer, Surface};
