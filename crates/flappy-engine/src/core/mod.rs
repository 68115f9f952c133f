pub mod collision;
pub mod obstacles;
pub mod physics;
pub mod session;
pub mod time;
