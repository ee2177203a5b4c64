//! Core game logic for Snake
//!
//! Everything here is free of terminal I/O, so the state machine can be driven
//! and tested without a screen.

pub mod action;
pub mod config;
pub mod engine;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo};
pub use session::{Session, Snapshot};
pub use state::{GameEnd, GameState, GameStatus, Position, Snake, Target};
