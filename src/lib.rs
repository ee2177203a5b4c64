//! Snake in the terminal
//!
//! - `game`: grid, snake and session state machine, no I/O
//! - `input`: key events to commands
//! - `render`: ratatui drawing of a session snapshot
//! - `modes`: the interactive loop

pub mod error;
pub mod game;
pub mod input;
pub mod logging;
pub mod modes;
pub mod render;

pub use error::GameError;
