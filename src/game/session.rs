use std::time::{Duration, Instant};
use tracing::info;

use super::{
    action::Direction,
    config::GameConfig,
    engine::{GameEngine, StepInfo},
    state::{GameState, GameStatus},
};

/// One run of the program: the current game plus everything that outlives it.
///
/// The high score starts at 0 when the session is created, survives every
/// `reset`, and is dropped with the session.
pub struct Session {
    engine: GameEngine,
    state: GameState,
    high_score: u32,
    games_played: u32,
    started_at: Instant,
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: &'a GameState,
    pub high_score: u32,
    pub games_played: u32,
    pub elapsed: Duration,
}

impl Session {
    pub fn new(mut engine: GameEngine) -> Self {
        let state = engine.new_game();

        Self {
            engine,
            state,
            high_score: 0,
            games_played: 0,
            started_at: Instant::now(),
        }
    }

    pub fn with_config(config: GameConfig, seed: Option<u64>) -> Self {
        let engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        };
        Self::new(engine)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        self.state.set_direction(direction)
    }

    pub fn advance(&mut self) -> StepInfo {
        let info = self.engine.advance(&mut self.state);

        if info.ate_food {
            self.high_score = self.high_score.max(self.state.score);
        }

        if let Some(end) = info.ended {
            info!(
                ?end,
                score = self.state.score,
                high_score = self.high_score,
                length = self.state.snake.len(),
                steps = self.state.steps,
                "game over"
            );
        }

        info
    }

    /// Start a fresh game. The high score is kept.
    pub fn reset(&mut self) {
        if let GameStatus::Over(_) = self.state.status {
            self.games_played += 1;
        }
        self.state = self.engine.new_game();
        self.started_at = Instant::now();
        info!(games_played = self.games_played, high_score = self.high_score, "new game");
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: &self.state,
            high_score: self.high_score,
            games_played: self.games_played,
            elapsed: self.started_at.elapsed(),
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

impl Snapshot<'_> {
    /// Elapsed time of the current game as `mm:ss`
    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}
