use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, trace};

use super::{
    action::Direction,
    config::GameConfig,
    state::{GameEnd, GameState, GameStatus, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set when this step ended the game
    pub ended: Option<GameEnd>,
}

/// The game engine: owns the grid configuration and the food RNG
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with a fixed seed, for reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fresh game: one segment in the centre of the grid heading up
    pub fn new_game(&mut self) -> GameState {
        let center = (self.config.grid_size / 2) as i32;
        let snake = Snake::new(Position::new(center, center), Direction::Up);
        let food = self.place_food(&snake);

        GameState::new(snake, food, self.config.grid_size)
    }

    /// Execute one step of the game. Does nothing once the game is over.
    pub fn advance(&mut self, state: &mut GameState) -> StepInfo {
        if state.is_over() {
            return StepInfo::default();
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        let ate_food = state.food == Some(new_head);

        // The tail is popped before the collision check, so moving into the
        // cell it vacated is legal.
        state.snake.move_snake(ate_food);
        state.steps += 1;

        if ate_food {
            state.score += 1;
            state.food = self.place_food(&state.snake);
            debug!(score = state.score, length = state.snake.len(), food = ?state.food, "food eaten");
        }

        let ended = self
            .check_collision(state, new_head)
            .or_else(|| (ate_food && state.food.is_none()).then_some(GameEnd::BoardFilled));

        if let Some(end) = ended {
            state.status = GameStatus::Over(end);
        }

        trace!(head = ?new_head, ate_food, ?ended, "advance");

        StepInfo { ate_food, ended }
    }

    fn check_collision(&self, state: &GameState, head: Position) -> Option<GameEnd> {
        if !state.is_in_bounds(head) {
            return Some(GameEnd::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(GameEnd::SelfCollision);
        }

        None
    }

    /// Pick a free cell uniformly at random. `None` when the snake covers the grid.
    pub fn place_food(&mut self, snake: &Snake) -> Option<Position> {
        let side = self.config.grid_size as i32;
        let free: Vec<Position> = (0..side)
            .flat_map(|y| (0..side).map(move |x| Position::new(x, y)))
            .filter(|&pos| !snake.contains(pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}
