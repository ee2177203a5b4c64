use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::GameError;

/// Largest tick rate accepted, in ticks per second
pub const MAX_TICK_RATE: u32 = 60;

/// Largest grid side accepted, in cells
pub const MAX_GRID_SIZE: usize = 200;

/// Widest cell accepted, in terminal columns
pub const MAX_CELL_WIDTH: u16 = 8;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid, in cells
    pub grid_size: usize,
    /// Width of one cell in terminal columns
    pub cell_width: u16,
    /// Snake advances per second
    pub tick_rate: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            cell_width: 2,
            tick_rate: 5,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    ///
    /// Values are not validated here; call `validate` once every override is applied.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid_size < 2 {
            return Err(GameError::InvalidConfig(format!(
                "grid_size must be at least 2, got {}",
                self.grid_size
            )));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "grid_size must be at most {MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        if !(1..=MAX_CELL_WIDTH).contains(&self.cell_width) {
            return Err(GameError::InvalidConfig(format!(
                "cell_width must be between 1 and {MAX_CELL_WIDTH}, got {}",
                self.cell_width
            )));
        }
        if !(1..=MAX_TICK_RATE).contains(&self.tick_rate) {
            return Err(GameError::InvalidConfig(format!(
                "tick_rate must be between 1 and {MAX_TICK_RATE}, got {}",
                self.tick_rate
            )));
        }
        Ok(())
    }

    /// Time between two advances
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    /// Board dimensions in terminal cells (columns, rows), borders excluded
    pub fn board_size(&self) -> (u16, u16) {
        let side = u16::try_from(self.grid_size).unwrap_or(u16::MAX);
        (side.saturating_mul(self.cell_width), side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.cell_width, 2);
        assert_eq!(config.tick_rate, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15);
        assert_eq!(config.grid_size, 15);
        assert_eq!(config.tick_rate, 5);
    }

    #[test]
    fn test_tick_period() {
        assert_eq!(GameConfig::default().tick_period(), Duration::from_millis(200));

        let config = GameConfig {
            tick_rate: 10,
            ..Default::default()
        };
        assert_eq!(config.tick_period(), Duration::from_millis(100));
    }

    #[test]
    fn test_board_size() {
        assert_eq!(GameConfig::default().board_size(), (40, 20));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            GameConfig::new(1).validate(),
            Err(GameError::InvalidConfig(_))
        ));

        let zero_width = GameConfig {
            cell_width: 0,
            ..Default::default()
        };
        assert!(zero_width.validate().is_err());

        let too_fast = GameConfig {
            tick_rate: MAX_TICK_RATE + 1,
            ..Default::default()
        };
        assert!(too_fast.validate().is_err());

        let stopped = GameConfig {
            tick_rate: 0,
            ..Default::default()
        };
        assert!(stopped.validate().is_err());

        let huge = GameConfig::new(70_000);
        assert!(matches!(huge.validate(), Err(GameError::InvalidConfig(_))));

        let too_wide = GameConfig {
            cell_width: MAX_CELL_WIDTH + 1,
            ..Default::default()
        };
        assert!(too_wide.validate().is_err());
    }

    #[test]
    fn test_largest_board_fits_terminal_coordinates() {
        let config = GameConfig {
            grid_size: MAX_GRID_SIZE,
            cell_width: MAX_CELL_WIDTH,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let (cols, rows) = config.board_size();
        assert_eq!(usize::from(cols), MAX_GRID_SIZE * usize::from(MAX_CELL_WIDTH));
        assert_eq!(usize::from(rows), MAX_GRID_SIZE);
        assert!(cols.checked_add(2).is_some());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_size": 12 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.cell_width, 2);
        assert_eq!(config.tick_rate, 5);
    }

    #[test]
    fn test_load_leaves_validation_to_caller() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tick_rate": 0 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.tick_rate, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_invalid_file() {
        let mut garbage = NamedTempFile::new().unwrap();
        write!(garbage, "not json").unwrap();
        assert!(GameConfig::load(garbage.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GameConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
