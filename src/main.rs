use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tui_snake::game::GameConfig;
use tui_snake::logging::init_tracing;
use tui_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "tui_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// JSON file with game settings; flags below take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square grid, in cells
    #[arg(long)]
    grid_size: Option<usize>,

    /// Width of one cell in terminal columns
    #[arg(long)]
    cell_width: Option<u16>,

    /// Snake moves per second
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (RUST_LOG sets the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(cell_width) = self.cell_width {
            config.cell_width = cell_width;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate = tick_rate;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref())?;
    let config = cli.game_config()?;

    let mut human_mode = HumanMode::new(config, cli.seed);
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("tui_snake").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_flags() {
        assert_eq!(cli(&[]).game_config().unwrap(), GameConfig::default());
    }

    #[test]
    fn test_flag_overrides_bad_file_value() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_size": 12, "tick_rate": 0 }}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let config = cli(&["--config", path, "--tick-rate", "5"])
            .game_config()
            .unwrap();
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.tick_rate, 5);

        assert!(cli(&["--config", path]).game_config().is_err());
    }

    #[test]
    fn test_invalid_flag_rejected() {
        assert!(cli(&["--grid-size", "70000"]).game_config().is_err());
        assert!(cli(&["--cell-width", "0"]).game_config().is_err());
    }
}
