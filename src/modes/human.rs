use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, trace, warn};

use crate::game::{Direction, GameConfig, Session};
use crate::input::{Command, InputHandler};
use crate::render::Renderer;

/// Keyboard-driven game loop
pub struct HumanMode {
    session: Session,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Direction changes received since the last tick, in arrival order
    pending: Vec<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let renderer = Renderer::new(config.cell_width);

        Self {
            session: Session::with_config(config, seed),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
            pending: Vec::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        // Restore the terminal even when the loop failed
        let cleanup = self.cleanup_terminal(&mut terminal);
        result.and(cleanup)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.session.config().tick_period());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; spend it on the opening frame
        tick_timer.tick().await;
        self.draw(terminal)?;

        let (cols, rows) = self.session.config().board_size();
        let size = terminal.size().context("Failed to read terminal size")?;
        // Board plus borders, two score lines and the footer
        if size.width < cols.saturating_add(2) || size.height < rows.saturating_add(5) {
            warn!(
                width = size.width,
                height = size.height,
                "terminal is smaller than the board, edges will be cut off"
            );
        }

        info!(config = ?self.session.config(), "game loop started");

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.tick();
                    self.draw(terminal)?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!(high_score = self.session.high_score(), "quit");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        match self.input_handler.handle_key_event(key) {
            Some(Command::Turn(direction)) => self.pending.push(direction),
            Some(Command::Quit) => self.should_quit = true,
            None => {}
        }
    }

    /// One simulation step: restart a finished game, apply queued turns, advance
    fn tick(&mut self) {
        if self.session.is_over() {
            // Turns queued while the final frame was up belong to the old game
            self.pending.clear();
            self.session.reset();
        }

        for direction in self.pending.drain(..) {
            let accepted = self.session.set_direction(direction);
            debug!(?direction, accepted, "turn");
        }

        let info = self.session.advance();
        trace!(?info, "tick");
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let snapshot = self.session.snapshot();
        terminal
            .draw(|frame| self.renderer.render(frame, &snapshot))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        // Every step runs even if an earlier one failed; the first error wins
        let raw_mode = disable_raw_mode().context("Failed to disable raw mode");
        let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen");
        let cursor = terminal.show_cursor().context("Failed to show cursor");
        first_error([raw_mode, screen, cursor])
    }
}

/// `Ok` if every result is `Ok`, otherwise the earliest error
fn first_error(results: impl IntoIterator<Item = Result<()>>) -> Result<()> {
    results.into_iter().fold(Ok(()), |acc, result| acc.and(result))
}
