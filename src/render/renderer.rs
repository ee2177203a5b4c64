use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameEnd, GameStatus, Position, Snapshot, Target};

/// Draws a session snapshot. Holds no game state of its own.
pub struct Renderer {
    cell_width: u16,
}

impl Renderer {
    pub fn new(cell_width: u16) -> Self {
        Self {
            cell_width: cell_width.max(1),
        }
    }

    /// Draw order: background, grid, snake, food, score, high score
    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot) {
        frame.render_widget(Clear, frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Score lines
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        let board = self.board_area(chunks[1], snapshot.state.grid_size);
        frame.render_widget(self.render_board(snapshot), board);

        frame.render_widget(self.render_scores(snapshot), chunks[0]);
        frame.render_widget(self.render_controls(snapshot), chunks[2]);
    }

    /// Centre a bordered board of `grid_size` cells inside `area`
    fn board_area(&self, area: Rect, grid_size: usize) -> Rect {
        let side = u16::try_from(grid_size).unwrap_or(u16::MAX);
        let width = side.saturating_mul(self.cell_width).saturating_add(2);
        let height = side.saturating_add(2);

        let [row] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [board] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(row);
        board
    }

    fn render_board(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let state = snapshot.state;
        let width = usize::from(self.cell_width);
        let mut lines = Vec::with_capacity(state.grid_size);

        for y in 0..state.grid_size {
            let mut spans = Vec::with_capacity(state.grid_size);

            for x in 0..state.grid_size {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.snake.head() {
                    Span::styled(
                        "█".repeat(width),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(pos) {
                    Span::styled("█".repeat(width), Style::default().fg(Color::Green))
                } else if state.food == Some(pos) {
                    Span::styled(
                        "█".repeat(width),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(
                        format!("{:<width$}", "·"),
                        Style::default().fg(Color::DarkGray),
                    )
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let (title, border_color) = match state.status {
            GameStatus::Running => (" Snake ", Color::White),
            GameStatus::Over(GameEnd::BoardFilled) => (" YOU WIN ", Color::Yellow),
            GameStatus::Over(_) => (" GAME OVER ", Color::Red),
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border_color))
                .title(title),
        )
    }

    fn render_scores(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let state = snapshot.state;
        let distance = state
            .distance(Target::Head, Target::Food)
            .map(|d| format!("{d:.1}"))
            .unwrap_or_else(|_| "-".to_string());

        let text = vec![
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.high_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Length: ", Style::default().fg(Color::Gray)),
                Span::raw(state.snake.len().to_string()),
                Span::raw("  "),
                Span::styled("Food: ", Style::default().fg(Color::Gray)),
                Span::raw(distance),
                Span::raw("  "),
                Span::styled("Steps: ", Style::default().fg(Color::Gray)),
                Span::raw(state.steps.to_string()),
                Span::raw("  "),
                Span::styled("Games: ", Style::default().fg(Color::Gray)),
                Span::raw(snapshot.games_played.to_string()),
                Span::raw("  "),
                Span::styled("Time: ", Style::default().fg(Color::Gray)),
                Span::raw(snapshot.format_time()),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self, _snapshot: &Snapshot) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, GameState, Session, Snake};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use std::time::Duration;

    fn draw(snapshot: &Snapshot, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let renderer = Renderer::new(2);
        terminal
            .draw(|frame| renderer.render(frame, snapshot))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        let symbols: Vec<&str> = buffer.content.iter().map(|cell| cell.symbol()).collect();
        symbols
            .chunks(width)
            .map(|row| row.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn snapshot_of(state: &GameState) -> Snapshot<'_> {
        Snapshot {
            state,
            high_score: 7,
            games_played: 3,
            elapsed: Duration::from_secs(65),
        }
    }

    #[test]
    fn test_scores_are_drawn() {
        let session = Session::with_config(GameConfig::default(), Some(1));
        let buffer = draw(&session.snapshot(), 60, 26);
        let screen = text(&buffer);

        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("High Score: 0"));
        assert!(screen.contains(" Snake "));
    }

    #[test]
    fn test_board_cells() {
        let snake = Snake::from_segments(
            [Position::new(1, 1), Position::new(1, 2)],
            Direction::Up,
        )
        .unwrap();
        let state = GameState::new(snake, Some(Position::new(3, 0)), 4);
        let buffer = draw(&snapshot_of(&state), 60, 9);
        let screen = text(&buffer);

        // Board is 4 cells * 2 columns + borders, centred in 60 columns
        let board = Renderer::new(2).board_area(Rect::new(0, 2, 60, 6), 4);
        assert_eq!(board, Rect::new(25, 2, 10, 6));

        let cell = |x: u16, y: u16| buffer[(board.x + 1 + x * 2, board.y + 1 + y)].clone();
        assert_eq!(cell(1, 1).fg, Color::Cyan);
        assert_eq!(cell(1, 2).fg, Color::Green);
        assert_eq!(cell(3, 0).fg, Color::Red);
        assert_eq!(cell(0, 0).symbol(), "·");

        assert!(screen.contains("High Score: 7"));
        assert!(screen.contains("Steps: 0"));
        assert!(screen.contains("Games: 3"));
        assert!(screen.contains("Time: 01:05"));
    }

    #[test]
    fn test_game_over_title() {
        let mut state = GameState::new(
            Snake::new(Position::new(-1, 0), Direction::Left),
            Some(Position::new(2, 2)),
            8,
        );
        state.status = GameStatus::Over(GameEnd::Wall);

        let screen = text(&draw(&snapshot_of(&state), 60, 14));
        assert!(screen.contains("GAME OVER"));
    }

    #[test]
    fn test_win_without_food() {
        let mut state = GameState::new(Snake::new(Position::new(0, 0), Direction::Up), None, 8);
        state.status = GameStatus::Over(GameEnd::BoardFilled);

        let screen = text(&draw(&snapshot_of(&state), 60, 14));
        assert!(screen.contains("YOU WIN"));
        assert!(screen.contains("Food: -"));
    }
}
