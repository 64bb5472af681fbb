//! Main TUI application state and logic

use crate::interpreter::engine::Interpreter;
use crate::ui::panes::{self, ScopesScrollState, SourceScrollState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Time between automatic steps while playing
const PLAY_INTERVAL: Duration = Duration::from_millis(500);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Scopes,
    Terminal,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> output -> scopes)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Terminal,
            FocusedPane::Terminal => FocusedPane::Scopes,
            FocusedPane::Scopes => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// Interpreter whose recorded history is being browsed
    pub interpreter: Interpreter,

    /// The source code being executed
    pub source_code: String,

    /// Runtime error that ended execution, shown at the last step
    pub error: Option<String>,

    pub focused_pane: FocusedPane,

    pub source_scroll: SourceScrollState,
    pub scopes_scroll: ScopesScrollState,
    pub terminal_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(interpreter: Interpreter, source_code: String) -> Self {
        App {
            interpreter,
            source_code,
            error: None,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            scopes_scroll: ScopesScrollState::default(),
            terminal_scroll: usize::MAX,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Show `error` as the reason execution stopped
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.interpreter.step_forward().is_ok() {
                    self.terminal_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn is_at_end(&self) -> bool {
        self.interpreter.history_position() + 1 >= self.interpreter.total_snapshots()
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let show_error = self.error.is_some() && self.is_at_end();

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            self.interpreter.current_location().line,
            show_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.interpreter.terminal(),
            self.focused_pane == FocusedPane::Terminal,
            &mut self.terminal_scroll,
        );

        panes::render_scopes_pane(
            frame,
            columns[1],
            self.interpreter.scopes(),
            self.focused_pane == FocusedPane::Scopes,
            &mut self.scopes_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.interpreter.history_position(),
            self.interpreter.total_snapshots(),
            self.error.as_deref(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up moves the current line down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Scopes => {
                    self.scopes_scroll.offset = self.scopes_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Terminal => {
                    self.terminal_scroll = self.terminal_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Scopes => {
                    self.scopes_scroll.offset = self.scopes_scroll.offset.saturating_add(1);
                }
                FocusedPane::Terminal => {
                    self.terminal_scroll = self.terminal_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(PLAY_INTERVAL)
                            .unwrap_or_else(Instant::now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.status_message = match self.interpreter.jump_to_end() {
                    Ok(()) => "Jumped to end".to_string(),
                    Err(e) => e.to_string(),
                };
                self.terminal_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.status_message = match self.interpreter.rewind_to_start() {
                    Ok(()) => "Jumped to start".to_string(),
                    Err(e) => e.to_string(),
                };
                self.terminal_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    fn step_forward(&mut self) {
        match self.interpreter.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step forward: {}", e);
            }
        }
    }

    fn step_backward(&mut self) {
        match self.interpreter.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step backward: {}", e);
            }
        }
    }
}
