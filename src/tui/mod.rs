//! Politicos Terminal UI
//!
//! Dashboard built on ratatui: navigation tabs, the politicians grid with
//! search and gender filter, row dialogs and the statistics card.

mod app;
mod runner;

pub use app::{App, AppEvent, AppState, Dialog, Effect};
pub use runner::run;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    Terminal,
};
use std::io::{self, Stdout};

/// Color palette for the TUI
pub struct TuiPalette;

impl TuiPalette {
    pub const CRIMSON: Color = Color::Rgb(173, 21, 25);
    pub const GOLD: Color = Color::Rgb(241, 191, 0);
    pub const INK: Color = Color::Rgb(30, 30, 36);
    pub const PAPER: Color = Color::Rgb(245, 245, 240);
    pub const SLATE: Color = Color::Rgb(120, 124, 140);
    pub const STONE: Color = Color::Rgb(128, 128, 128);

    pub const GREEN: Color = Color::Rgb(74, 222, 128);
    pub const RED: Color = Color::Rgb(239, 68, 68);

    pub fn title_style() -> Style {
        Style::default().fg(Self::GOLD).add_modifier(Modifier::BOLD)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Self::CRIMSON)
            .fg(Self::PAPER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header_style() -> Style {
        Style::default().fg(Self::GOLD).add_modifier(Modifier::BOLD)
    }

    pub fn success_style() -> Style {
        Style::default().fg(Self::GREEN)
    }

    pub fn error_style() -> Style {
        Style::default().fg(Self::RED)
    }

    pub fn muted_style() -> Style {
        Style::default().fg(Self::STONE)
    }

    pub fn key_style() -> Style {
        Style::default().fg(Self::GOLD).add_modifier(Modifier::BOLD)
    }

    pub fn border_style() -> Style {
        Style::default().fg(Self::SLATE)
    }

    pub fn focused_border_style() -> Style {
        Style::default().fg(Self::GOLD)
    }
}

/// Terminal wrapper for TUI operations
pub struct TuiTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TuiTerminal {
    /// Create and initialize the terminal
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    /// Restore terminal to normal state
    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiTerminal {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Header, main content and status bar
pub fn standard_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area)
        .to_vec()
}

/// A rectangle of at most `width` x `height` centered horizontally in the
/// upper third of `area`.
pub fn overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 3;
    Rect::new(x, y, w, h)
}

/// Read next terminal event with timeout
pub fn read_event(timeout_ms: u64) -> Result<Option<Event>> {
    if event::poll(std::time::Duration::from_millis(timeout_ms))? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Check for specific key press
pub fn is_key(event: &Event, key: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(
        event,
        Event::Key(k) if k.code == key && k.modifiers == modifiers
    )
}

/// Ctrl+C or Ctrl+D
pub fn is_interrupt(event: &Event) -> bool {
    is_key(event, KeyCode::Char('c'), KeyModifiers::CONTROL)
        || is_key(event, KeyCode::Char('d'), KeyModifiers::CONTROL)
}
