//! Terminal User Interface module.
//!
//! The TUI binds the article store to two views over the same snapshot:
//! the editable dashboard and the read-only explore feed, plus the detail
//! and help overlays.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse input handling
//! - `events` - Background task event processing
//! - `render` - Frame layout and sync-state dispatch
//! - `helpers` - Task spawning and layout helpers
//! - `dashboard` - Editable article rows
//! - `explorer` - Read-only article feed
//! - `detail` - Article detail overlay
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod dashboard;
mod detail;
mod events;
mod explorer;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::app::App;
    use ratatui::{backend::TestBackend, Terminal};

    /// Draw one frame and return the screen as text, one line per row.
    pub(crate) fn screen_text(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| super::render::render(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
