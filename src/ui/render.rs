//! Render functions for the TUI.
//!
//! The frame is a header (title, view tabs, last refresh), the active
//! view's body, and the status bar. Overlays draw last.

use crate::app::{App, View};
use crate::keybindings::Action as KbAction;
use crate::store::SyncState;
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::helpers::SPINNER;
use super::{dashboard, detail, explorer, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
///
/// Handles terminal size validation, then draws the header, the body for
/// the current sync state and view, the status bar and any overlay.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // EDGE-001: Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_body(f, app, chunks[1]);
    status::render(f, app, chunks[2]);

    if app.detail.is_some() {
        detail::render(f, app);
    } else {
        app.detail_area = None;
    }

    if app.show_help {
        help::render(f, app);
    }
}

/// Title, one tab per view with the active one highlighted, and the time
/// of the last successful fetch.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" FeedPulse ", app.style("header_title"))];
    for view in View::ALL {
        let role = if view == app.view {
            "nav_active"
        } else {
            "nav_inactive"
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", view.title()), app.style(role)));
    }

    if let Some(at) = app.store.fetched_at() {
        spans.push(Span::styled(
            format!("   updated {}", at.with_timezone(&Local).format("%H:%M:%S")),
            app.style("article_date"),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(format!(" {} ", app.view.title()));

    match &app.sync {
        SyncState::Loading => {
            let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
            let text = Line::from(Span::styled(
                format!("{} Loading articles...", spinner),
                app.style("loading"),
            ));
            f.render_widget(
                Paragraph::new(text).alignment(Alignment::Center).block(block),
                area,
            );
        }
        SyncState::Failed(error) => {
            let retry = app
                .keybindings
                .key_hint(KbAction::Refresh)
                .unwrap_or_else(|| "r".to_string());
            let lines = vec![
                Line::from(Span::styled("Failed to load articles", app.style("error"))),
                Line::from(""),
                Line::from(error.to_string()),
                Line::from(format!(
                    "Check that the backend is reachable at {}",
                    app.store.base_url()
                )),
                Line::from(""),
                Line::from(Span::styled(format!("[{}] retry", retry), app.style("action_hint"))),
            ];
            f.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(block),
                area,
            );
        }
        SyncState::Ready(articles) if articles.is_empty() => {
            let text = Line::from(Span::styled("No articles", app.style("empty")));
            f.render_widget(
                Paragraph::new(text).alignment(Alignment::Center).block(block),
                area,
            );
        }
        SyncState::Ready(_) => match app.view {
            View::Dashboard => dashboard::render(f, app, area, block),
            View::Explorer => explorer::render(f, app, area, block),
        },
    }
}
