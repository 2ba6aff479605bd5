//! Help overlay: keybinding table.
//!
//! Renders a centered overlay showing all keybindings grouped by context.
//! Displays actual bindings including any user overrides from config.

use crate::app::App;
use crate::keybindings::Context;
use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

use super::helpers::centered_rect;

/// Context display order for the help screen.
const CONTEXT_ORDER: [Context; 6] = [
    Context::Global,
    Context::Dashboard,
    Context::Explorer,
    Context::Detail,
    Context::CategoryField,
    Context::Help,
];

fn help_rows(app: &App) -> Vec<Row<'static>> {
    let bindings = app.keybindings.all_bindings();
    let mut rows: Vec<Row> = Vec::new();

    for ctx in CONTEXT_ORDER {
        let ctx_bindings: Vec<_> = bindings.iter().filter(|(c, _, _, _)| *c == ctx).collect();
        if ctx_bindings.is_empty() {
            continue;
        }

        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", ctx.title()),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.style("help_heading")),
        );

        for (_, key_str, _, description) in ctx_bindings {
            rows.push(Row::new(vec![format!("  {}", key_str), description.to_string()]));
        }

        rows.push(Row::new(vec![String::new(), String::new()]));
    }

    // Trailing separator
    rows.pop();
    rows
}

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let widths = [Constraint::Length(16), Constraint::Min(20)];
    let table = Table::new(help_rows(app), widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("detail_border"))
                .title(" Help (? to close) "),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.style("detail_body"));

    f.render_widget(table, overlay);
}
