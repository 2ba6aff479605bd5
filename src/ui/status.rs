use crate::app::App;
use crate::keybindings::{Action as KbAction, Context};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Actions advertised in the status bar for each context.
fn hint_actions(context: Context) -> &'static [(KbAction, &'static str)] {
    match context {
        Context::Dashboard => &[
            (KbAction::EditCategory, "category"),
            (KbAction::DeleteArticle, "delete"),
            (KbAction::OpenLink, "open"),
            (KbAction::OpenDetail, "details"),
            (KbAction::SwitchView, "explore"),
            (KbAction::Refresh, "reload"),
            (KbAction::ShowHelp, "help"),
            (KbAction::Quit, "quit"),
        ],
        Context::Explorer => &[
            (KbAction::OpenDetail, "details"),
            (KbAction::OpenLink, "read more"),
            (KbAction::SwitchView, "dashboard"),
            (KbAction::Refresh, "reload"),
            (KbAction::ShowHelp, "help"),
            (KbAction::Quit, "quit"),
        ],
        Context::Detail => &[
            (KbAction::CloseDetail, "close"),
            (KbAction::OpenLink, "open link"),
        ],
        Context::CategoryField => &[(KbAction::CommitCategory, "save")],
        Context::Help => &[(KbAction::CloseHelp, "close")],
        Context::Global => &[],
    }
}

/// Key hints for the current context, using the configured keys.
fn context_hints(app: &App) -> String {
    let context = app.key_context();
    let mut parts: Vec<String> = hint_actions(context)
        .iter()
        .filter_map(|(action, label)| {
            app.keybindings
                .key_hint(*action)
                .map(|key| format!("[{}] {}", key, label))
        })
        .collect();
    if context == Context::CategoryField {
        parts.insert(0, "Type to edit".to_string());
    }
    parts.join("  ")
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = match &app.status_message {
        Some((msg, _)) => Cow::Borrowed(msg.as_ref()),
        None => Cow::Owned(context_hints(app)),
    };

    f.render_widget(Paragraph::new(text).style(app.style("status_bar")), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{article, ready, test_app};

    #[test]
    fn test_dashboard_hints_use_bound_keys() {
        let app = test_app();
        let hints = context_hints(&app);
        assert!(hints.contains("[e] category"));
        assert!(hints.contains("[d] delete"));
        assert!(hints.contains("[q] quit"));
    }

    #[test]
    fn test_explorer_hints_have_no_mutations() {
        let mut app = test_app();
        app.switch_view();
        let hints = context_hints(&app);
        assert!(!hints.contains("delete"));
        assert!(!hints.contains("category"));
    }

    #[test]
    fn test_field_hints() {
        let mut app = test_app();
        app.apply_sync_state(ready(vec![article(1, None)]));
        app.begin_edit();
        assert!(context_hints(&app).starts_with("Type to edit  [Enter] save"));
    }
}
