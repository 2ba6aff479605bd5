//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry for the current
//! context (help, detail overlay, category field, or the active view).

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use tokio::sync::mpsc;

use super::helpers::{open_link, spawn_refresh, spawn_remove, spawn_set_category};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let context = app.key_context();
    let action = app.keybindings.action_for_key(code, modifiers, context);

    match context {
        KbContext::Help => {
            if matches!(action, Some(KbAction::CloseHelp | KbAction::Quit)) {
                app.show_help = false;
            }
            Action::Continue
        }
        KbContext::CategoryField => {
            handle_category_input(app, code, modifiers, action, event_tx);
            Action::Continue
        }
        _ => dispatch(app, action, event_tx),
    }
}

/// Keys while a category field has focus. Anything unbound is text.
fn handle_category_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    action: Option<KbAction>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match action {
        Some(KbAction::CommitCategory) => commit_category(app, event_tx),
        Some(KbAction::NavDown) => {
            commit_category(app, event_tx);
            app.nav_down();
        }
        Some(KbAction::NavUp) => {
            commit_category(app, event_tx);
            app.nav_up();
        }
        _ => {
            let Some(editor) = app.active_editor() else {
                return;
            };
            match code {
                KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => editor.push(c),
                KeyCode::Backspace => editor.pop(),
                _ => {}
            }
        }
    }
}

/// Focus left the category field: send the value once if it changed.
fn commit_category(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some((article_id, category)) = app.end_edit() {
        tracing::debug!(article_id, category = %category, "Committing category");
        spawn_set_category(&app.store, article_id, category, event_tx);
    }
}

fn dispatch(app: &mut App, action: Option<KbAction>, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::SwitchView) => app.switch_view(),
        Some(KbAction::OpenDetail) => {
            app.open_detail();
        }
        Some(KbAction::CloseDetail) => app.close_detail(),
        Some(KbAction::Refresh) => {
            app.store.invalidate();
            spawn_refresh(&app.store, event_tx);
            app.set_status("Reloading articles...");
        }
        Some(KbAction::OpenLink) => {
            let link = app
                .detail
                .as_ref()
                .or_else(|| app.selected_article())
                .map(|a| a.link.clone());
            if let Some(link) = link {
                open_link(app, &link);
            }
        }
        Some(KbAction::DeleteArticle) => handle_delete(app, event_tx),
        Some(KbAction::EditCategory) => {
            if app.selected_article().is_some() && !app.begin_edit() {
                app.set_status("Category update still in progress");
            }
        }
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => app.show_help = true,
        Some(KbAction::CommitCategory | KbAction::CloseHelp) | None => {}
    }
    Action::Continue
}

fn handle_delete(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(article_id) = app.selected_article().map(|a| a.id) else {
        return;
    };
    if !app.pending_removals.insert(article_id) {
        return;
    }
    app.set_status("Deleting article...");
    spawn_remove(&app.store, article_id, event_tx);
}

/// A left click outside the detail overlay dismisses it.
pub(super) fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }
    if let Some(area) = app.detail_area {
        if !area.contains(Position::new(mouse.column, mouse.row)) {
            app.close_detail();
        }
    }
}
