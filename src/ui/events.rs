//! Background task event processing.

use crate::app::{App, AppEvent};
use tokio::sync::mpsc;

use super::helpers::spawn_refresh;

/// Handle application events from background tasks.
///
/// Successful mutations only tell the store's observers to ask again: the
/// list view updates when the refetched snapshot arrives, never before.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    app.needs_redraw = true;
    match event {
        AppEvent::ArticleRemoved { article_id } => {
            tracing::debug!(article_id, "Delete confirmed, refetching");
            app.pending_removals.remove(&article_id);
            app.set_status("Article deleted");
            spawn_refresh(&app.store, event_tx);
        }
        AppEvent::RemoveFailed { article_id, error } => {
            app.pending_removals.remove(&article_id);
            app.set_status(format!("Delete failed: {}", error));
        }
        AppEvent::CategoryCommitted { article_id } => {
            tracing::debug!(article_id, "Category saved, refetching");
            app.finish_commit(article_id, true);
            app.set_status("Category saved");
            spawn_refresh(&app.store, event_tx);
        }
        AppEvent::CategoryCommitFailed { article_id, error } => {
            app.finish_commit(article_id, false);
            app.set_status(format!("Category not saved: {} (edit kept)", error));
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
