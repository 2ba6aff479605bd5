//! Shared helpers for the UI layer: background task spawning and layout.

use crate::api::ArticleId;
use crate::app::{App, AppEvent};
use crate::store::ArticleStore;
use crate::util::validate_url_for_open;
use futures::FutureExt;
use ratatui::layout::Rect;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Braille spinner shown while the article list loads.
pub(super) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Catch panics in a future, converting them to an error string.
///
/// Used by background tasks so a panic is reported as
/// `AppEvent::TaskPanicked` instead of vanishing with the task.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

async fn send_event(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, "Channel send failed (receiver dropped)");
    }
}

/// Run `work` in the background and forward its event, if any.
fn spawn_task<F>(task: &'static str, tx: mpsc::Sender<AppEvent>, work: F)
where
    F: Future<Output = Option<AppEvent>> + Send + 'static,
{
    tokio::spawn(async move {
        match catch_task_panic(work).await {
            Ok(Some(event)) => send_event(&tx, event).await,
            Ok(None) => {}
            Err(panic_msg) => {
                tracing::error!(task, error = %panic_msg, "Background task panicked");
                send_event(
                    &tx,
                    AppEvent::TaskPanicked {
                        task,
                        error: panic_msg,
                    },
                )
                .await;
            }
        }
    });
}

/// Ask the store for the snapshot. The result reaches the UI through the
/// store's watch channel, not as an event.
pub(super) fn spawn_refresh(store: &ArticleStore, tx: &mpsc::Sender<AppEvent>) {
    let store = store.clone();
    spawn_task("refresh", tx.clone(), async move {
        store.list().await;
        None
    });
}

pub(super) fn spawn_remove(
    store: &ArticleStore,
    article_id: ArticleId,
    tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    spawn_task("remove", tx.clone(), async move {
        Some(match store.remove(article_id).await {
            Ok(()) => AppEvent::ArticleRemoved { article_id },
            Err(e) => AppEvent::RemoveFailed {
                article_id,
                error: e.to_string(),
            },
        })
    });
}

pub(super) fn spawn_set_category(
    store: &ArticleStore,
    article_id: ArticleId,
    category: String,
    tx: &mpsc::Sender<AppEvent>,
) {
    let store = store.clone();
    spawn_task("set_category", tx.clone(), async move {
        Some(match store.set_category(article_id, &category).await {
            Ok(()) => AppEvent::CategoryCommitted { article_id },
            Err(e) => AppEvent::CategoryCommitFailed {
                article_id,
                error: e.to_string(),
            },
        })
    });
}

/// Open `link` in the system browser; the app keeps running.
pub(super) fn open_link(app: &mut App, link: &str) {
    // SEC: Validate URL before open::that() to prevent command injection
    match validate_url_for_open(link) {
        Err(e) => app.set_status(format!("Cannot open link: {}", e)),
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => app.set_status("Opened link in browser"),
            Err(e) => {
                tracing::warn!(error = %e, link, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {}", e));
            }
        },
    }
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catch_task_panic_passes_value() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_extracts_message() {
        let result: Result<(), String> = catch_task_panic(async { panic!("boom") }).await;
        assert_eq!(result, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn test_panicking_task_reports_event() {
        let (tx, mut rx) = mpsc::channel(1);
        spawn_task("explode", tx, async {
            panic!("{}", String::from("kaput"));
        });
        match rx.recv().await {
            Some(AppEvent::TaskPanicked { task, error }) => {
                assert_eq!(task, "explode");
                assert_eq!(error, "kaput");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_centered_rect_inside_parent() {
        let parent = Rect::new(0, 0, 100, 40);
        let r = centered_rect(50, 50, parent);
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }
}
