use crate::api::{ApiError, Article};
use std::sync::Arc;

/// Ordered, immutable article snapshot in backend order.
///
/// Cloning only bumps a reference count, so every observer can hold the
/// same snapshot without copying article bodies.
pub type ArticleCollection = Arc<[Article]>;

/// Status of the single `articles` query.
#[derive(Debug, Clone)]
pub enum SyncState {
    /// A fetch is in flight and no fresh snapshot exists yet.
    Loading,
    /// The latest successful fetch.
    Ready(ArticleCollection),
    /// The latest fetch failed. Never rendered as an empty list.
    Failed(Arc<ApiError>),
}

impl SyncState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SyncState::Loading)
    }

    /// The snapshot, if the state is `Ready`.
    pub fn articles(&self) -> Option<&ArticleCollection> {
        match self {
            SyncState::Ready(articles) => Some(articles),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            SyncState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Short name for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            SyncState::Loading => "loading",
            SyncState::Ready(_) => "ready",
            SyncState::Failed(_) => "failed",
        }
    }
}
