//! Client-side article synchronization.
//!
//! [`ArticleStore`] owns the only copy of the article snapshot and keeps it
//! consistent with the backend:
//!
//! - one snapshot for the single `articles` query, replaced wholesale
//! - at most one fetch in flight; concurrent readers share it
//! - successful delete/categorize invalidates, no optimistic edits
//! - invalidation aborts the in-flight fetch and an epoch check drops any
//!   late result
//!
//! Observers subscribe through a `tokio::sync::watch` channel.

mod articles;
mod state;

pub use articles::ArticleStore;
pub use state::{ArticleCollection, SyncState};
