//! FeedPulse terminal dashboard.
//!
//! The [`store::ArticleStore`] keeps the article list shared by every view
//! in sync with the backend's `/api/articles` resource: concurrent reads share
//! one fetch, successful mutations mark the snapshot stale, and observers
//! see state changes through a watch channel. The [`ui`] module binds it to
//! a ratatui dashboard.

pub mod api;
pub mod app;
pub mod config;
pub mod keybindings;
pub mod store;
pub mod theme;
pub mod ui;
pub mod util;
