//! Client for the FeedPulse backend HTTP contract.
//!
//! | Operation      | Method | Path                          |
//! |----------------|--------|-------------------------------|
//! | List articles  | GET    | `/api/articles`               |
//! | Delete article | DELETE | `/api/articles/{id}`          |
//! | Set category   | POST   | `/api/articles/{id}/category` |
//!
//! Any non-2xx status or transport failure is an error; a failed list is
//! never reported as an empty one.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, FailureKind};
pub use types::{Article, ArticleId};
