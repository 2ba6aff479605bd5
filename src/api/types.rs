use serde::{Deserialize, Serialize};

/// Backend-assigned article identifier.
pub type ArticleId = i64;

/// One syndicated article as served by `GET /api/articles`.
///
/// `date` is an opaque display string; the client never parses or sorts it.
/// `category` is `None` for uncategorized articles (JSON `null` or absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub link: String,
    pub date: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl Article {
    /// Category as shown in the editable field (empty when uncategorized).
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// Envelope of the list endpoint: `{ "articles": [...] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ArticlesEnvelope {
    pub articles: Vec<Article>,
}

/// Body of `POST /api/articles/{id}/category`.
#[derive(Debug, Serialize)]
pub(crate) struct CategoryUpdate<'a> {
    pub category: &'a str,
}
