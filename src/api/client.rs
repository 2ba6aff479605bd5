use super::error::ApiError;
use super::types::{Article, ArticleId, ArticlesEnvelope, CategoryUpdate};
use crate::util::validate_base_url;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Upper bound on the list response body. A feed dashboard never gets close.
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// HTTP client for the FeedPulse articles API.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
/// Requests are never retried here; callers decide what to do with failures.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Build a client with connection pooling against `base_url`.
    ///
    /// `timeout` of `None` keeps the transport default (no overall deadline).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let mut base =
            validate_base_url(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;

        // Url::join replaces the last path segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))
    }

    /// `GET /api/articles`. Order is preserved exactly as served.
    pub async fn list_articles(&self) -> Result<Vec<Article>, ApiError> {
        let url = self.endpoint("api/articles")?;
        tracing::debug!(url = %url, "Fetching article list");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Server {
                status: status.as_u16(),
            });
        }

        let body = read_limited(response, MAX_RESPONSE_SIZE).await?;
        let envelope: ArticlesEnvelope = serde_json::from_slice(&body)?;
        check_unique_ids(&envelope.articles)?;

        tracing::debug!(count = envelope.articles.len(), "Article list received");
        Ok(envelope.articles)
    }

    /// `DELETE /api/articles/{id}`. Response body is ignored.
    pub async fn delete_article(&self, id: ArticleId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/articles/{}", id))?;
        tracing::debug!(article_id = id, "Deleting article");

        let response = self.http.delete(url).send().await?;
        ensure_success(&response)
    }

    /// `POST /api/articles/{id}/category` with `{"category": ...}`.
    ///
    /// An empty string clears the category on the backend.
    pub async fn set_category(&self, id: ArticleId, category: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/articles/{}/category", id))?;
        let body = serde_json::to_vec(&CategoryUpdate { category })?;
        tracing::debug!(article_id = id, category, "Updating article category");

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        ensure_success(&response)
    }
}

fn ensure_success(response: &reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Server {
            status: status.as_u16(),
        })
    }
}

/// A snapshot must never contain the same id twice.
fn check_unique_ids(articles: &[Article]) -> Result<(), ApiError> {
    let mut seen = HashSet::with_capacity(articles.len());
    for article in articles {
        if !seen.insert(article.id) {
            return Err(ApiError::DuplicateId(article.id));
        }
    }
    Ok(())
}

async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
