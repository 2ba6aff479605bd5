//! Integration tests for article synchronization: shared fetches,
//! invalidation after mutations, and failure reporting.
//!
//! Each test runs its own mock backend. Request counts are checked by
//! `wiremock` when the server is dropped.

use feedpulse::api::{ApiClient, FailureKind};
use feedpulse::store::{ArticleStore, SyncState};
use futures::future::join_all;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> ArticleStore {
    ArticleStore::new(ApiClient::new(&server.uri(), None).unwrap())
}

fn article(id: i64, title: &str, category: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": title,
        "link": format!("https://example.com/{}", id),
        "date": "2024-06-01",
        "content": format!("Content of {}", title),
        "category": category
    })
}

fn envelope(articles: Vec<Value>) -> Value {
    json!({ "articles": articles })
}

fn titles(state: &SyncState) -> Vec<String> {
    state
        .articles()
        .map(|a| a.iter().map(|a| a.title.clone()).collect())
        .unwrap_or_default()
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_single_article_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(vec![article(1, "Hello", None)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let state = store.list().await;

    let articles = state.articles().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, 1);
    assert_eq!(articles[0].title, "Hello");
    assert_eq!(articles[0].category, None);
    assert!(store.fetched_at().is_some());
}

#[tokio::test]
async fn test_concurrent_lists_share_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(vec![article(1, "A", None), article(2, "B", None)]))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let states = join_all((0..5).map(|_| store.list())).await;

    for state in &states {
        assert_eq!(titles(state), vec!["A", "B"]);
    }
}

#[tokio::test]
async fn test_server_error_is_failed_not_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let state = store.list().await;

    assert!(state.articles().is_none());
    assert_eq!(state.error().map(|e| e.kind()), Some(FailureKind::Server));
    assert!(matches!(store.current(), SyncState::Failed(_)));
}

#[tokio::test]
async fn test_malformed_body_is_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let state = store_for(&server).list().await;
    assert_eq!(state.error().map(|e| e.kind()), Some(FailureKind::Decode));
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_remove_refetches_whole_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(vec![article(1, "Old", None), article(2, "Kept", None)])),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(vec![article(2, "Kept", None)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_eq!(titles(&store.list().await), vec!["Old", "Kept"]);

    store.remove(1).await.unwrap();
    // No local filtering: the old snapshot stands until the refetch
    assert_eq!(titles(&store.current()), vec!["Old", "Kept"]);

    assert_eq!(titles(&store.list().await), vec!["Kept"]);
}

#[tokio::test]
async fn test_set_category_reflected_after_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(vec![article(7, "Story", None)])),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(vec![article(7, "Story", Some("News"))])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/articles/7/category"))
        .and(body_json(json!({ "category": "News" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.list().await;
    store.set_category(7, "News").await.unwrap();

    let state = store.list().await;
    assert_eq!(state.articles().unwrap()[0].category.as_deref(), Some("News"));
}

#[tokio::test]
async fn test_failed_delete_leaves_snapshot_fresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(vec![article(1, "A", None)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.list().await;

    let err = store.remove(1).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Server);
    // Still cached: no second GET
    assert_eq!(titles(&store.list().await), vec!["A"]);
}

// ============================================================================
// Stale results
// ============================================================================

#[tokio::test]
async fn test_superseded_fetch_never_overwrites_newer_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(vec![article(1, "Stale", None)]))
                .set_delay(Duration::from_millis(500)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(vec![article(1, "Fresh", None)])),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let early = {
        let store = store.clone();
        tokio::spawn(async move { store.list().await })
    };

    // Let the slow request reach the server, then supersede it
    tokio::time::sleep(Duration::from_millis(100)).await;
    store.invalidate();

    assert_eq!(titles(&store.list().await), vec!["Fresh"]);
    // The caller of the superseded fetch follows on to the fresh data
    assert_eq!(titles(&early.await.unwrap()), vec!["Fresh"]);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(titles(&store.current()), vec!["Fresh"]);
}

#[tokio::test]
async fn test_subscriber_sees_loading_then_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(vec![article(1, "A", None)]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_eq!(titles(&store.list().await), vec!["A"]);

    let mut rx = store.subscribe();
    store.invalidate();
    let refetch = {
        let store = store.clone();
        tokio::spawn(async move { store.list().await })
    };

    // The refetch replaces the Ready snapshot with Loading before it answers
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_loading());

    rx.changed().await.unwrap();
    let state = rx.borrow_and_update().clone();
    assert_eq!(titles(&state), vec!["A"]);
    assert_eq!(titles(&refetch.await.unwrap()), vec!["A"]);
}
