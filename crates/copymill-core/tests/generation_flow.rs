//! End-to-end generation over a real HTTP client and file-backed store.

use copymill_core::prelude::*;
use copymill_core::{BackendConfig, HttpBackend, JsonFileStore};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_over(server: &MockServer, store_path: &std::path::Path) -> ContentService {
    let backend = HttpBackend::new(BackendConfig::new(server.uri())).unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(store_path).unwrap());
    ContentService::new(Arc::new(backend), store, CoreConfig::default())
}

#[tokio::test]
async fn messy_response_lands_as_normalized_html_and_survives_reopen() {
    let server = MockServer::start().await;
    let raw = concat!(
        "Here's the content you requested:\n",
        "```json\n",
        "{\"content\":\"# Email Automation\\n\\n",
        "Email automation saves **hours** every week.\\n\\n",
        "## Getting Started\\n\\n",
        "- Pick a trigger\\n- Write the sequence\",",
        "\"metaSeoTitle\":\"Email Automation Guide\",",
        "\"metaDescription\":\"How to automate email.\"}\n",
        "```"
    );
    Mock::given(method("POST"))
        .and(path("/api/blog/generate-content"))
        .and(body_partial_json(serde_json::json!({"keyword": "email automation"})))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("rows.json");
    let service = service_over(&server, &store_path);

    let row = service
        .create_row(ContentKind::Blog, "email automation", None)
        .unwrap();
    let row = service.generate(row.id(), None).await.unwrap();

    assert_eq!(row.status(), RowStatus::Completed);
    assert!(row.output().starts_with("<h1>Email Automation</h1>"));
    assert!(row.output().contains("<h2>Getting Started</h2>"));
    assert!(row.output().contains("<strong>hours</strong>"));
    assert!(row.output().contains("<li>Pick a trigger</li>"));
    assert!(!row.output().contains("```"));
    assert!(!row.output().contains("Here's the content"));

    let meta = service.cached_meta(row.id()).unwrap().unwrap();
    assert_eq!(meta.meta_seo_title, "Email Automation Guide");

    // A fresh service over the same file sees the completed row.
    let reopened = service_over(&server, &store_path);
    let stored = reopened.row(row.id()).unwrap();
    assert_eq!(stored.status(), RowStatus::Completed);
    assert_eq!(stored.output(), row.output());
}

#[tokio::test]
async fn backend_error_is_persisted_on_the_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/newsletter/generate-content"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"message":"model overloaded"}"#))
        .expect(1) // exactly one call: failures are not retried
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("rows.json");
    let service = service_over(&server, &store_path);

    let row = service
        .create_row(ContentKind::Newsletter, "q4 recap", None)
        .unwrap();
    let err = service.generate(row.id(), None).await.unwrap_err();
    assert!(matches!(err, CoreError::Backend(_)));

    let stored = service_over(&server, &store_path).row(row.id()).unwrap();
    assert_eq!(stored.status(), RowStatus::Error);
    assert_eq!(
        stored.error_message(),
        Some("backend returned 500: model overloaded")
    );
}

#[tokio::test]
async fn truncated_json_still_completes_the_row() {
    let server = MockServer::start().await;
    // Connection-dropped mid-payload: no closing quote or brace.
    let raw = r##"{"content":"# Partial Draft\n\nThe first paragraph made it through"##;
    Mock::given(method("POST"))
        .and(path("/api/blog/generate-content"))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let service = service_over(&server, &dir.path().join("rows.json"));

    let row = service.create_row(ContentKind::Blog, "drafting", None).unwrap();
    let row = service.generate(row.id(), None).await.unwrap();

    assert_eq!(row.status(), RowStatus::Completed);
    assert!(row.output().starts_with("<h1>Partial Draft</h1>"));
}
