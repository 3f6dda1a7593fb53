use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use legal_lens::{
    api::{router, types::HealthDto},
    config::Settings,
    nlp::{Analysis, Entity, Summary},
    pipeline,
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

fn app() -> Router {
    let settings = Settings::default();
    router(pipeline::from_settings(&settings).expect("default pipeline"))
}

async fn call(app: Router, method: &str, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).expect("json body")
}

#[tokio::test]
async fn healthz_reports_backends() {
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthDto = parse(&bytes);
    assert_eq!(health.status, "ok");
    assert_eq!(health.ner, "rules");
    assert_eq!(health.summarizer, "extractive");
}

#[tokio::test]
async fn analyze_returns_full_record() {
    let html = "<p>Acme Corp signed on January 5. Payment is due in 30 days.</p>";
    let (status, body) = call(app(), "POST", "/analyze", serde_json::json!({ "html": html })).await;
    assert_eq!(status, StatusCode::OK);
    let analysis: Analysis = parse(&body);
    assert_eq!(analysis.clauses.len(), 2);
    assert_eq!(analysis.summaries.len(), 2);
    assert!(analysis.entities.iter().any(|e| e.text == "January 5"));
}

#[tokio::test]
async fn entities_endpoint_lists_spans() {
    let html = "<div>Fees of $1,000 are owed to Initech LLC.</div>";
    let (status, body) = call(app(), "POST", "/entities", serde_json::json!({ "html": html })).await;
    assert_eq!(status, StatusCode::OK);
    let entities: Vec<Entity> = parse(&body);
    let labels: Vec<&str> = entities.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["MONEY", "ORG"]);
}

#[tokio::test]
async fn summarize_endpoint_summarizes_one_clause() {
    let clause = "The Tenant (including its agents) shall keep the premises clean.";
    let (status, body) =
        call(app(), "POST", "/summarize", serde_json::json!({ "clause": clause })).await;
    assert_eq!(status, StatusCode::OK);
    let summary: Summary = parse(&body);
    assert_eq!(summary.clause_index, 0);
    assert_eq!(summary.text, clause);
}

#[tokio::test]
async fn empty_document_is_unprocessable() {
    let (status, _) = call(app(), "POST", "/clauses", serde_json::json!({ "html": "  " })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn router_state_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<legal_lens::pipeline::Pipeline>();
    let _ = Arc::new(app());
}
