use std::net::SocketAddr;

use axum::{http::StatusCode, routing::get, Router};
use legal_lens::{
    config::Settings,
    data::{fetch::fetch_html, DocumentSource},
};
use tokio::net::TcpListener;

const PAGE: &str = "<html><body><p>Acme Corp signed on January 5.</p></body></html>";

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/contract", get(|| async { PAGE }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn successful_response_body_is_returned_unchanged() {
    let addr = spawn_server().await;
    let body = fetch_html(&format!("http://{addr}/contract"), &Settings::default())
        .await
        .unwrap();
    assert_eq!(body, PAGE);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let addr = spawn_server().await;
    let err = fetch_html(&format!("http://{addr}/missing"), &Settings::default())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("HTTP 404"), "{err:#}");
}

#[tokio::test]
async fn url_source_loads_through_fetch() {
    let addr = spawn_server().await;
    let source = DocumentSource::Url(format!("http://{addr}/contract"));
    assert_eq!(source.load(&Settings::default()).await.unwrap(), PAGE);
}

#[tokio::test]
async fn file_source_reports_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let source = DocumentSource::File(dir.path().join("absent.html"));
    let err = source.load(&Settings::default()).await.unwrap_err();
    assert!(format!("{err:#}").contains("absent.html"));
}
