use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use emailer::{api_routes, AppState, Params, PdfFetcher, StaticLocaleCatalog};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

/// Writes a small PDF per request into its own directory.
struct DiskFetcher {
    dir: TempDir,
}

#[async_trait]
impl PdfFetcher for DiskFetcher {
    async fn fetch(
        &self,
        _authorization: &str,
        _organization_id: &str,
        document: &str,
        record_id: &str,
        _params: &Params,
        _filename: &str,
    ) -> anyhow::Result<PathBuf> {
        if record_id == "broken" {
            anyhow::bail!("pdf generator returned 500");
        }
        let path = self.dir.path().join(format!("{document}-{record_id}.pdf"));
        tokio::fs::write(&path, b"%PDF").await?;
        Ok(path)
    }
}

fn app() -> axum::Router {
    let fetcher = DiskFetcher {
        dir: tempfile::tempdir().unwrap(),
    };
    api_routes(AppState::new(
        Arc::new(StaticLocaleCatalog::builtin()),
        Arc::new(fetcher),
    ))
}

fn attachment_request(document: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/attachments/{document}"))
        .header("content-type", "application/json")
        .header("authorization", "Bearer abc")
        .header("organizationid", "org-7")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn reminder_body(term: Value, record_id: &str) -> Value {
    json!({
        "locale": "en",
        "recordId": record_id,
        "params": { "term": term },
        "tenant": { "name": "Dupont", "reference": "A42" },
    })
}

#[tokio::test]
async fn root_responds_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    assert_eq!(body, "Emailer API".as_bytes());
}

#[tokio::test]
async fn reminder_attachment_is_returned_as_base64() {
    let response = app()
        .oneshot(attachment_request(
            "rentcall_reminder",
            reminder_body(json!(2023120100u64), "rec-1"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let payload: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        payload,
        json!({
            "attachment": [{
                "filename": "Rent reminder-Dupont-12_23_A42.pdf",
                "data": "JVBERg==",
            }]
        })
    );
}

#[tokio::test]
async fn unknown_document_is_not_found() {
    let response = app()
        .oneshot(attachment_request(
            "lease",
            reminder_body(json!("2023120100"), "rec-1"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_term_is_a_bad_request() {
    let response = app()
        .oneshot(attachment_request(
            "rentcall_reminder",
            reminder_body(json!("March 2024"), "rec-1"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fetch_failure_is_a_bad_gateway() {
    let response = app()
        .oneshot(attachment_request(
            "rentcall",
            reminder_body(json!("2023120100"), "broken"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn missing_authorization_is_unauthorized() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/attachments/rentcall_reminder")
        .header("content-type", "application/json")
        .header("organizationid", "org-7")
        .body(Body::from(reminder_body(json!("2023120100"), "rec-1").to_string()))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
