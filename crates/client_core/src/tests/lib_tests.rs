use super::*;

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tokio::{net::TcpListener, sync::oneshot, sync::Mutex};

#[derive(Debug)]
struct CapturedPart {
    field_name: String,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

enum ScriptedResponse {
    Message(String),
    Status(u16),
    RawBody(String),
    Delayed { message: String, delay: Duration },
}

#[derive(Clone)]
struct UploadServerState {
    response: Arc<ScriptedResponse>,
    captured: Arc<Mutex<Option<oneshot::Sender<Vec<CapturedPart>>>>>,
}

async fn handle_upload(
    State(state): State<UploadServerState>,
    mut multipart: Multipart,
) -> Response {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("read multipart field") {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.expect("read field bytes").to_vec();
        parts.push(CapturedPart {
            field_name,
            file_name,
            content_type,
            bytes,
        });
    }
    if let Some(tx) = state.captured.lock().await.take() {
        let _ = tx.send(parts);
    }

    match state.response.as_ref() {
        ScriptedResponse::Message(message) => {
            Json(serde_json::json!({ "message": message })).into_response()
        }
        ScriptedResponse::Status(code) => {
            let status = axum::http::StatusCode::from_u16(*code).expect("scripted status");
            (status, "scripted failure").into_response()
        }
        ScriptedResponse::RawBody(body) => (
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        ScriptedResponse::Delayed { message, delay } => {
            tokio::time::sleep(*delay).await;
            Json(serde_json::json!({ "message": message })).into_response()
        }
    }
}

async fn spawn_upload_server(
    response: ScriptedResponse,
) -> (String, oneshot::Receiver<Vec<CapturedPart>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let (tx, rx) = oneshot::channel();
    let state = UploadServerState {
        response: Arc::new(response),
        captured: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/upload", post(handle_upload))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

fn client_for(base_url: String) -> SummarizeClient {
    SummarizeClient::new(&ClientConfig {
        base_url,
        request_timeout: Duration::from_secs(5),
    })
    .expect("build client")
}

#[tokio::test]
async fn submits_single_multipart_part_and_returns_message_verbatim() {
    let (base_url, captured) = spawn_upload_server(ScriptedResponse::Message(
        "# Summary\n\nTwo short paragraphs.".to_string(),
    ))
    .await;
    let client = client_for(base_url);

    let summary = client
        .submit_document("report.pdf", b"%PDF-1.7 test bytes".to_vec())
        .await
        .expect("summary");
    assert_eq!(summary, "# Summary\n\nTwo short paragraphs.");

    let parts = tokio::time::timeout(Duration::from_secs(2), captured)
        .await
        .expect("server captured upload")
        .expect("capture channel");
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].field_name, "file");
    assert_eq!(parts[0].file_name, "report.pdf");
    assert_eq!(parts[0].content_type, "application/pdf");
    assert_eq!(parts[0].bytes, b"%PDF-1.7 test bytes");
}

#[tokio::test]
async fn surfaces_rejection_status_and_condensed_body() {
    let (base_url, _captured) = spawn_upload_server(ScriptedResponse::Status(500)).await;
    let client = client_for(base_url);

    let err = client
        .submit_document("report.pdf", b"bytes".to_vec())
        .await
        .expect_err("rejection");
    match err {
        TransferError::Rejected { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "scripted failure");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn fails_closed_when_message_field_is_missing() {
    let (base_url, _captured) = spawn_upload_server(ScriptedResponse::RawBody(
        r#"{"summary": "wrong key"}"#.to_string(),
    ))
    .await;
    let client = client_for(base_url);

    let err = client
        .submit_document("report.pdf", b"bytes".to_vec())
        .await
        .expect_err("payload error");
    assert!(matches!(err, TransferError::Payload(_)), "got {err:?}");
}

#[tokio::test]
async fn fails_closed_on_non_json_success_body() {
    let (base_url, _captured) = spawn_upload_server(ScriptedResponse::RawBody(
        "<html>proxy error page</html>".to_string(),
    ))
    .await;
    let client = client_for(base_url);

    let err = client
        .submit_document("report.pdf", b"bytes".to_vec())
        .await
        .expect_err("payload error");
    assert!(matches!(err, TransferError::Payload(_)), "got {err:?}");
}

#[tokio::test]
async fn reports_timeout_as_request_failure() {
    let (base_url, _captured) = spawn_upload_server(ScriptedResponse::Delayed {
        message: "too late".to_string(),
        delay: Duration::from_secs(5),
    })
    .await;
    let client = SummarizeClient::new(&ClientConfig {
        base_url,
        request_timeout: Duration::from_millis(250),
    })
    .expect("build client");

    let err = client
        .submit_document("report.pdf", b"bytes".to_vec())
        .await
        .expect_err("timeout");
    assert!(err.is_timeout(), "got {err:?}");
    assert!(matches!(err, TransferError::Request(_)));
}

#[tokio::test]
async fn tolerates_trailing_slash_in_base_url() {
    let (base_url, captured) =
        spawn_upload_server(ScriptedResponse::Message("ok".to_string())).await;
    let client = client_for(format!("{base_url}/"));

    let summary = client
        .submit_document("report.pdf", b"bytes".to_vec())
        .await
        .expect("summary");
    assert_eq!(summary, "ok");

    let parts = tokio::time::timeout(Duration::from_secs(2), captured)
        .await
        .expect("server captured upload")
        .expect("capture channel");
    assert_eq!(parts.len(), 1);
}

#[test]
fn normalizes_base_urls() {
    assert_eq!(
        normalize_base_url("http://localhost:8000"),
        "http://localhost:8000"
    );
    assert_eq!(
        normalize_base_url("http://localhost:8000/"),
        "http://localhost:8000"
    );
    assert_eq!(
        normalize_base_url("  http://summarizer.example.com//  "),
        "http://summarizer.example.com"
    );
}

#[test]
fn condenses_long_rejection_bodies() {
    assert_eq!(condense_body("  short  "), "short");

    let long = "x".repeat(500);
    let condensed = condense_body(&long);
    assert_eq!(condensed.chars().count(), 203);
    assert!(condensed.ends_with("..."));
}
