//! In-process HTTP tests: requests go through the full router and middleware
//! stack via `tower::ServiceExt::oneshot`, with a recording printer backend.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use rawspool::{PrintError, PrintResult, PrinterInfo, RawPrinter};
use rawspool_server::{Config, Server, ServerState, build_app};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// Records every job it receives and answers with a canned outcome
#[derive(Default)]
struct RecordingPrinter {
    jobs: Mutex<Vec<(String, Vec<u8>)>>,
    fail_with: Option<fn() -> PrintError>,
}

impl RecordingPrinter {
    fn failing(make: fn() -> PrintError) -> Self {
        Self {
            fail_with: Some(make),
            ..Default::default()
        }
    }

    fn jobs(&self) -> Vec<(String, Vec<u8>)> {
        self.jobs.lock().unwrap().clone()
    }
}

impl RawPrinter for RecordingPrinter {
    fn print_raw(&self, printer: &str, data: &[u8]) -> PrintResult<()> {
        if data.is_empty() {
            return Err(PrintError::EmptyPayload);
        }
        self.jobs
            .lock()
            .unwrap()
            .push((printer.to_string(), data.to_vec()));
        match self.fail_with {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }

    fn printers(&self) -> PrintResult<Vec<PrinterInfo>> {
        Ok(vec![PrinterInfo {
            name: "POS-80".into(),
            status: "Normal".into(),
            is_offline: false,
            is_busy: false,
            location: "Kitchen".into(),
            port: "USB001".into(),
            is_default: true,
            is_virtual: false,
        }])
    }
}

fn app_with(printer: Arc<RecordingPrinter>, dry_run: bool) -> axum::Router {
    let config = Config::with_overrides(0, dry_run);
    build_app(ServerState::with_printer(config, printer))
}

fn raw_post(uri: &str, content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    builder.body(body.into()).unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_print_hex() {
    let printer = Arc::new(RecordingPrinter::default());
    let app = app_with(printer.clone(), false);

    let (status, body) = send(
        app,
        post_json("/print", json!({ "printer": "POS-80", "data": "1B 40 48-69" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");
    assert_eq!(body["data"]["bytes"], 4);
    assert_eq!(body["data"]["encoding"], "hex");
    assert_eq!(
        printer.jobs(),
        vec![("POS-80".to_string(), vec![0x1B, 0x40, 0x48, 0x69])]
    );
}

#[tokio::test]
async fn test_print_base64_accepts_pascal_case_fields() {
    let printer = Arc::new(RecordingPrinter::default());
    let app = app_with(printer.clone(), false);

    let (status, body) = send(
        app,
        post_json("/print/base64", json!({ "Printer": "POS-80", "Data": "SGVsbG8=" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["encoding"], "base64");
    assert_eq!(printer.jobs(), vec![("POS-80".to_string(), b"Hello".to_vec())]);
}

#[tokio::test]
async fn test_malformed_payloads_are_rejected_before_printing() {
    let printer = Arc::new(RecordingPrinter::default());

    let (status, body) = send(
        app_with(printer.clone(), false),
        post_json("/print", json!({ "printer": "POS-80", "data": "ABC" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E1002");

    let (status, body) = send(
        app_with(printer.clone(), false),
        post_json("/print/base64", json!({ "printer": "POS-80", "data": "not-base64" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E1002");

    assert!(printer.jobs().is_empty());
}

#[tokio::test]
async fn test_separator_only_hex_is_empty_payload() {
    let printer = Arc::new(RecordingPrinter::default());

    let (status, body) = send(
        app_with(printer.clone(), false),
        post_json("/print", json!({ "printer": "POS-80", "data": "- -" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E1001");
    assert!(printer.jobs().is_empty());
}

#[tokio::test]
async fn test_missing_fields_and_bad_json() {
    let printer = Arc::new(RecordingPrinter::default());

    let (status, body) = send(
        app_with(printer.clone(), false),
        post_json("/print", json!({ "printer": "  ", "data": "1B40" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
    assert_eq!(body["message"], "Validation failed: Missing printer or data");

    let request = Request::builder()
        .method("POST")
        .uri("/print")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app_with(printer.clone(), false), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    assert!(printer.jobs().is_empty());
}

#[tokio::test]
async fn test_json_body_without_json_content_type() {
    let printer = Arc::new(RecordingPrinter::default());
    let payload = r#"{"printer":"POS-80","data":"1B40"}"#;

    for content_type in [None, Some("application/x-www-form-urlencoded"), Some("text/plain")] {
        let (status, body) = send(
            app_with(printer.clone(), false),
            raw_post("/print", content_type, payload),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "content-type {content_type:?}");
        assert_eq!(body["code"], "E0000");
    }

    assert_eq!(printer.jobs().len(), 3);
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let printer = Arc::new(RecordingPrinter::default());
    let mut config = Config::with_overrides(0, false);
    config.max_body_bytes = 64;
    let app = build_app(ServerState::with_printer(config, printer.clone()));

    let data = "1B".repeat(100);
    let (status, body) = send(
        app,
        post_json("/print", json!({ "printer": "POS-80", "data": data })),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "E0004");
    assert!(printer.jobs().is_empty());
}

#[tokio::test]
async fn test_dry_run_still_rejects_empty_payload() {
    let printer = Arc::new(RecordingPrinter::default());

    let (status, body) = send(
        app_with(printer.clone(), true),
        post_json("/print", json!({ "printer": "POS-80", "data": " - " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E1001");
    assert!(printer.jobs().is_empty());
}

#[tokio::test]
async fn test_dry_run_bypasses_printer() {
    let printer = Arc::new(RecordingPrinter::default());

    let (status, body) = send(
        app_with(printer.clone(), true),
        post_json("/print", json!({ "printer": "POS-80", "data": "1B40" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["dryRun"], true);
    assert!(printer.jobs().is_empty());
}

#[tokio::test]
async fn test_device_errors_map_to_status_codes() {
    let cases: [(fn() -> PrintError, StatusCode, &str); 4] = [
        (
            || PrintError::DeviceUnavailable {
                printer: "POS-80".into(),
                code: 1801,
                message: "The printer name is invalid.".into(),
            },
            StatusCode::NOT_FOUND,
            "E2001",
        ),
        (
            || PrintError::DocumentOpenFailed {
                code: 5,
                message: "Access is denied.".into(),
            },
            StatusCode::INTERNAL_SERVER_ERROR,
            "E2002",
        ),
        (
            || PrintError::PageOpenFailed {
                code: 5,
                message: "Access is denied.".into(),
            },
            StatusCode::INTERNAL_SERVER_ERROR,
            "E2003",
        ),
        (
            || PrintError::WriteFailed {
                written: 1,
                expected: 2,
                code: 0,
                message: "Incomplete write".into(),
            },
            StatusCode::INTERNAL_SERVER_ERROR,
            "E2004",
        ),
    ];

    for (make, expected_status, expected_code) in cases {
        let printer = Arc::new(RecordingPrinter::failing(make));
        let (status, body) = send(
            app_with(printer.clone(), false),
            post_json("/print", json!({ "printer": "POS-80", "data": "1B40" })),
        )
        .await;

        assert_eq!(status, expected_status);
        assert_eq!(body["code"], expected_code);
        assert_eq!(printer.jobs().len(), 1);
    }
}

#[tokio::test]
async fn test_list_printers() {
    let printer = Arc::new(RecordingPrinter::default());
    let request = Request::builder().uri("/printers").body(Body::empty()).unwrap();

    let (status, body) = send(app_with(printer, false), request).await;

    // Enveloped, camelCase fields (not the bare PascalCase array of older clients)
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");
    assert!(body["data"].is_array());
    assert_eq!(body["data"][0]["name"], "POS-80");
    assert!(body["data"][0].get("Name").is_none());
    assert_eq!(body["data"][0]["isDefault"], true);
    assert_eq!(body["data"][0]["location"], "Kitchen");
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let printer = Arc::new(RecordingPrinter::default());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app_with(printer.clone(), true), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["dryRun"], true);

    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let (status, body) = send(app_with(printer, false), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let printer = Arc::new(RecordingPrinter::default());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app_with(printer.clone(), false).oneshot(request).await.unwrap();
    let generated = response.headers().get("x-request-id").unwrap();
    assert!(!generated.is_empty());

    // A caller-supplied id comes back unchanged
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "till-7-0042")
        .body(Body::empty())
        .unwrap();
    let response = app_with(printer, false).oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "till-7-0042");
}

#[tokio::test]
async fn test_serve_stops_when_token_cancelled() {
    let server = Server::new(Config::with_overrides(0, true));
    let shutdown = CancellationToken::new();

    let handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { server.serve(shutdown).await }
    });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    shutdown.cancel();

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_concurrent_jobs_are_independent() {
    let printer = Arc::new(RecordingPrinter::default());

    let mut handles = Vec::new();
    for name in ["A", "B", "A", "C"] {
        let app = app_with(printer.clone(), false);
        handles.push(tokio::spawn(async move {
            send(app, post_json("/print", json!({ "printer": name, "data": "0A" }))).await
        }));
    }
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let mut names: Vec<String> = printer.jobs().into_iter().map(|(name, _)| name).collect();
    names.sort();
    assert_eq!(names, vec!["A", "A", "B", "C"]);
}
