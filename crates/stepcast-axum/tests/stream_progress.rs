//! Integration tests for the progress stream endpoint.
//!
//! These tests drive the router directly and read the raw SSE body.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use stepcast_axum::bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap};
use stepcast_axum::routes::create_router;
use stepcast_core::ports::{StepExecutor, StepFailure};
use stepcast_core::{SimulatedExecutor, Step, StepResult, TaskConfig, wire};
use tower::ServiceExt;

/// Executor that counts started steps before delegating.
struct CountingExecutor {
    inner: SimulatedExecutor,
    started: Arc<AtomicUsize>,
}

#[async_trait]
impl StepExecutor for CountingExecutor {
    async fn execute(&self, step: &Step) -> Result<StepResult, StepFailure> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(step).await
    }
}

fn test_context(task: TaskConfig) -> AxumContext {
    let config = ServerConfig::with_defaults().with_task(task.with_delay_scale(0.0));
    let mut ctx = bootstrap(&config).unwrap();
    ctx.keep_alive = Duration::from_secs(3600);
    ctx
}

fn stream_request() -> Request<Body> {
    Request::builder()
        .uri("/stream-progress")
        .body(Body::empty())
        .unwrap()
}

/// Split an SSE body into `(kind, payload)` pairs, skipping comments.
fn parse_frames(body: &str) -> Vec<(String, Value)> {
    body.split("\n\n")
        .filter(|frame| !frame.trim().is_empty())
        .filter_map(|frame| {
            let mut kind = None;
            let mut data = None;
            for line in frame.lines() {
                if let Some(rest) = line.strip_prefix("event:") {
                    kind = Some(rest.trim().to_string());
                } else if let Some(rest) = line.strip_prefix("data:") {
                    data = Some(serde_json::from_str(rest.trim()).unwrap());
                }
            }
            Some((kind?, data?))
        })
        .collect()
}

async fn read_body(ctx: AxumContext) -> (StatusCode, Option<String>, String) {
    let app = create_router(ctx, &CorsConfig::AllowAll);
    let response = app.oneshot(stream_request()).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn full_run_streams_progress_then_completion() {
    let (status, content_type, body) = read_body(test_context(TaskConfig::default())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(wire::CONTENT_TYPE));

    let frames = parse_frames(&body);
    let kinds: Vec<&str> = frames.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(kinds, ["progress", "progress", "progress", "complete"]);

    let percents: Vec<u64> = frames[..3]
        .iter()
        .map(|(_, data)| data["percent"].as_u64().unwrap())
        .collect();
    assert_eq!(percents, [33, 66, 100]);
    assert_eq!(
        frames[0].1["message"],
        "Sum Operation Complete. Status: Sum operation successful"
    );

    let complete = &frames[3].1;
    assert_eq!(
        complete["result"],
        "All operations (Sum, Multiply, Divide) completed successfully!"
    );
    let summary = complete["summary"].as_object().unwrap();
    assert_eq!(summary.len(), 3);
    assert_eq!(summary["sum"], "Sum operation successful");
    assert_eq!(summary["multiply"], "Multiply operation successful");
    assert_eq!(summary["divide"], "Divide operation successful");
}

#[tokio::test]
async fn frames_use_the_documented_layout() {
    let (_, _, body) = read_body(test_context(TaskConfig::default())).await;

    let first = body.split("\n\n").next().unwrap();
    let lines: Vec<&str> = first.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "event: progress");
    assert!(lines[1].starts_with("data: {"));
}

#[tokio::test]
async fn failing_step_streams_one_error_and_no_completion() {
    let ctx = test_context(TaskConfig::default().with_fail_step("multiply"));
    let (status, _, body) = read_body(ctx).await;

    assert_eq!(status, StatusCode::OK);
    let frames = parse_frames(&body);
    let kinds: Vec<&str> = frames.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(kinds, ["progress", "error"]);

    let error = frames[1].1.as_object().unwrap();
    assert_eq!(error.len(), 2);
    assert_eq!(error["error"], "An unexpected server error occurred.");
    assert!(
        error["details"]
            .as_str()
            .unwrap()
            .contains("injected failure in multiply operation")
    );
}

#[tokio::test]
async fn each_request_runs_an_independent_task() {
    let ctx = test_context(TaskConfig::default());
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let response = app.clone().oneshot(stream_request()).await.unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        bodies.push(String::from_utf8(body.to_vec()).unwrap());
    }

    let first = parse_frames(&bodies[0]);
    let second = parse_frames(&bodies[1]);
    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[tokio::test]
async fn client_disconnect_stops_remaining_steps() {
    let started = Arc::new(AtomicUsize::new(0));
    let mut ctx = test_context(TaskConfig::default());
    ctx.executor = Arc::new(CountingExecutor {
        inner: SimulatedExecutor::new(0.05),
        started: started.clone(),
    });
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let response = app.oneshot(stream_request()).await.unwrap();
    let mut body = response.into_body();

    // Read until the first progress event arrives, then hang up.
    let mut received = String::new();
    while !received.contains("event: progress") {
        let frame = body.frame().await.unwrap().unwrap();
        if let Ok(data) = frame.into_data() {
            received.push_str(std::str::from_utf8(&data).unwrap());
        }
    }
    drop(body);

    // Multiply (150ms scaled) was in flight; divide must never start.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(started.load(Ordering::SeqCst), 2);
    assert!(!received.contains("event: complete"));
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let app = create_router(test_context(TaskConfig::default()), &CorsConfig::AllowAll);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = create_router(test_context(TaskConfig::default()), &CorsConfig::AllowAll);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn misconfigured_task_surfaces_as_http_error() {
    let mut ctx = test_context(TaskConfig::default());
    ctx.task = TaskConfig::default().with_fail_step("modulo");

    let (status, _, body) = read_body(ctx).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("modulo"));
}

#[tokio::test]
async fn oversized_delay_scale_is_rejected_before_streaming() {
    let config =
        ServerConfig::with_defaults().with_task(TaskConfig::with_defaults().with_delay_scale(1e20));
    assert!(bootstrap(&config).is_err());

    let mut ctx = test_context(TaskConfig::default());
    ctx.task = TaskConfig::default().with_delay_scale(1e20);

    let (status, _, body) = read_body(ctx).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("delay scale"));
}
