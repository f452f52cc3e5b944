use crate::app_with_state;
use crate::state::AppState;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use cg_core::Settings;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::io::{Cursor, Read};
use tower::ServiceExt;

const RUST_SNIPPET: &str = "// main.rs\nfn main() {\n    let greeting = \"hello\";\n    println!(\"{}\", greeting);\n    for i in 0..3 {\n        println!(\"{}\", i);\n    }\n    let total: u32 = (1..=10).sum();\n    println!(\"total = {}\", total);\n}\n";

const PY_SNIPPET: &str = "def fib(n):\n    if n < 2:\n        return n\n    return fib(n - 1) + fib(n - 2)\n\nfor i in range(10):\n    print(fib(i))\n\nresult = [fib(x) for x in range(20)]\nprint(result)\nprint(sum(result), max(result), min(result))\n";

fn app(state: &AppState) -> Router {
    app_with_state(state.clone())
}

async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

async fn send_json(state: &AppState, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let (status, bytes) = send(state, req).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get_json(state: &AppState, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes) = send(state, req).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn block(text: &str, position: usize, language: &str) -> Value {
    json!({
        "raw_text": text,
        "structural_hints": [{ "kind": "class", "value": format!("language-{language}") }],
        "position_index": position,
    })
}

async fn seed(state: &AppState) -> Value {
    let (status, body) = send_json(
        state,
        "POST",
        "/api/v1/pass",
        json!({ "blocks": [block(RUST_SNIPPET, 0, "rust"), block("tiny", 1, "rust"), block(PY_SNIPPET, 2, "python")] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_health() {
    let state = AppState::new();
    let (status, body) = get_json(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_pass_classifies_and_lists() {
    let state = AppState::new();
    let body = seed(&state).await;
    let snippets = body["snippets"].as_array().unwrap();
    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0]["index"], 0);
    assert_eq!(snippets[0]["filename"], "main.rs");
    assert_eq!(snippets[1]["extension"], "py");
    assert!(snippets[0]["preview"].as_str().unwrap().ends_with("..."));

    let (_, listed) = get_json(&state, "/api/v1/snippets").await;
    assert_eq!(listed["snippets"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_repeated_pass_is_stable() {
    let state = AppState::new();
    let first = seed(&state).await;
    let second = seed(&state).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_single_block_admission() {
    let state = AppState::new();
    let (status, body) = send_json(&state, "POST", "/api/v1/blocks", block(PY_SNIPPET, 0, "python")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admitted"], true);

    let (_, again) = send_json(&state, "POST", "/api/v1/blocks", block(PY_SNIPPET, 1, "python")).await;
    assert_eq!(again["admitted"], false);
    assert!(again["snippet"].is_null());
}

#[tokio::test]
async fn test_stream_detect_off_ignores_streamed_blocks() {
    let settings = Settings { stream_detect: false, ..Settings::default() };
    let state = AppState::with_settings(settings);
    let (_, body) = send_json(&state, "POST", "/api/v1/blocks", block(PY_SNIPPET, 0, "python")).await;
    assert_eq!(body["admitted"], false);

    let body = seed(&state).await;
    assert_eq!(body["snippets"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_clear_suppresses_reappearance() {
    let state = AppState::new();
    seed(&state).await;

    let (status, body) = send_json(&state, "POST", "/api/v1/snippets/clear", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleared"], 2);

    let body = seed(&state).await;
    assert!(body["snippets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_rename_snippet() {
    let state = AppState::new();
    seed(&state).await;

    let (status, body) =
        send_json(&state, "PUT", "/api/v1/snippets/1/name", json!({ "name": "fib/calc.py" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "fib_calc.py");

    let (status, body) = send_json(&state, "PUT", "/api/v1/snippets/9/name", json!({ "name": "x.py" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = send_json(&state, "PUT", "/api/v1/snippets/0/name", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_archive_download() {
    let state = AppState::new();
    seed(&state).await;

    let req = Request::builder().method("POST").uri("/api/v1/archive").body(Body::empty()).unwrap();
    let resp = app(&state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/zip");
    let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("CodGatr_Bundle_"));
    let bytes = resp.into_body().collect().await.unwrap().to_bytes().to_vec();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);
    let mut content = String::new();
    archive.by_name("main.rs").unwrap().read_to_string(&mut content).unwrap();
    assert!(content.contains("fn main()"));

    let (_, stats) = get_json(&state, "/api/v1/stats").await;
    assert_eq!(stats["stats"]["zips"], 1);
    assert_eq!(stats["stats"]["filesDetected"], 2);
}

#[tokio::test]
async fn test_archive_selection() {
    let state = AppState::new();
    seed(&state).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/archive")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"selection":[1]}"#))
        .unwrap();
    let (status, bytes) = send(&state, req).await;
    assert_eq!(status, StatusCode::OK);
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 1);

    let (status, _) = send_json(&state, "POST", "/api/v1/archive", json!({ "selection": [5] })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_archive_applies_renames() {
    let state = AppState::new();
    seed(&state).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/archive")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"renames":[{"index":1,"name":"main.rs"}]}"#))
        .unwrap();
    let (status, bytes) = send(&state, req).await;
    assert_eq!(status, StatusCode::OK);
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<String> = (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_string()).collect();
    assert_eq!(names, vec!["main.rs", "main_2.rs"]);
    assert_eq!(state.session.with(|s| s.snippets()[1].filename.clone()), "main.rs");
}

#[tokio::test]
async fn test_failed_archive_keeps_names() {
    let state = AppState::new();
    seed(&state).await;

    let (status, _) = send_json(
        &state,
        "POST",
        "/api/v1/archive",
        json!({ "renames": [{ "index": 0, "name": "renamed.rs" }], "selection": [5] }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &state,
        "POST",
        "/api/v1/archive",
        json!({ "renames": [{ "index": 0, "name": "renamed.rs" }, { "index": 9, "name": "x.py" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let names: Vec<String> = state.session.with(|s| s.snippets().iter().map(|sn| sn.filename.clone()).collect());
    assert_eq!(names[0], "main.rs");
    assert_eq!(state.session.with(|s| s.stats().zips), 0);
}

#[tokio::test]
async fn test_empty_archive() {
    let state = AppState::new();
    let req = Request::builder().method("POST").uri("/api/v1/archive").body(Body::empty()).unwrap();
    let (status, bytes) = send(&state, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes.len(), 22);
}

#[tokio::test]
async fn test_single_download() {
    let state = AppState::new();
    seed(&state).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/download")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"index":0}"#))
        .unwrap();
    let resp = app(&state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(resp.headers()[header::CONTENT_DISPOSITION], "attachment; filename=\"main.rs\"");
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], RUST_SNIPPET.as_bytes());

    let (_, stats) = get_json(&state, "/api/v1/stats").await;
    assert_eq!(stats["stats"]["downloads"], 1);

    let (status, _) = send_json(&state, "POST", "/api/v1/download", json!({ "index": 7 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_round_trip() {
    let state = AppState::new();
    let (status, body) = get_json(&state, "/api/v1/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["minContentLen"], 200);

    let (status, body) =
        send_json(&state, "PUT", "/api/v1/settings", json!({ "minContentLen": 10, "defaultExtension": "md" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["minContentLen"], 10);
    assert_eq!(body["defaultExtension"], "md");
    assert_eq!(state.session.with(|s| s.config().min_content_length), 10);

    let (status, body) = send_json(&state, "POST", "/api/v1/settings/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(Settings::default()).unwrap());
}

#[tokio::test]
async fn test_invalid_settings_rejected() {
    let state = AppState::new();
    let req = Request::builder()
        .method("PUT")
        .uri("/api/v1/settings")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, bytes) = send(&state, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_auto_detect_off_admits_nothing() {
    let settings = Settings { auto_detect: false, ..Settings::default() };
    let state = AppState::with_settings(settings);
    let body = seed(&state).await;
    assert!(body["snippets"].as_array().unwrap().is_empty());
}
