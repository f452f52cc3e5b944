use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use cg_archive::serialize_archive;
use cg_core::{bundle_filename, mime_for_extension, sanitize_filename, CandidateBlock, Settings, Snippet};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn snippet_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/pass", post(run_pass))
        .route("/api/v1/blocks", post(admit_block))
        .route("/api/v1/snippets", get(list_snippets))
        .route("/api/v1/snippets/clear", post(clear_snippets))
        .route("/api/v1/snippets/{index}/name", put(rename_snippet))
}

pub fn download_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/archive", post(download_archive))
        .route("/api/v1/download", post(download_single))
}

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/settings", get(get_settings).put(put_settings))
        .route("/api/v1/settings/reset", post(reset_settings))
        .route("/api/v1/stats", get(get_stats))
}

/// Snippet as shown to a list UI.
#[derive(Debug, Serialize)]
pub struct SnippetView {
    pub index: usize,
    #[serde(flatten)]
    pub snippet: Snippet,
    pub label: String,
    pub preview: String,
}

fn views(snippets: &[Snippet]) -> Vec<SnippetView> {
    snippets
        .iter()
        .enumerate()
        .map(|(index, s)| SnippetView {
            index,
            snippet: s.clone(),
            label: s.label(),
            preview: s.preview(),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct PassRequest {
    pub blocks: Vec<CandidateBlock>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameEntry {
    pub index: usize,
    pub name: String,
}

/// Archive body. Renames apply before selection and persist only if the
/// archive is produced.
#[derive(Debug, Default, Deserialize)]
pub struct ArchiveRequest {
    #[serde(default)]
    pub selection: Option<Vec<usize>>,
    #[serde(default)]
    pub renames: Vec<RenameEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub index: usize,
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_bytes(value.as_bytes()).map_err(|e| ApiError::internal(e.to_string()))
}

fn attachment(filename: &str, mime: &str, body: Vec<u8>) -> Result<Response, ApiError> {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    let headers = [
        (header::CONTENT_TYPE, header_value(mime)?),
        (header::CONTENT_DISPOSITION, header_value(&disposition)?),
    ];
    Ok((headers, body).into_response())
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

async fn run_pass(State(state): State<AppState>, Json(req): Json<PassRequest>) -> Json<Value> {
    let snippets = state.session.with(|s| views(s.run_pass(&req.blocks)));
    Json(json!({ "snippets": snippets }))
}

/// Streamed block, offered as content appears. Ignored while `streamDetect` is off.
async fn admit_block(State(state): State<AppState>, Json(block): Json<CandidateBlock>) -> Json<Value> {
    let admitted = state.session.with(|s| {
        if s.settings().stream_detect {
            s.classify_and_admit(&block)
        } else {
            None
        }
    });
    Json(json!({
        "admitted": admitted.is_some(),
        "snippet": admitted,
    }))
}

async fn list_snippets(State(state): State<AppState>) -> Json<Value> {
    let snippets = state.session.with(|s| views(s.snippets()));
    Json(json!({ "snippets": snippets }))
}

async fn clear_snippets(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.session.with(|s| s.clear());
    Json(json!({ "status": "cleared", "cleared": cleared }))
}

async fn rename_snippet(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<Snippet>, ApiError> {
    let snippet = state.session.with(|s| s.rename(index, &req.name).cloned())?;
    Ok(Json(snippet))
}

async fn download_archive(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let req: ArchiveRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ArchiveRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(e.to_string()))?
    };
    // Renames are staged and committed only once the archive is built.
    let (entries, bytes) = state.session.with(|s| -> Result<_, ApiError> {
        let staged = s
            .registry()
            .with_renames(req.renames.iter().map(|r| (r.index, r.name.as_str())))?;
        let payloads = staged.payloads(req.selection.as_deref())?;
        let bytes = serialize_archive(&payloads)?;
        s.commit_registry(staged);
        s.record_zip();
        Ok((payloads.len(), bytes))
    })?;
    let filename = bundle_filename(Utc::now());
    info!(entries, bytes = bytes.len(), %filename, "archive download");
    attachment(&filename, "application/zip", bytes)
}

async fn download_single(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Result<Response, ApiError> {
    let snippet = state
        .session
        .with(|s| s.registry().get(req.index).cloned())
        .ok_or_else(|| ApiError::not_found(format!("Snippet {} not found", req.index)))?;

    let filename = sanitize_filename(&snippet.filename);
    if filename.is_empty() {
        return Err(ApiError::bad_request("Snippet has an empty filename"));
    }
    state.session.with(|s| s.record_download());
    attachment(&filename, mime_for_extension(&snippet.extension), snippet.content.into_bytes())
}

async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.session.with(|s| s.settings().clone()))
}

/// Import settings. The body is parsed leniently: missing keys take defaults.
async fn put_settings(State(state): State<AppState>, body: String) -> Result<Json<Settings>, ApiError> {
    let settings = Settings::from_json(&body)?;
    state.session.with(|s| s.update_settings(settings.clone()));
    info!("settings updated");
    Ok(Json(settings))
}

async fn reset_settings(State(state): State<AppState>) -> Json<Settings> {
    let settings = Settings::default();
    state.session.with(|s| s.update_settings(settings.clone()));
    Json(settings)
}

async fn get_stats(State(state): State<AppState>) -> Json<Value> {
    let stats = state.session.with(|s| s.stats());
    Json(json!({ "stats": stats }))
}
