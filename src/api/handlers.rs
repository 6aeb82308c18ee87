//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::state::{AppError, AppSettings, AppState, BoardError, Snapshot, SnapshotPatch, Timer};
use super::responses::{
    ActionResponse, EditorResponse, HealthResponse, NewTimerRequest, SaveResponse, StatusResponse,
    TimerView, TimersResponse,
};

type ApiResult<T> = Result<Json<T>, StatusCode>;

fn status_for(e: &AppError) -> StatusCode {
    match e {
        AppError::Board(BoardError::NotFound(_)) => StatusCode::NOT_FOUND,
        AppError::Board(BoardError::Archived(_)) => StatusCode::CONFLICT,
        AppError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(action: &str, e: AppError) -> StatusCode {
    let status = status_for(&e);
    if status.is_server_error() {
        error!("Failed to {}: {}", action, e);
    } else {
        warn!("Rejected {}: {}", action, e);
    }
    status
}

fn action_response(
    state: &AppState,
    status: &str,
    index: usize,
    timer: &Timer,
) -> ApiResult<ActionResponse> {
    let colors = state
        .get_settings()
        .map_err(|e| reject("read settings", e))?
        .colors;
    let message = format!("{} '{}' at {}", status, timer.title, timer.formatted_time());
    Ok(Json(ActionResponse::new(
        status,
        message,
        TimerView::new(index, timer, &colors),
    )))
}

/// Handle GET /timers - Current timers for the floating window
pub async fn timers_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimersResponse> {
    let timers = state.get_timers().map_err(|e| reject("read timers", e))?;
    let settings = state.get_settings().map_err(|e| reject("read settings", e))?;

    Ok(Json(TimersResponse {
        running: timers.iter().position(|t| t.is_running),
        timers: TimerView::list(&timers, &settings.colors),
        timestamp: Utc::now(),
    }))
}

/// Handle POST /timers/:index/toggle - Start exclusively or pause
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<ActionResponse> {
    let timer = state
        .toggle_timer(index)
        .map_err(|e| reject("toggle timer", e))?;
    let status = if timer.is_running { "running" } else { "paused" };
    action_response(&state, status, index, &timer)
}

/// Handle POST /timers/:index/reset
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<ActionResponse> {
    let timer = state.reset_timer(index).map_err(|e| reject("reset timer", e))?;
    action_response(&state, "reset", index, &timer)
}

/// Handle POST /timers/:index/archive
pub async fn archive_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<ActionResponse> {
    let timer = state
        .archive_timer(index)
        .map_err(|e| reject("archive timer", e))?;
    action_response(&state, "archived", index, &timer)
}

/// Handle POST /timers/:index/unarchive
pub async fn unarchive_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<ActionResponse> {
    let timer = state
        .unarchive_timer(index)
        .map_err(|e| reject("unarchive timer", e))?;
    action_response(&state, "unarchived", index, &timer)
}

/// Handle POST /timers - Append a new idle timer
pub async fn add_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewTimerRequest>,
) -> Result<(StatusCode, Json<ActionResponse>), StatusCode> {
    let index = state
        .add_timer(request.title, request.time)
        .map_err(|e| reject("add timer", e))?;
    let timer = state
        .get_timers()
        .map_err(|e| reject("read timers", e))?
        .get(index)
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let response = action_response(&state, "added", index, &timer)?;
    Ok((StatusCode::CREATED, response))
}

/// Handle DELETE /timers/:index
pub async fn remove_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<ActionResponse> {
    let timer = state
        .remove_timer(index)
        .map_err(|e| reject("remove timer", e))?;
    action_response(&state, "removed", index, &timer)
}

/// Handle GET /snapshot - Disconnected copy for the editor
pub async fn get_snapshot_handler(State(state): State<Arc<AppState>>) -> ApiResult<Snapshot> {
    state
        .export_snapshot()
        .map(Json)
        .map_err(|e| reject("export snapshot", e))
}

/// Handle PUT /snapshot - Apply and persist an editor submission
pub async fn save_snapshot_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SnapshotPatch>,
) -> ApiResult<SaveResponse> {
    let outcome = state
        .import_snapshot(patch)
        .map_err(|e| reject("import snapshot", e))?;
    info!(
        "Editor snapshot applied: {} timers, persisted={}",
        outcome.timer_count, outcome.persisted
    );

    let notice = (!outcome.persisted)
        .then(|| "Failed to save settings. Please try again.".to_string());
    Ok(Json(SaveResponse {
        status: if outcome.persisted { "saved" } else { "applied" }.to_string(),
        timer_count: outcome.timer_count,
        persisted: outcome.persisted,
        notice,
        timestamp: Utc::now(),
    }))
}

/// Handle POST /editor/open
pub async fn open_editor_handler(State(state): State<Arc<AppState>>) -> ApiResult<EditorResponse> {
    let already_open = state.open_editor().map_err(|e| reject("open editor", e))?;
    Ok(Json(EditorResponse {
        open: true,
        already_open,
        timestamp: Utc::now(),
    }))
}

/// Handle POST /editor/close
pub async fn close_editor_handler(State(state): State<Arc<AppState>>) -> ApiResult<EditorResponse> {
    state.close_editor().map_err(|e| reject("close editor", e))?;
    Ok(Json(EditorResponse {
        open: false,
        already_open: false,
        timestamp: Utc::now(),
    }))
}

/// Handle GET /settings
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> ApiResult<AppSettings> {
    state
        .get_settings()
        .map(Json)
        .map_err(|e| reject("read settings", e))
}

/// Handle GET /status - Return current daemon status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let timers = state.get_timers().map_err(|e| reject("read timers", e))?;
    let settings = state.get_settings().map_err(|e| reject("read settings", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        settings,
        timer_count: timers.len(),
        running: timers.iter().position(|t| t.is_running),
        editor_open: state.is_editor_open(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
