use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::state::AppState;
use crate::capture::CaptureError;
use crate::interpret::InterpretError;
use crate::journal::{DreamDraft, JournalError};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub state: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AddSleepRequest {
    pub date: NaiveDate,
    pub hours_slept: f64,
    pub quality: u8,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub accepted: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn journal_error_response(e: JournalError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        JournalError::Validation(_) => StatusCode::BAD_REQUEST,
        JournalError::Anonymous => StatusCode::UNAUTHORIZED,
        JournalError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        JournalError::Upload(_) => StatusCode::BAD_GATEWAY,
        JournalError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

fn capture_error_response(e: CaptureError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        CaptureError::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CaptureError::RecordingInProgress
        | CaptureError::InvalidState { .. }
        | CaptureError::NoArtifact => StatusCode::CONFLICT,
        CaptureError::Artifact(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

// ============================================================================
// Capture
// ============================================================================

/// POST /capture/start
/// Arm the microphone and begin recording
pub async fn start_capture(State(state): State<AppState>) -> impl IntoResponse {
    match state.recorder.start().await {
        Ok(()) => (
            StatusCode::OK,
            Json(CaptureResponse {
                state: "recording".to_string(),
                message: "Recording started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start recording: {}", e);
            capture_error_response(e).into_response()
        }
    }
}

/// POST /capture/stop
/// Stop recording and keep the artifact for review
pub async fn stop_capture(State(state): State<AppState>) -> impl IntoResponse {
    match state.recorder.stop().await {
        Ok(()) => {
            let status = state.recorder.status().await;
            info!("Recording stopped at {}s", status.elapsed_seconds);
            (
                StatusCode::OK,
                Json(CaptureResponse {
                    state: status.state,
                    message: "Recording ready".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to stop recording: {}", e);
            capture_error_response(e).into_response()
        }
    }
}

/// POST /capture/discard
/// Drop the recorded artifact and return to idle
pub async fn discard_capture(State(state): State<AppState>) -> impl IntoResponse {
    match state.recorder.discard().await {
        Ok(()) => (
            StatusCode::OK,
            Json(CaptureResponse {
                state: "idle".to_string(),
                message: "Recording discarded".to_string(),
            }),
        )
            .into_response(),
        Err(e) => capture_error_response(e).into_response(),
    }
}

/// POST /capture/playback
/// Toggle playback of the recorded artifact
pub async fn toggle_playback(State(state): State<AppState>) -> impl IntoResponse {
    match state.recorder.toggle_playback().await {
        Ok(playing) => (
            StatusCode::OK,
            Json(CaptureResponse {
                state: if playing { "playing" } else { "paused" }.to_string(),
                message: "Playback toggled".to_string(),
            }),
        )
            .into_response(),
        Err(e) => capture_error_response(e).into_response(),
    }
}

/// GET /capture/status
/// Current state of the voice recorder
pub async fn capture_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.recorder.status().await))
}

// ============================================================================
// Dreams
// ============================================================================

/// POST /dreams
/// Save the current draft (text body or recorded audio)
pub async fn save_dream(
    State(state): State<AppState>,
    Json(draft): Json<DreamDraft>,
) -> impl IntoResponse {
    match state.coordinator.save(draft, &state.recorder).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => {
            error!("Failed to save dream: {}", e);
            journal_error_response(e).into_response()
        }
    }
}

/// GET /dreams
/// The owner's saved dreams, newest first
pub async fn list_dreams(State(state): State<AppState>) -> impl IntoResponse {
    match state.coordinator.list().await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => {
            error!("Failed to list dreams: {}", e);
            journal_error_response(e).into_response()
        }
    }
}

// ============================================================================
// Sleep log
// ============================================================================

/// POST /sleep
/// Log a night of sleep
pub async fn add_sleep(
    State(state): State<AppState>,
    Json(req): Json<AddSleepRequest>,
) -> impl IntoResponse {
    match state
        .sleep
        .add(req.date, req.hours_slept, req.quality, req.notes)
        .await
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => journal_error_response(e).into_response(),
    }
}

/// GET /sleep
/// The owner's sleep records in date order
pub async fn list_sleep(State(state): State<AppState>) -> impl IntoResponse {
    match state.sleep.list().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => journal_error_response(e).into_response(),
    }
}

/// GET /sleep/summary
/// Count and averages over the owner's sleep records
pub async fn sleep_summary(State(state): State<AppState>) -> impl IntoResponse {
    match state.sleep.summary().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => journal_error_response(e).into_response(),
    }
}

// ============================================================================
// Interpretation
// ============================================================================

/// POST /interpret
/// Submit dream text to the interpretation session
pub async fn submit_interpretation(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> impl IntoResponse {
    match state.interpreter.submit(&req.message).await {
        Ok(()) => (StatusCode::OK, Json(SubmitResponse { accepted: true })).into_response(),
        Err(e @ InterpretError::EmptyMessage) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: e.to_string() }),
        )
            .into_response(),
        Err(e @ InterpretError::RequestInFlight) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse { error: e.to_string() }),
        )
            .into_response(),
    }
}

/// GET /interpret/messages
/// The session transcript in insertion order
pub async fn interpretation_messages(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.interpreter.messages().await))
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
