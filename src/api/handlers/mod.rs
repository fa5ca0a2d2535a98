use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::ai::{ChatAction, GatewayError, SYSTEM_PROMPT};
use crate::insights::{quotes, week_activity, DayActivity, Progress, TimeRemaining};
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Note not found".to_string())
}

fn blank_fields() -> (StatusCode, String) {
    tracing::warn!("Validation error: empty title or content");
    (
        StatusCode::BAD_REQUEST,
        "Title and content must not be empty".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Notes
// ============================================================

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Note>>, (StatusCode, String)> {
    let notes = state.db.get_all_notes().map_err(internal_error)?;

    let needle = query
        .q
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .map(str::to_lowercase);

    Ok(Json(match needle {
        Some(needle) => notes.into_iter().filter(|n| n.matches(&needle)).collect(),
        None => notes,
    }))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>, (StatusCode, String)> {
    state
        .db
        .get_note(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create_note(
    State(state): State<AppState>,
    Json(input): Json<CreateNoteInput>,
) -> Result<(StatusCode, Json<Note>), (StatusCode, String)> {
    let input = CreateNoteInput::normalized(&input.title, &input.content).ok_or_else(blank_fields)?;
    state
        .db
        .create_note(input)
        .map(|n| (StatusCode::CREATED, Json(n)))
        .map_err(internal_error)
}

/// Body of `PUT /notes/{id}`.
#[derive(Debug, Deserialize)]
pub struct EditNoteInput {
    pub title: String,
    pub content: String,
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<EditNoteInput>,
) -> Result<Json<Note>, (StatusCode, String)> {
    let input = UpdateNoteInput::edit(&input.title, &input.content).ok_or_else(blank_fields)?;
    state
        .db
        .update_note(id, input)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(not_found)
}

/// Body of `PATCH /notes/{id}/complete`.
#[derive(Debug, Deserialize)]
pub struct CompletionInput {
    pub completed: bool,
}

pub async fn set_completion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CompletionInput>,
) -> Result<Json<Note>, (StatusCode, String)> {
    state
        .db
        .update_note(id, UpdateNoteInput::completion(input.completed))
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.db.delete_note(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

// ============================================================
// Insights
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub progress: Progress,
    pub time_remaining: TimeRemaining,
    pub week: Vec<DayActivity>,
}

pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    let notes = state.db.get_all_notes().map_err(internal_error)?;
    let today = Local::now().date_naive();

    Ok(Json(StatsResponse {
        progress: Progress::of(&notes),
        time_remaining: TimeRemaining::from_date(today),
        week: week_activity(&notes, today, &Local),
    }))
}

pub async fn quote() -> impl IntoResponse {
    Json(quotes::random_quote())
}

// ============================================================
// AI chat
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiChatRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub note_content: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AiChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn chat_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Proxy one templated request to the text-generation gateway.
///
/// Gateway failures keep their meaning in the status code: 429 when the
/// gateway is busy, 402 when the usage quota is exhausted, 500 otherwise.
pub async fn ai_chat(
    State(state): State<AppState>,
    Json(request): Json<AiChatRequest>,
) -> Result<Json<AiChatResponse>, (StatusCode, Json<ErrorBody>)> {
    let action = ChatAction::from_tag(request.action.as_deref(), request.note_content.as_deref())
        .ok_or_else(|| chat_error(StatusCode::BAD_REQUEST, "Unknown action"))?;

    if action == ChatAction::Chat && request.prompt.trim().is_empty() {
        return Err(chat_error(StatusCode::BAD_REQUEST, "Prompt is required"));
    }

    tracing::info!(
        action = action.kind().as_str(),
        prompt_len = request.prompt.len(),
        has_note_content = request.note_content.is_some(),
        "AI chat request received"
    );

    let message = action.user_message(&request.prompt);
    match state.ai.generate(SYSTEM_PROMPT, &message).await {
        Ok(response) => Ok(Json(AiChatResponse { response })),
        Err(e) => {
            tracing::error!(error = %e, "AI chat error");
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err(chat_error(status, gateway_message(&e)))
        }
    }
}

/// Client-facing text for a gateway failure.
fn gateway_message(e: &GatewayError) -> String {
    match e {
        GatewayError::RateLimited => {
            "AI service is temporarily busy. Please try again in a moment.".to_string()
        }
        GatewayError::QuotaExceeded => {
            "AI usage limit reached. Please try again later.".to_string()
        }
        GatewayError::Unavailable(_) => {
            "AI service is temporarily unavailable. Please try again.".to_string()
        }
        other => other.to_string(),
    }
}
