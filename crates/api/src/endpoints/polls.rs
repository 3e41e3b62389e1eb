//! REST poll creation endpoint.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use pollcast_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::state::AppState;

/// JSON body of `POST /polls`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePollRequest {
    /// Question text; required.
    #[validate(length(min = 1, message = "question must not be empty"))]
    pub question: Option<String>,
    /// Option texts; required.
    pub options: Option<Vec<String>>,
    /// Channel; falls back to the configured default.
    pub channel: Option<String>,
    /// Timestamps are assigned by the service and must not be supplied.
    pub timestamp: Option<serde_json::Value>,
}

/// JSON representation of a created poll.
#[derive(Debug, Serialize)]
pub struct PollBody {
    /// Poll key.
    pub timestamp: String,
    /// Channel the poll belongs to.
    pub channel: String,
    /// Question text.
    pub question: String,
    /// Option texts.
    pub options: Vec<String>,
}

/// Create a poll over REST. Responds 201 with a `Location` header.
pub async fn create_poll(
    State(state): State<AppState>,
    Json(req): Json<CreatePollRequest>,
) -> AppResult<impl IntoResponse> {
    if req.timestamp.is_some() {
        return Err(AppError::BadRequest(
            "timestamp cannot be supplied".to_string(),
        ));
    }
    req.validate()?;
    let question = req
        .question
        .ok_or_else(|| AppError::BadRequest("question is required".to_string()))?;
    let options = req
        .options
        .ok_or_else(|| AppError::BadRequest("options are required".to_string()))?;
    let channel = req
        .channel
        .unwrap_or_else(|| state.chat_config.default_channel.clone());

    let poll = state
        .poll_service
        .create_direct(&question, options, &channel)
        .await?;

    let options = poll
        .option_list()
        .map_err(|e| AppError::Internal(format!("corrupt poll options: {e}")))?;
    let location = format!("/polls/{}/", poll.timestamp);
    let body = PollBody {
        timestamp: poll.timestamp,
        channel: poll.channel,
        question: poll.question,
        options,
    };

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    ))
}
