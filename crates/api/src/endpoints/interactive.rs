//! Interactive callback endpoint.
//!
//! Handles button presses on poll messages and add-option dialog
//! submissions. The platform delivers a form with a single `payload`
//! field carrying JSON.

use axum::extract::State;
use axum::Form;
use pollcast_common::{AppError, AppResult};
use serde::Deserialize;
use tracing::debug;

use crate::payload::InteractivePayload;
use crate::state::AppState;
use crate::verify::verify_token;

/// Form wrapper around the JSON payload.
#[derive(Debug, Deserialize)]
pub struct InteractiveForm {
    /// JSON-encoded [`InteractivePayload`].
    pub payload: String,
}

fn required<'a, T>(value: &'a Option<T>, field: &str) -> AppResult<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| AppError::Validation(format!("payload missing {field}")))
}

/// Handle an interactive callback.
pub async fn interactive_action(
    State(state): State<AppState>,
    Form(form): Form<InteractiveForm>,
) -> AppResult<()> {
    let payload: InteractivePayload = serde_json::from_str(&form.payload)
        .map_err(|e| AppError::Validation(format!("malformed payload: {e}")))?;

    verify_token(
        &state.chat_config.verification_token,
        payload.token.as_deref(),
    )?;
    debug!(callback_id = %payload.callback_id, "interactive callback");

    if payload.callback_id == "newOption" {
        let timestamp = required(&payload.state, "state")?;
        let submission = required(&payload.submission, "submission")?;

        let poll = state
            .poll_service
            .add_option(timestamp, &submission.new_option)
            .await?;
        state.poll_service.refresh_message(&poll).await?;
    } else if payload.callback_id == "options" {
        let action = payload
            .actions
            .first()
            .ok_or_else(|| AppError::Validation("payload missing actions".to_string()))?;

        if action.name == "addMore" {
            let trigger_id = required(&payload.trigger_id, "trigger_id")?;
            let message = required(&payload.original_message, "original_message")?;
            state.chat.open_dialog(trigger_id, &message.ts).await?;
        } else if action.name == "option" {
            let message = required(&payload.original_message, "original_message")?;
            let user = required(&payload.user, "user")?;

            state
                .poll_service
                .toggle_vote(&message.ts, user.id(), user.name(), &action.value)
                .await?;
            let poll = state.poll_service.get(&message.ts).await?;
            state.poll_service.refresh_message(&poll).await?;
        }
    } else if payload.callback_id.starts_with("qo_") {
        let action = payload
            .actions
            .first()
            .ok_or_else(|| AppError::Validation("payload missing actions".to_string()))?;
        let Some(question_id) = action.name.strip_prefix("qo_") else {
            return Ok(());
        };
        let message = required(&payload.original_message, "original_message")?;
        let channel = required(&payload.channel, "channel")?;
        let user = required(&payload.user, "user")?;

        let question = state
            .survey_service
            .toggle_response(question_id, user.id(), user.name(), &action.value)
            .await?;
        state
            .survey_service
            .refresh_question_message(&channel.id, &message.ts, &question)
            .await?;
    }

    Ok(())
}
