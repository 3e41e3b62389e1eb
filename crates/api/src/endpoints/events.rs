//! Event callback endpoint.
//!
//! Receives the platform's event subscriptions: the URL verification
//! handshake, shared survey files, and `dpoll`/`blocksearch` chat
//! messages.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pollcast_common::{AppError, AppResult};
use tracing::debug;

use crate::payload::EventEnvelope;
use crate::state::AppState;
use crate::verify::verify_token;

/// Extract the survey name from a `dpoll <name>` message.
fn parse_dpoll_name(text: &str) -> String {
    text.split(' ').skip(1).collect::<Vec<_>>().join(" ").trim().to_string()
}

/// Extract survey name and query from a `blocksearch "<name>" <query>`
/// message. Curly quotes are normalized first; the query is whatever
/// follows the name's closing quote.
fn parse_blocksearch(text: &str) -> AppResult<(String, String)> {
    let text = text.replace('\u{201C}', "\"").replace('\u{201D}', "\"");
    let items: Vec<&str> = text.split('"').collect();
    let name = items
        .get(1)
        .ok_or_else(|| AppError::Validation("blocksearch needs a quoted poll name".to_string()))?;
    let query = items
        .get(2)
        .ok_or_else(|| AppError::Validation("blocksearch needs a query".to_string()))?;
    Ok((name.trim().to_string(), query.trim().to_string()))
}

/// Handle an event callback delivery.
pub async fn event_callback(
    State(state): State<AppState>,
    Json(envelope): Json<EventEnvelope>,
) -> AppResult<Response> {
    // The handshake happens before any credentials are exchanged, so it
    // is answered before the token check.
    if envelope.kind == "url_verification" {
        let challenge = envelope.challenge.unwrap_or_default();
        return Ok(challenge.into_response());
    }

    verify_token(
        &state.chat_config.verification_token,
        envelope.token.as_deref(),
    )?;

    if envelope.kind != "event_callback" {
        return Ok(().into_response());
    }
    let Some(event) = envelope.event else {
        return Ok(().into_response());
    };
    debug!(kind = %event.kind, "event callback");

    if event.kind == "file_shared" {
        let file = event
            .file
            .ok_or_else(|| AppError::Validation("file_shared event missing file".to_string()))?;
        let channel = event.channel_id.ok_or_else(|| {
            AppError::Validation("file_shared event missing channel_id".to_string())
        })?;
        state
            .survey_service
            .import_shared_file(&file.id, &channel)
            .await?;
    } else if event.kind == "message" && event.subtype.is_none() {
        let (Some(text), Some(channel)) = (event.text, event.channel) else {
            return Ok(().into_response());
        };

        if text.to_lowercase().starts_with("dpoll") {
            let name = parse_dpoll_name(&text);
            state
                .survey_service
                .broadcast_random_blocks(&channel, &name)
                .await?;
        } else if text.to_lowercase().starts_with("blocksearch") {
            let (name, query) = parse_blocksearch(&text)?;
            state
                .survey_service
                .search_blocks(&channel, &name, &query)
                .await?;
        }
    }

    Ok(().into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dpoll_name_is_everything_after_the_keyword() {
        assert_eq!(parse_dpoll_name("dpoll team survey"), "team survey");
        assert_eq!(parse_dpoll_name("dpoll"), "");
    }

    #[test]
    fn blocksearch_splits_name_and_query() {
        let (name, query) =
            parse_blocksearch("blocksearch \"team survey\" warmup").unwrap();
        assert_eq!(name, "team survey");
        assert_eq!(query, "warmup");
    }

    #[test]
    fn blocksearch_with_a_quoted_query_matches_everything() {
        // The query is the segment after the name's closing quote, so
        // quoting it leaves only the inter-quote gap: an empty query.
        let (name, query) =
            parse_blocksearch("blocksearch \"team survey\" \"warmup\"").unwrap();
        assert_eq!(name, "team survey");
        assert_eq!(query, "");
    }

    #[test]
    fn blocksearch_normalizes_curly_quotes() {
        let (name, query) =
            parse_blocksearch("blocksearch \u{201C}s\u{201D} q").unwrap();
        assert_eq!(name, "s");
        assert_eq!(query, "q");
    }

    #[test]
    fn blocksearch_without_quotes_is_rejected() {
        assert!(parse_blocksearch("blocksearch nothing quoted").is_err());
    }
}
