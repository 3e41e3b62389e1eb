//! Slash command endpoint.
//!
//! `/poll "Question" "Option 1" "Option 2"` posts a poll into the
//! invoking channel.

use axum::extract::State;
use axum::Form;
use pollcast_common::{AppError, AppResult};
use serde::Deserialize;
use tracing::debug;

use crate::state::AppState;
use crate::verify::verify_token;

/// Form body of a slash command delivery.
#[derive(Debug, Deserialize)]
pub struct SlashCommandForm {
    /// Shared-secret verification token.
    pub token: Option<String>,
    /// Channel the command was invoked in.
    pub channel_id: String,
    /// Raw command text.
    pub text: String,
}

/// Split command text into a question and options.
///
/// Curly quotes are normalized to straight quotes first; the first
/// quoted segment is the question, later quoted segments are options,
/// deduplicated preserving first occurrence.
fn parse_command_text(text: &str) -> AppResult<(String, Vec<String>)> {
    let text = text.replace('\u{201C}', "\"").replace('\u{201D}', "\"");
    let items: Vec<&str> = text.split('"').collect();

    let question = items
        .get(1)
        .ok_or_else(|| AppError::Validation("Expected a quoted question".to_string()))?
        .to_string();

    let mut options: Vec<String> = Vec::new();
    // Quoted segments sit at odd indices; the first is the question.
    for option in items.iter().skip(3).step_by(2) {
        if !options.iter().any(|o| o == option) {
            options.push((*option).to_string());
        }
    }
    Ok((question, options))
}

/// Handle a slash command: create and post a poll, reply with an empty
/// body so the platform shows nothing extra.
pub async fn slash_command(
    State(state): State<AppState>,
    Form(form): Form<SlashCommandForm>,
) -> AppResult<()> {
    verify_token(
        &state.chat_config.verification_token,
        form.token.as_deref(),
    )?;

    let (question, options) = parse_command_text(&form.text)?;
    debug!(channel = %form.channel_id, %question, options = options.len(), "slash command");

    state
        .poll_service
        .create_and_post(&form.channel_id, &question, options)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn question_and_options_split_on_quotes() {
        let (question, options) =
            parse_command_text("\"Lunch?\" \"Pizza\" \"Salad\"").unwrap();
        assert_eq!(question, "Lunch?");
        assert_eq!(options, vec!["Pizza", "Salad"]);
    }

    #[test]
    fn curly_quotes_are_normalized() {
        let (question, options) =
            parse_command_text("\u{201C}Lunch?\u{201D} \u{201C}Pizza\u{201D}").unwrap();
        assert_eq!(question, "Lunch?");
        assert_eq!(options, vec!["Pizza"]);
    }

    #[test]
    fn duplicate_options_are_dropped_in_order() {
        let (_, options) =
            parse_command_text("\"Q\" \"a\" \"b\" \"a\" \"c\"").unwrap();
        assert_eq!(options, vec!["a", "b", "c"]);
    }

    #[test]
    fn question_with_no_options_is_fine() {
        let (question, options) = parse_command_text("\"Just asking\"").unwrap();
        assert_eq!(question, "Just asking");
        assert!(options.is_empty());
    }

    #[test]
    fn unquoted_text_is_rejected() {
        assert!(matches!(
            parse_command_text("no quotes here"),
            Err(AppError::Validation(_))
        ));
    }
}
