//! Simple poll service.
//!
//! Handles the single-message poll flow: create and post a poll,
//! append options from the dialog, and toggle votes per button press.

use std::collections::HashMap;

use chrono::Utc;
use pollcast_common::{AppError, AppResult, IdGenerator};
use pollcast_db::{
    entities::poll,
    repositories::{PollRepository, UserRepository, VoteRepository},
};
use sea_orm::Set;
use serde_json::json;
use tracing::info;

use crate::chat::{ChatClient, TokenKind};
use crate::format::{format_attachments, format_text, Attachment};

/// Maximum options a poll can carry.
pub const MAX_OPTIONS: usize = 99;
/// Maximum length of a single option.
pub const MAX_OPTION_LEN: usize = 100;

/// Outcome of a vote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// A selection was recorded.
    Created,
    /// An existing selection was withdrawn.
    Removed,
}

/// Poll service for business logic.
#[derive(Clone)]
pub struct PollService {
    poll_repo: PollRepository,
    vote_repo: VoteRepository,
    user_repo: UserRepository,
    chat: ChatClient,
    id_gen: IdGenerator,
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    pub const fn new(
        poll_repo: PollRepository,
        vote_repo: VoteRepository,
        user_repo: UserRepository,
        chat: ChatClient,
    ) -> Self {
        Self {
            poll_repo,
            vote_repo,
            user_repo,
            chat,
            id_gen: IdGenerator::new(),
        }
    }

    fn validate_options(options: &[String]) -> AppResult<()> {
        if options.len() > MAX_OPTIONS {
            return Err(AppError::Validation(format!(
                "Poll cannot have more than {MAX_OPTIONS} options"
            )));
        }
        for option in options {
            if option.len() > MAX_OPTION_LEN {
                return Err(AppError::Validation(format!(
                    "Poll option is too long (max {MAX_OPTION_LEN} chars)"
                )));
            }
        }
        Ok(())
    }

    /// Create a poll, post its message, and store it under the message
    /// timestamp the platform assigned.
    pub async fn create_and_post(
        &self,
        channel: &str,
        question: &str,
        options: Vec<String>,
    ) -> AppResult<poll::Model> {
        Self::validate_options(&options)?;

        let tallies: Vec<Vec<String>> = vec![Vec::new(); options.len()];
        let text = format_text(question, &options, &tallies, "");
        let attachments = format_attachments(&options, "option", true);

        let timestamp = self
            .chat
            .post_message(channel, &text, Some(&attachments), TokenKind::Client)
            .await?;

        let model = poll::ActiveModel {
            timestamp: Set(timestamp),
            channel: Set(channel.to_string()),
            question: Set(question.to_string()),
            options: Set(json!(options)),
        };
        let created = self.poll_repo.create(model).await?;
        info!(timestamp = %created.timestamp, "created poll");
        Ok(created)
    }

    /// Create a poll without posting it, keyed by the current time.
    ///
    /// Used by the REST creation endpoint; the caller supplies the
    /// channel, which may be empty.
    pub async fn create_direct(
        &self,
        question: &str,
        options: Vec<String>,
        channel: &str,
    ) -> AppResult<poll::Model> {
        Self::validate_options(&options)?;

        let now = Utc::now();
        let timestamp = format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros());

        let model = poll::ActiveModel {
            timestamp: Set(timestamp),
            channel: Set(channel.to_string()),
            question: Set(question.to_string()),
            options: Set(json!(options)),
        };
        self.poll_repo.create(model).await
    }

    /// Get a poll by its message timestamp.
    pub async fn get(&self, timestamp: &str) -> AppResult<poll::Model> {
        self.poll_repo.get_by_timestamp(timestamp).await
    }

    /// Append an option to an existing poll.
    ///
    /// Duplicate options are dropped; the stored order is preserved.
    pub async fn add_option(&self, timestamp: &str, new_option: &str) -> AppResult<poll::Model> {
        let existing = self.poll_repo.get_by_timestamp(timestamp).await?;
        let mut options = option_list(&existing)?;

        if !options.iter().any(|o| o == new_option) {
            options.push(new_option.to_string());
        }
        Self::validate_options(&options)?;

        let mut model: poll::ActiveModel = existing.into();
        model.options = Set(json!(options));
        self.poll_repo.update(model).await
    }

    /// Toggle a user's vote on one option.
    ///
    /// The vote for (poll, option, user) is removed if present, created
    /// otherwise. A vote on a different option is untouched, so a user
    /// can hold several selections at once.
    pub async fn toggle_vote(
        &self,
        timestamp: &str,
        user_id: Option<&str>,
        user_name: &str,
        option_value: &str,
    ) -> AppResult<Toggle> {
        let poll = self.poll_repo.get_by_timestamp(timestamp).await?;
        let options = option_list(&poll)?;
        let index = options
            .iter()
            .position(|o| o == option_value)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Unknown poll option: {option_value}"))
            })?;
        let index = i32::try_from(index)
            .map_err(|_| AppError::BadRequest("Option index out of range".to_string()))?;

        let user = self.user_repo.find_or_create(user_id, user_name).await?;

        if let Some(vote) = self
            .vote_repo
            .find_one(&poll.timestamp, index, &user.id)
            .await?
        {
            self.vote_repo.delete(vote).await?;
            info!(timestamp, user = %user.name, option = index, "vote removed");
            Ok(Toggle::Removed)
        } else {
            let model = pollcast_db::entities::vote::ActiveModel {
                id: Set(self.id_gen.generate()),
                poll_timestamp: Set(poll.timestamp.clone()),
                option: Set(index),
                user_id: Set(user.id.clone()),
            };
            self.vote_repo.create(model).await?;
            info!(timestamp, user = %user.name, option = index, "vote recorded");
            Ok(Toggle::Created)
        }
    }

    /// Render a poll's current message body and buttons.
    pub async fn render(&self, poll: &poll::Model) -> AppResult<(String, Vec<Attachment>)> {
        let options = option_list(poll)?;

        let votes = self.vote_repo.find_by_poll(&poll.timestamp).await?;
        let user_ids: Vec<String> = votes.iter().map(|v| v.user_id.clone()).collect();
        let names: HashMap<String, String> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        let mut tallies: Vec<Vec<String>> = vec![Vec::new(); options.len()];
        for vote in &votes {
            let Ok(index) = usize::try_from(vote.option) else {
                continue;
            };
            if let (Some(bucket), Some(name)) = (tallies.get_mut(index), names.get(&vote.user_id))
            {
                bucket.push(name.clone());
            }
        }

        let text = format_text(&poll.question, &options, &tallies, "");
        let attachments = format_attachments(&options, "option", true);
        Ok((text, attachments))
    }

    /// Re-render the poll's chat message in place.
    pub async fn refresh_message(&self, poll: &poll::Model) -> AppResult<()> {
        let (text, attachments) = self.render(poll).await?;
        self.chat
            .update_message(
                &poll.channel,
                &poll.timestamp,
                &text,
                Some(&attachments),
                TokenKind::Client,
            )
            .await
    }
}

fn option_list(poll: &poll::Model) -> AppResult<Vec<String>> {
    poll.option_list()
        .map_err(|e| AppError::Internal(format!("corrupt poll options: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pollcast_common::config::ChatConfig;
    use pollcast_db::entities::{user, vote};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn chat_client() -> ChatClient {
        ChatClient::new(&ChatConfig {
            api_base: "https://chat.example/api".to_string(),
            verification_token: "verify".to_string(),
            client_secret: "client".to_string(),
            bot_secret: "bot".to_string(),
            default_channel: String::new(),
        })
        .unwrap()
    }

    fn service(db: sea_orm::DatabaseConnection) -> PollService {
        let db = Arc::new(db);
        PollService::new(
            PollRepository::new(db.clone()),
            VoteRepository::new(db.clone()),
            UserRepository::new(db),
            chat_client(),
        )
    }

    fn test_poll() -> poll::Model {
        poll::Model {
            timestamp: "1700000000.000100".to_string(),
            channel: "C123".to_string(),
            question: "Lunch?".to_string(),
            options: json!(["Pizza", "Salad"]),
        }
    }

    fn test_user() -> user::Model {
        user::Model {
            id: "U1".to_string(),
            name: "ada".to_string(),
        }
    }

    fn test_vote() -> vote::Model {
        vote::Model {
            id: "v1".to_string(),
            poll_timestamp: "1700000000.000100".to_string(),
            option: 0,
            user_id: "U1".to_string(),
        }
    }

    #[tokio::test]
    async fn toggle_creates_a_vote_when_none_exists() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_poll()]])
            .append_query_results([[test_user()]])
            .append_query_results([Vec::<vote::Model>::new()])
            .append_query_results([[test_vote()]])
            .into_connection();

        let service = service(db);
        let outcome = service
            .toggle_vote("1700000000.000100", Some("U1"), "ada", "Pizza")
            .await
            .unwrap();

        assert_eq!(outcome, Toggle::Created);
    }

    #[tokio::test]
    async fn toggle_removes_an_existing_vote() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_poll()]])
            .append_query_results([[test_user()]])
            .append_query_results([[test_vote()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let service = service(db);
        let outcome = service
            .toggle_vote("1700000000.000100", Some("U1"), "ada", "Pizza")
            .await
            .unwrap();

        assert_eq!(outcome, Toggle::Removed);
    }

    #[tokio::test]
    async fn toggle_rejects_an_unknown_option() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_poll()]])
            .into_connection();

        let service = service(db);
        let err = service
            .toggle_vote("1700000000.000100", Some("U1"), "ada", "Sushi")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn option_limits_are_enforced() {
        let too_many: Vec<String> = (0..100).map(|i| format!("o{i}")).collect();
        assert!(matches!(
            PollService::validate_options(&too_many),
            Err(AppError::Validation(_))
        ));

        let too_long = vec!["x".repeat(101)];
        assert!(matches!(
            PollService::validate_options(&too_long),
            Err(AppError::Validation(_))
        ));

        assert!(PollService::validate_options(&["ok".to_string()]).is_ok());
    }
}
