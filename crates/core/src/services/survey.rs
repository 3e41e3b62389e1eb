//! Distributed-poll (survey) service.
//!
//! Imports survey files shared into the chat, broadcasts their blocks
//! as individual question messages, records response toggles, and
//! exports collected responses as TSV.

use std::collections::HashMap;
use std::sync::Arc;

use pollcast_common::{AppError, AppResult, IdGenerator};
use pollcast_db::{
    entities::{block, distributed_poll, question, response, Question},
    repositories::{
        BlockRepository, DistributedPollRepository, QuestionRepository, ResponseRepository,
        UserRepository,
    },
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Set,
    TransactionTrait};
use serde_json::json;
use tracing::{info, warn};

use crate::chat::{ChatClient, TokenKind, BROADCAST_DELAY};
use crate::export::{render_tsv, ExportEntry};
use crate::format::{format_attachments, format_text, Attachment};
use crate::parser::{parse_survey, ParsedSurvey};
use crate::services::poll::MAX_OPTION_LEN;

/// How many random blocks a `dpoll` broadcast posts.
const BLOCKS_PER_BROADCAST: usize = 2;

/// Attempts at finding a free question ID before giving up.
const ID_RETRY_LIMIT: usize = 16;

/// Broadcast chatter (block headers and question posts) is bot-authored.
const BROADCAST_TOKEN: TokenKind = TokenKind::Bot;

/// Maximum options a survey question can carry.
const MAX_QUESTION_OPTIONS: usize = 100;

/// Survey service for business logic.
#[derive(Clone)]
pub struct SurveyService {
    db: Arc<DatabaseConnection>,
    survey_repo: DistributedPollRepository,
    block_repo: BlockRepository,
    question_repo: QuestionRepository,
    response_repo: ResponseRepository,
    user_repo: UserRepository,
    chat: ChatClient,
    id_gen: IdGenerator,
}

impl SurveyService {
    /// Create a new survey service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        survey_repo: DistributedPollRepository,
        block_repo: BlockRepository,
        question_repo: QuestionRepository,
        response_repo: ResponseRepository,
        user_repo: UserRepository,
        chat: ChatClient,
    ) -> Self {
        Self {
            db,
            survey_repo,
            block_repo,
            question_repo,
            response_repo,
            user_repo,
            chat,
            id_gen: IdGenerator::new(),
        }
    }

    /// Fetch a shared file from the chat platform, parse it as a survey
    /// file, and persist it; posts the outcome back to `channel`.
    pub async fn import_shared_file(&self, file_id: &str, channel: &str) -> AppResult<()> {
        let file = self.chat.file_info(file_id).await?;
        let content = self.chat.download(&file.url_private_download).await?;

        match self.create_from_file(&file.title, &content).await {
            Ok(survey) => {
                self.chat
                    .post_message(
                        channel,
                        &format!("Distributed Poll Created: {}", survey.name),
                        None,
                        TokenKind::Client,
                    )
                    .await?;
                Ok(())
            }
            Err(AppError::DuplicateName(_)) => {
                info!(title = %file.title, "survey already existed");
                self.chat
                    .post_message(
                        channel,
                        &format!(
                            "Could not create distributed poll a poll with name \"{}\" already exists.",
                            file.title
                        ),
                        None,
                        TokenKind::Bot,
                    )
                    .await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Parse a survey file and persist it in a single transaction.
    ///
    /// A duplicate survey name fails with nothing committed.
    pub async fn create_from_file(
        &self,
        title: &str,
        content: &str,
    ) -> AppResult<distributed_poll::Model> {
        let parsed = parse_survey(title, content.lines())?;

        if self.survey_repo.name_exists(&parsed.name).await? {
            return Err(AppError::DuplicateName(parsed.name));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let survey = self.persist_parsed(&txn, &parsed).await?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(name = %survey.name, blocks = parsed.blocks.len(), "created survey");
        Ok(survey)
    }

    async fn persist_parsed(
        &self,
        txn: &DatabaseTransaction,
        parsed: &ParsedSurvey,
    ) -> AppResult<distributed_poll::Model> {
        let survey = distributed_poll::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(parsed.name.clone()),
        }
        .insert(txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        for (block_pos, parsed_block) in parsed.blocks.iter().enumerate() {
            let block_row = block::ActiveModel {
                id: Set(self.id_gen.generate()),
                distributed_poll_id: Set(survey.id.clone()),
                name: Set(parsed_block.name.clone()),
                position: Set(i32::try_from(block_pos).unwrap_or(i32::MAX)),
            }
            .insert(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            for (question_pos, parsed_question) in parsed_block.questions.iter().enumerate() {
                validate_question_options(&parsed_question.options)?;
                let id = self.free_question_id(txn).await?;
                question::ActiveModel {
                    id: Set(id),
                    block_id: Set(block_row.id.clone()),
                    question: Set(parsed_question.text.clone()),
                    options: Set(json!(parsed_question.options)),
                    position: Set(i32::try_from(question_pos).unwrap_or(i32::MAX)),
                }
                .insert(txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }

        Ok(survey)
    }

    async fn free_question_id(&self, txn: &DatabaseTransaction) -> AppResult<String> {
        for _ in 0..ID_RETRY_LIMIT {
            let id = self.id_gen.generate_question_id();
            let taken = Question::find_by_id(&id)
                .one(txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .is_some();
            if !taken {
                return Ok(id);
            }
        }
        Err(AppError::Internal(
            "could not allocate a unique question id".to_string(),
        ))
    }

    /// Toggle a user's response to a question.
    ///
    /// Any existing responses for (question, user) are cleared; only
    /// when there were none is a single response recorded at the given
    /// option. Returns the question so callers can re-render it.
    pub async fn toggle_response(
        &self,
        question_id: &str,
        user_id: Option<&str>,
        user_name: &str,
        option_value: &str,
    ) -> AppResult<question::Model> {
        let question = self.question_repo.get_by_id(question_id).await?;
        let user = self.user_repo.find_or_create(user_id, user_name).await?;

        let removed = self
            .response_repo
            .delete_for_question_and_user(&question.id, &user.id)
            .await?;
        if removed == 0 {
            let options = question_options(&question)?;
            let index = options
                .iter()
                .position(|o| o == option_value)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown question option: {option_value}"))
                })?;
            let index = i32::try_from(index)
                .map_err(|_| AppError::BadRequest("Option index out of range".to_string()))?;

            self.response_repo
                .create(response::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    question_id: Set(question.id.clone()),
                    option: Set(index),
                    user_id: Set(user.id.clone()),
                })
                .await?;
            info!(question = %question.id, user = %user.name, option = index, "response recorded");
        } else {
            info!(question = %question.id, user = %user.name, removed, "responses cleared");
        }

        Ok(question)
    }

    /// Render a question's message body and buttons.
    pub async fn question_message(
        &self,
        question: &question::Model,
    ) -> AppResult<(String, Vec<Attachment>)> {
        let options = question_options(question)?;

        let responses = self.response_repo.find_by_question(&question.id).await?;
        let user_ids: Vec<String> = responses.iter().map(|r| r.user_id.clone()).collect();
        let names: HashMap<String, String> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        let mut tallies: Vec<Vec<String>> = vec![Vec::new(); options.len()];
        for response in &responses {
            let Ok(index) = usize::try_from(response.option) else {
                continue;
            };
            if let (Some(bucket), Some(name)) =
                (tallies.get_mut(index), names.get(&response.user_id))
            {
                bucket.push(name.clone());
            }
        }

        let group_key = format!("qo_{}", question.id);
        let text = format_text(&question.question, &options, &tallies, "");
        let attachments = format_attachments(&options, &group_key, false);
        Ok((text, attachments))
    }

    /// Re-render a question's chat message in place.
    pub async fn refresh_question_message(
        &self,
        channel: &str,
        timestamp: &str,
        question: &question::Model,
    ) -> AppResult<()> {
        let (text, attachments) = self.question_message(question).await?;
        self.chat
            .update_message(channel, timestamp, &text, Some(&attachments), TokenKind::Bot)
            .await
    }

    async fn post_question(&self, channel: &str, question: &question::Model) -> AppResult<()> {
        let (text, attachments) = self.question_message(question).await?;
        self.chat
            .post_message(channel, &text, Some(&attachments), BROADCAST_TOKEN)
            .await?;
        Ok(())
    }

    /// Post a block header and each of its questions, throttled.
    ///
    /// Send failures are logged and do not abort the remaining posts.
    async fn post_block(&self, channel: &str, block: &block::Model) -> AppResult<()> {
        if let Err(e) = self
            .chat
            .post_message(channel, &format!("*{}*", block.name), None, BROADCAST_TOKEN)
            .await
        {
            warn!(block = %block.name, error = %e, "failed to post block header");
        }

        for question in self.question_repo.find_by_block(&block.id).await? {
            if let Err(e) = self.post_question(channel, &question).await {
                warn!(question = %question.id, error = %e, "failed to post question");
            }
            tokio::time::sleep(BROADCAST_DELAY).await;
        }
        Ok(())
    }

    /// Handle a `dpoll <name>` chat message: post a random sample of the
    /// survey's blocks into the channel.
    pub async fn broadcast_random_blocks(&self, channel: &str, name: &str) -> AppResult<()> {
        let Some(survey) = self.survey_repo.find_by_name(name).await? else {
            info!(name, "survey not found");
            self.chat
                .post_message(channel, &format!("Poll not found: {name}"), None, TokenKind::Bot)
                .await?;
            return Ok(());
        };

        let mut blocks = self.block_repo.find_by_poll(&survey.id).await?;
        {
            use rand::seq::SliceRandom;
            blocks.shuffle(&mut rand::thread_rng());
        }
        blocks.truncate(BLOCKS_PER_BROADCAST);

        for block in &blocks {
            self.post_block(channel, block).await?;
        }
        Ok(())
    }

    /// Handle a `blocksearch "<name>" "<query>"` chat message: post all
    /// blocks whose name contains the query, case-insensitively.
    pub async fn search_blocks(&self, channel: &str, name: &str, query: &str) -> AppResult<()> {
        let Some(survey) = self.survey_repo.find_by_name(name).await? else {
            info!(name, "survey not found");
            self.chat
                .post_message(channel, &format!("Poll not found: {name}"), None, TokenKind::Bot)
                .await?;
            return Ok(());
        };

        let needle = query.to_lowercase();
        let blocks: Vec<block::Model> = self
            .block_repo
            .find_by_poll(&survey.id)
            .await?
            .into_iter()
            .filter(|b| b.name.to_lowercase().contains(&needle))
            .collect();

        if blocks.is_empty() {
            info!(name, query, "no matching blocks");
            self.chat
                .post_message(
                    channel,
                    &format!("No matching blocks found for query \"{query}\" in poll \"{name}\""),
                    None,
                    TokenKind::Bot,
                )
                .await?;
            return Ok(());
        }

        for block in &blocks {
            self.post_block(channel, block).await?;
        }
        Ok(())
    }

    /// Export every response to a survey as a TSV table.
    pub async fn export_tsv(&self, name: &str) -> AppResult<String> {
        let survey = self.survey_repo.get_by_name(name).await?;

        let mut questions: Vec<question::Model> = Vec::new();
        for block in self.block_repo.find_by_poll(&survey.id).await? {
            questions.extend(self.question_repo.find_by_block(&block.id).await?);
        }

        let mut raw: Vec<(usize, response::Model)> = Vec::new();
        for (index, question) in questions.iter().enumerate() {
            for response in self.response_repo.find_by_question(&question.id).await? {
                raw.push((index, response));
            }
        }

        let user_ids: Vec<String> = raw.iter().map(|(_, r)| r.user_id.clone()).collect();
        let names: HashMap<String, String> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        let titles: Vec<String> = questions.iter().map(|q| q.question.clone()).collect();
        let entries: Vec<ExportEntry> = raw
            .into_iter()
            .map(|(question_index, response)| ExportEntry {
                user: names
                    .get(&response.user_id)
                    .cloned()
                    .unwrap_or_else(|| response.user_id.clone()),
                question_index,
                option: response.option,
            })
            .collect();

        Ok(render_tsv(&titles, &entries))
    }

    /// Delete a survey; blocks, questions, and responses cascade.
    pub async fn delete(&self, name: &str) -> AppResult<()> {
        let survey = self.survey_repo.get_by_name(name).await?;
        self.survey_repo.delete(survey).await?;
        info!(name, "deleted survey");
        Ok(())
    }
}

fn question_options(question: &question::Model) -> AppResult<Vec<String>> {
    question
        .option_list()
        .map_err(|e| AppError::Internal(format!("corrupt question options: {e}")))
}

fn validate_question_options(options: &[String]) -> AppResult<()> {
    if options.len() > MAX_QUESTION_OPTIONS {
        return Err(AppError::Validation(format!(
            "Question cannot have more than {MAX_QUESTION_OPTIONS} options"
        )));
    }
    for option in options {
        if option.len() > MAX_OPTION_LEN {
            return Err(AppError::Validation(format!(
                "Question option is too long (max {MAX_OPTION_LEN} chars)"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pollcast_common::config::ChatConfig;
    use pollcast_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

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

    fn service(db: sea_orm::DatabaseConnection) -> SurveyService {
        let db = Arc::new(db);
        SurveyService::new(
            db.clone(),
            DistributedPollRepository::new(db.clone()),
            BlockRepository::new(db.clone()),
            QuestionRepository::new(db.clone()),
            ResponseRepository::new(db.clone()),
            UserRepository::new(db),
            chat_client(),
        )
    }

    fn test_question() -> question::Model {
        question::Model {
            id: "abcdefgh".to_string(),
            block_id: "b1".to_string(),
            question: "Pick one".to_string(),
            options: json!(["Left", "Right"]),
            position: 0,
        }
    }

    fn test_user() -> user::Model {
        user::Model {
            id: "U1".to_string(),
            name: "ada".to_string(),
        }
    }

    #[tokio::test]
    async fn toggle_clears_existing_responses_without_inserting() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_question()]])
            .append_query_results([[test_user()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        let service = service(db);
        let question = service
            .toggle_response("abcdefgh", Some("U1"), "ada", "Left")
            .await
            .unwrap();

        assert_eq!(question.id, "abcdefgh");
    }

    #[tokio::test]
    async fn toggle_records_a_response_when_none_exist() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_question()]])
            .append_query_results([[test_user()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([[response::Model {
                id: "r1".to_string(),
                question_id: "abcdefgh".to_string(),
                option: 1,
                user_id: "U1".to_string(),
            }]])
            .into_connection();

        let service = service(db);
        service
            .toggle_response("abcdefgh", Some("U1"), "ada", "Right")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn toggle_rejects_an_unknown_option_value() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_question()]])
            .append_query_results([[test_user()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let service = service(db);
        let err = service
            .toggle_response("abcdefgh", Some("U1"), "ada", "Middle")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn broadcast_posts_use_the_bot_credential() {
        let chat = chat_client();
        assert_eq!(chat.bearer(BROADCAST_TOKEN), "bot");
    }

    #[test]
    fn question_option_limits_are_enforced() {
        let too_many: Vec<String> = (0..=100).map(|i| format!("o{i}")).collect();
        assert!(validate_question_options(&too_many).is_err());
        assert!(validate_question_options(&["ok".to_string()]).is_ok());
    }
}
