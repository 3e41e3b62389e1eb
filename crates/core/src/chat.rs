//! Outbound chat platform client.
//!
//! Thin wrapper over `reqwest` for the handful of Web API methods the
//! service calls: posting and updating poll messages, opening the
//! add-option dialog, and fetching shared survey files.

use std::time::Duration;

use pollcast_common::{config::ChatConfig, AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::format::Attachment;

/// Delay between consecutive posts when broadcasting a block of
/// questions, to stay under the platform's rate limits.
pub const BROADCAST_DELAY: Duration = Duration::from_millis(500);

const ICON_URL: &str = "https://simplepoll.rocks/static/main/simplepolllogo-colors.png";

/// Which bearer credential an outbound call is made with.
///
/// The platform issues two tokens with different scopes; message posts
/// on behalf of the app use the client token, broadcast chatter uses
/// the bot token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// The app-level client token.
    Client,
    /// The bot user token.
    Bot,
}

/// Metadata for a file shared into a channel.
#[derive(Debug, Clone, Deserialize)]
pub struct SharedFile {
    /// File title, used as the survey name.
    pub title: String,
    /// Authenticated download URL.
    pub url_private_download: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    ts: Option<String>,
    error: Option<String>,
    file: Option<SharedFile>,
}

#[derive(Debug, Serialize)]
struct DialogElement {
    #[serde(rename = "type")]
    kind: &'static str,
    label: &'static str,
    name: &'static str,
}

#[derive(Debug, Serialize)]
struct Dialog<'a> {
    title: &'static str,
    state: &'a str,
    callback_id: &'static str,
    elements: Vec<DialogElement>,
}

/// Client for the chat platform's Web API.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_base: String,
    client_secret: String,
    bot_secret: String,
}

impl ChatClient {
    /// Build a client from the chat section of the configuration.
    pub fn new(config: &ChatConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client_secret: config.client_secret.clone(),
            bot_secret: config.bot_secret.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    pub(crate) fn bearer(&self, token: TokenKind) -> &str {
        match token {
            TokenKind::Client => &self.client_secret,
            TokenKind::Bot => &self.bot_secret,
        }
    }

    async fn parse_response(response: reqwest::Response, method: &str) -> AppResult<ApiResponse> {
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "{method} returned status {status}"
            )));
        }
        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("{method} returned invalid json: {e}")))?;
        if !body.ok {
            return Err(AppError::Upstream(format!(
                "{method} failed: {}",
                body.error.as_deref().unwrap_or("unknown error")
            )));
        }
        Ok(body)
    }

    fn attachments_payload(attachments: Option<&[Attachment]>) -> AppResult<serde_json::Value> {
        // The platform expects attachments as a JSON-encoded string
        // inside the JSON body.
        match attachments {
            Some(attachments) => {
                let encoded = serde_json::to_string(attachments)
                    .map_err(|e| AppError::Internal(format!("failed to encode attachments: {e}")))?;
                Ok(serde_json::Value::String(encoded))
            }
            None => Ok(serde_json::Value::Null),
        }
    }

    /// Post a message and return the timestamp the platform assigned.
    pub async fn post_message(
        &self,
        channel: &str,
        text: &str,
        attachments: Option<&[Attachment]>,
        token: TokenKind,
    ) -> AppResult<String> {
        let body = json!({
            "text": text,
            "channel": channel,
            "icon_url": ICON_URL,
            "attachments": Self::attachments_payload(attachments)?,
        });

        let response = self
            .http
            .post(self.method_url("chat.postMessage"))
            .bearer_auth(self.bearer(token))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("chat.postMessage failed: {e}")))?;

        let body = Self::parse_response(response, "chat.postMessage").await?;
        debug!(channel, ts = ?body.ts, "posted message");
        body.ts
            .ok_or_else(|| AppError::Upstream("chat.postMessage returned no ts".to_string()))
    }

    /// Rewrite an existing message in place.
    pub async fn update_message(
        &self,
        channel: &str,
        timestamp: &str,
        text: &str,
        attachments: Option<&[Attachment]>,
        token: TokenKind,
    ) -> AppResult<()> {
        let body = json!({
            "channel": channel,
            "ts": timestamp,
            "text": text,
            "attachments": Self::attachments_payload(attachments)?,
            "parse": "full",
        });

        let response = self
            .http
            .post(self.method_url("chat.update"))
            .bearer_auth(self.bearer(token))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("chat.update failed: {e}")))?;

        Self::parse_response(response, "chat.update").await?;
        debug!(channel, timestamp, "updated message");
        Ok(())
    }

    /// Open the "Add an option" dialog for an interactive trigger.
    ///
    /// `state` carries the poll's message timestamp so the dialog
    /// submission can find its poll again.
    pub async fn open_dialog(&self, trigger_id: &str, state: &str) -> AppResult<()> {
        let dialog = Dialog {
            title: "Add an option",
            state,
            callback_id: "newOption",
            elements: vec![DialogElement {
                kind: "text",
                label: "New Option",
                name: "new_option",
            }],
        };
        let dialog = serde_json::to_string(&dialog)
            .map_err(|e| AppError::Internal(format!("failed to encode dialog: {e}")))?;

        let response = self
            .http
            .post(self.method_url("dialog.open"))
            .query(&[
                ("token", self.client_secret.as_str()),
                ("trigger_id", trigger_id),
                ("dialog", dialog.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("dialog.open failed: {e}")))?;

        Self::parse_response(response, "dialog.open").await?;
        Ok(())
    }

    /// Look up a shared file's title and download URL.
    pub async fn file_info(&self, file_id: &str) -> AppResult<SharedFile> {
        let response = self
            .http
            .get(self.method_url("files.info"))
            .query(&[
                ("token", self.client_secret.as_str()),
                ("file", file_id),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("files.info failed: {e}")))?;

        let body = Self::parse_response(response, "files.info").await?;
        body.file
            .ok_or_else(|| AppError::Upstream("files.info returned no file".to_string()))
    }

    /// Download a shared file's text content.
    pub async fn download(&self, url: &str) -> AppResult<String> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.client_secret)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("file download failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "file download returned status {status}"
            )));
        }
        response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("file download failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ChatClient {
        ChatClient::new(&ChatConfig {
            api_base: "https://chat.example/api/".to_string(),
            verification_token: "verify".to_string(),
            client_secret: "client-token".to_string(),
            bot_secret: "bot-token".to_string(),
            default_channel: String::new(),
        })
        .unwrap()
    }

    #[test]
    fn method_urls_join_without_double_slashes() {
        let client = client();
        assert_eq!(
            client.method_url("chat.postMessage"),
            "https://chat.example/api/chat.postMessage"
        );
    }

    #[test]
    fn bearer_selects_per_token_kind() {
        let client = client();
        assert_eq!(client.bearer(TokenKind::Client), "client-token");
        assert_eq!(client.bearer(TokenKind::Bot), "bot-token");
    }

    #[test]
    fn attachments_encode_as_a_json_string() {
        let attachments = crate::format::format_attachments(
            &["Yes".to_string()],
            "option",
            false,
        );
        let payload = ChatClient::attachments_payload(Some(&attachments)).unwrap();

        let serde_json::Value::String(encoded) = payload else {
            panic!("expected a string payload");
        };
        let decoded: Vec<Attachment> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, attachments);

        assert_eq!(
            ChatClient::attachments_payload(None).unwrap(),
            serde_json::Value::Null
        );
    }
}
