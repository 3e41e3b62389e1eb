//! Inbound webhook payload types.

use serde::Deserialize;

/// Interactive callback payload (form field `payload`, JSON-encoded).
#[derive(Debug, Clone, Deserialize)]
pub struct InteractivePayload {
    /// Shared-secret verification token.
    pub token: Option<String>,
    /// Callback id routing the interaction.
    pub callback_id: String,
    /// Pressed actions; the first one carries the interaction.
    #[serde(default)]
    pub actions: Vec<PayloadAction>,
    /// The interacting user.
    pub user: Option<UserRef>,
    /// The message the interaction happened on.
    pub original_message: Option<OriginalMessage>,
    /// The channel the message lives in.
    pub channel: Option<ChannelRef>,
    /// Trigger id for opening dialogs.
    pub trigger_id: Option<String>,
    /// Opaque state a dialog was opened with (the poll timestamp).
    pub state: Option<String>,
    /// Dialog submission values.
    pub submission: Option<Submission>,
}

/// A single pressed action.
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadAction {
    /// Action name (`option`, `addMore`, or `qo_<question-id>`).
    pub name: String,
    /// Button value (the option text).
    #[serde(default)]
    pub value: String,
}

/// Message reference inside an interactive payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OriginalMessage {
    /// Message timestamp, which is also the poll key.
    pub ts: String,
}

/// Channel reference inside an interactive payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRef {
    /// Channel id.
    pub id: String,
}

/// Values submitted through the add-option dialog.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    /// The option to append.
    pub new_option: String,
}

/// A user reference, either a full object or a bare name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    /// Platform user object.
    Full {
        /// Platform user id.
        id: String,
        /// Display name.
        name: String,
    },
    /// Bare display name.
    Name(String),
}

impl UserRef {
    /// Platform user id, when the payload carried one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Full { id, .. } => Some(id),
            Self::Name(_) => None,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Full { name, .. } => name,
            Self::Name(name) => name,
        }
    }
}

/// Event callback envelope (`POST /chat/events`, JSON body).
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    /// `url_verification` or `event_callback`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Shared-secret verification token.
    pub token: Option<String>,
    /// Challenge to echo during the `url_verification` handshake.
    pub challenge: Option<String>,
    /// The wrapped event.
    pub event: Option<Event>,
}

/// A single event inside an `event_callback` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// `file_shared` or `message`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Message subtype; bot chatter carries one and is ignored.
    pub subtype: Option<String>,
    /// Shared file reference (`file_shared`).
    pub file: Option<FileRef>,
    /// Channel the file was shared into (`file_shared`).
    pub channel_id: Option<String>,
    /// Channel a message was posted in (`message`).
    pub channel: Option<String>,
    /// Message text (`message`).
    pub text: Option<String>,
}

/// Shared file reference.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    /// Platform file id.
    pub id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn user_ref_accepts_object_or_string() {
        let full: UserRef = serde_json::from_str(r#"{"id":"U1","name":"ada"}"#).unwrap();
        assert_eq!(full.id(), Some("U1"));
        assert_eq!(full.name(), "ada");

        let bare: UserRef = serde_json::from_str(r#""ada""#).unwrap();
        assert_eq!(bare.id(), None);
        assert_eq!(bare.name(), "ada");
    }

    #[test]
    fn interactive_payload_parses_a_button_press() {
        let payload: InteractivePayload = serde_json::from_str(
            r#"{
                "token": "t",
                "callback_id": "options",
                "actions": [{"name": "option", "value": "Pizza"}],
                "user": {"id": "U1", "name": "ada"},
                "original_message": {"ts": "123.456"},
                "channel": {"id": "C1"}
            }"#,
        )
        .unwrap();

        assert_eq!(payload.callback_id, "options");
        assert_eq!(payload.actions[0].value, "Pizza");
        assert_eq!(payload.original_message.unwrap().ts, "123.456");
    }

    #[test]
    fn event_envelope_parses_url_verification() {
        let envelope: EventEnvelope =
            serde_json::from_str(r#"{"type":"url_verification","challenge":"abc"}"#).unwrap();

        assert_eq!(envelope.kind, "url_verification");
        assert_eq!(envelope.challenge.as_deref(), Some("abc"));
        assert!(envelope.event.is_none());
    }
}
