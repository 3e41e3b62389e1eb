//! Chat message rendering for polls.
//!
//! Polls render as a text body (question, location line, one tally line
//! per option) plus interactive button attachments. The chat platform
//! caps an attachment at five actions, so buttons are batched.

use serde::{Deserialize, Serialize};

/// Maximum number of actions the chat platform allows per attachment.
pub const ACTIONS_PER_ATTACHMENT: usize = 5;

/// Button name and value used for the "Add More" action on simple polls.
pub const ADD_MORE: &str = "Add More";

/// A single interactive button inside an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action name, used to route the interactive callback.
    pub name: String,
    /// Button label.
    pub text: String,
    /// Action type, always `button`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Value sent back when the button is pressed.
    pub value: String,
}

impl Action {
    fn button(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            text: label.to_string(),
            kind: "button".to_string(),
            value: label.to_string(),
        }
    }
}

/// A message attachment carrying up to [`ACTIONS_PER_ATTACHMENT`] buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment body text (empty for button-only attachments).
    pub text: String,
    /// Callback id the platform echoes back on interaction.
    pub callback_id: String,
    /// Attachment type, always `default`.
    pub attachment_type: String,
    /// The buttons in this attachment.
    pub actions: Vec<Action>,
}

/// Render the poll message body.
///
/// One line per option: `(<tally>) <option> <@voter, @voter, ...>`,
/// with options and vote lists positionally aligned.
#[must_use]
pub fn format_text(question: &str, options: &[String], votes: &[Vec<String>], location: &str) -> String {
    let mut text = format!("*{question}*\n{location}\n");
    for (index, option) in options.iter().enumerate() {
        let voters = votes.get(index).map_or(&[][..], Vec::as_slice);
        let mentions = voters
            .iter()
            .map(|username| format!("@{username}"))
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!("({}) {option} {mentions}\n", voters.len()));
    }
    text
}

/// Build button attachments for a poll's options.
///
/// `options_name` is the per-button action name; the callback id is the
/// plural of it. With `include_add_more`, an extra "Add More" button is
/// appended after the options.
#[must_use]
pub fn format_attachments(
    options: &[String],
    options_name: &str,
    include_add_more: bool,
) -> Vec<Attachment> {
    let mut actions: Vec<Action> = options
        .iter()
        .map(|option| Action::button(options_name, option))
        .collect();
    if include_add_more {
        actions.push(Action::button("addMore", ADD_MORE));
    }

    actions
        .chunks(ACTIONS_PER_ATTACHMENT)
        .map(|chunk| Attachment {
            text: String::new(),
            callback_id: format!("{options_name}s"),
            attachment_type: "default".to_string(),
            actions: chunk.to_vec(),
        })
        .collect()
}

/// Reorder options (and their vote lists) by descending tally.
///
/// The sort is stable, so equal tallies keep their original relative
/// order.
#[must_use]
pub fn order_options(options: &[String], votes: &[Vec<String>]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut pairs: Vec<(String, Vec<String>)> = options
        .iter()
        .cloned()
        .zip(votes.iter().cloned())
        .collect();
    pairs.sort_by_key(|(_, voters)| std::cmp::Reverse(voters.len()));
    pairs.into_iter().unzip()
}
