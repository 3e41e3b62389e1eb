//! Shared application state.

use pollcast_common::config::ChatConfig;
use pollcast_core::{ChatClient, PollService, SurveyService};

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Simple poll flows.
    pub poll_service: PollService,
    /// Distributed poll flows.
    pub survey_service: SurveyService,
    /// Outbound chat platform client.
    pub chat: ChatClient,
    /// Chat section of the configuration (verification token, default
    /// channel).
    pub chat_config: ChatConfig,
}
