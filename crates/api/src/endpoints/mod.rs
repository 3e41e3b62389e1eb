//! API endpoints.

mod events;
mod health;
mod interactive;
mod polls;
mod slash;
mod surveys;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::status))
        .route("/chat/command", post(slash::slash_command))
        .route("/chat/interactive", post(interactive::interactive_action))
        .route("/chat/events", post(events::event_callback))
        .route("/polls", post(polls::create_poll))
        .route("/surveys/{name}/responses", get(surveys::export_responses))
        .route("/surveys/{name}", delete(surveys::delete_survey))
}
