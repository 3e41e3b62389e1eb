//! HTTP API layer for pollcast.
//!
//! Routes webhook deliveries from the chat platform (slash commands,
//! interactive button presses, event callbacks) plus a small REST
//! surface for poll creation and survey response export.
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod payload;
pub mod state;
pub mod verify;

pub use endpoints::router;
pub use state::AppState;
