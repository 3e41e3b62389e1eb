//! Core business logic for pollcast.

pub mod chat;
pub mod export;
pub mod format;
pub mod parser;
pub mod services;

pub use chat::{ChatClient, TokenKind};
pub use services::*;
