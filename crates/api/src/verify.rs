//! Inbound webhook verification.
//!
//! Every chat-platform callback carries a shared-secret token, either
//! as a form field or inside the interactive payload JSON. Requests
//! are verified before any mutation happens.

use pollcast_common::{AppError, AppResult};

/// Check a request's verification token against the configured secret.
pub fn verify_token(expected: &str, provided: Option<&str>) -> AppResult<()> {
    match provided {
        None => Err(AppError::BadRequest("Request is not signed".to_string())),
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(AppError::BadToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_token_passes() {
        assert!(verify_token("secret", Some("secret")).is_ok());
    }

    #[test]
    fn wrong_token_is_rejected() {
        assert!(matches!(
            verify_token("secret", Some("other")),
            Err(AppError::BadToken)
        ));
    }

    #[test]
    fn missing_token_is_rejected() {
        assert!(matches!(
            verify_token("secret", None),
            Err(AppError::BadRequest(_))
        ));
    }
}
