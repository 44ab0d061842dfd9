//! Message validation rules.

use serde_json::Value;

use poker_core::error::AppError;

/// Validates the raw size and content of an inbound frame.
pub fn validate_inbound(raw: &str, max_bytes: usize) -> Result<(), AppError> {
    if raw.len() > max_bytes {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {max_bytes} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

/// Accepts a vote only when it is a JSON string of at most `max_chars` characters.
pub fn validate_vote(vote: &Value, max_chars: usize) -> Result<String, AppError> {
    match vote {
        Value::String(value) if value.chars().count() <= max_chars => Ok(value.clone()),
        _ => Err(AppError::validation("Invalid vote.")),
    }
}
