//! Checks run before a page transaction is spent.

use shared_types::IndexError;

/// A post must carry some content.
pub fn validate_message(message: &str) -> Result<&str, IndexError> {
    if message.trim().is_empty() {
        return Err(IndexError::Validation("Message is required".into()));
    }
    Ok(message)
}

/// Titles are trimmed and must not be blank.
pub fn validate_title(title: &str) -> Result<&str, IndexError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(IndexError::Validation("Title is required".into()));
    }
    Ok(title)
}
