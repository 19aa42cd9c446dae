//! # Entry Validation
//!
//! Checks run before a transaction is spent. Anything rejected here never
//! reaches the submitter.

use shared_types::{is_hex_token, Entry, IndexError, ENTRY_DELIMITER};

/// Validate and normalize an (address, title) pair.
///
/// Both parts are trimmed. The address must be hex with an optional `0x`
/// prefix, which is preserved. Neither part may contain the delimiter.
pub fn validate_entry(address: &str, title: &str) -> Result<Entry, IndexError> {
    let address = address.trim();
    let title = title.trim();

    if address.is_empty() || title.is_empty() {
        return Err(IndexError::Validation(
            "Title and address are required".into(),
        ));
    }
    if title.contains(ENTRY_DELIMITER) {
        return Err(IndexError::Validation(format!(
            "Title must not contain '{ENTRY_DELIMITER}'"
        )));
    }
    if !is_hex_token(address) {
        return Err(IndexError::Validation(
            "Invalid contract address format".into(),
        ));
    }

    Ok(Entry::new(address, title))
}

/// Validate a raw `"address,title"` entry.
pub fn parse_entry(raw: &str) -> Result<Entry, IndexError> {
    match raw.split_once(ENTRY_DELIMITER) {
        Some((address, title)) => validate_entry(address, title),
        None => Err(IndexError::Validation(format!(
            "Entry must have the form address{ENTRY_DELIMITER}title"
        ))),
    }
}
