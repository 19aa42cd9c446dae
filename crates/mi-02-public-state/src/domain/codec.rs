//! # Raw State Codec
//!
//! The ledger returns contract state as an opaque blob; for the index
//! contract that blob is the bincode encoding of `PublicState`.

use shared_types::{IndexError, PublicState};

/// Encode a snapshot into its raw ledger form.
pub fn encode_state(state: &PublicState) -> Result<Vec<u8>, IndexError> {
    bincode::serialize(state).map_err(|e| IndexError::Storage(format!("cannot encode state: {e}")))
}

/// Decode a raw ledger blob.
///
/// An undecodable blob means the upstream produced an unusable snapshot and
/// surfaces as `Unavailable`.
pub fn decode_state(raw: &[u8]) -> Result<PublicState, IndexError> {
    let state: PublicState = bincode::deserialize(raw)
        .map_err(|e| IndexError::Unavailable(format!("undecodable contract state: {e}")))?;
    if state.entry_count != state.entries.len() as u64 {
        return Err(IndexError::Unavailable(format!(
            "inconsistent contract state: entry_count {} but {} entries",
            state.entry_count,
            state.entries.len()
        )));
    }
    Ok(state)
}
