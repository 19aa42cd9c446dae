//! Raw page state: the bincode encoding of `PageState`.

use shared_types::{BoardState, IndexError, PageState};

/// Encode a page into its raw ledger form.
pub fn encode_page(page: &PageState) -> Result<Vec<u8>, IndexError> {
    bincode::serialize(page).map_err(|e| IndexError::Storage(format!("cannot encode page: {e}")))
}

/// Decode a raw page blob. Unusable blobs surface as `Unavailable`.
pub fn decode_page(raw: &[u8]) -> Result<PageState, IndexError> {
    let page: PageState = bincode::deserialize(raw)
        .map_err(|e| IndexError::Unavailable(format!("undecodable page state: {e}")))?;
    if (page.state == BoardState::Occupied) != page.message.is_some() {
        return Err(IndexError::Unavailable(format!(
            "inconsistent page state: {:?} with message present = {}",
            page.state,
            page.message.is_some()
        )));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encoded_page() {
        let mut page = PageState::initial();
        page.state = BoardState::Occupied;
        page.message = Some("<h1>hi</h1>".into());
        page.title = "Home".into();
        let raw = encode_page(&page).unwrap();
        assert_eq!(decode_page(&raw).unwrap(), page);
    }

    #[test]
    fn test_occupied_without_message_is_unavailable() {
        let mut page = PageState::initial();
        page.state = BoardState::Occupied;
        let raw = encode_page(&page).unwrap();
        assert!(matches!(decode_page(&raw), Err(IndexError::Unavailable(_))));
    }

    #[test]
    fn test_garbage_is_unavailable() {
        assert!(matches!(decode_page(&[0xff]), Err(IndexError::Unavailable(_))));
    }
}
