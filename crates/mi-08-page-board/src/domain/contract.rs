//! # Page Contract Rules
//!
//! Pure functions from the current `PageState` and the caller's secret to
//! the next state or a rejection. Board-state checks run before the owner
//! check, so taking down a vacant page reports `BoardVacant` to anyone.

use mi_03_ownership::{derive_owner_hash, owner_matches};
use shared_types::{BoardState, Hash, LedgerRejection, PageOperation, PageState, SecretKey};

/// Rules of a page contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageContract;

impl PageContract {
    /// State of a freshly deployed page.
    pub fn genesis() -> PageState {
        PageState::initial()
    }

    /// Execute `operation` as the holder of `secret`.
    pub fn execute(
        page: &PageState,
        operation: &PageOperation,
        secret: &SecretKey,
    ) -> Result<PageState, LedgerRejection> {
        match operation {
            PageOperation::Post { message } => Self::post(page, message, secret),
            PageOperation::TakeDown => {
                Self::require_poster(page, secret)?;
                Ok(Self::take_down(page))
            }
            PageOperation::UpdateTitle { title } => {
                Self::require_poster(page, secret)?;
                Ok(PageState {
                    title: title.clone(),
                    ..page.clone()
                })
            }
            PageOperation::UpdateDescription { description } => {
                Self::require_poster(page, secret)?;
                Ok(PageState {
                    description: description.clone(),
                    ..page.clone()
                })
            }
            PageOperation::SetPrivateWeb { private } => {
                Self::require_poster(page, secret)?;
                Ok(PageState {
                    is_public: !private,
                    ..page.clone()
                })
            }
        }
    }

    /// True if `secret` posted the current content.
    pub fn is_poster(page: &PageState, secret: &SecretKey) -> bool {
        page.state == BoardState::Occupied
            && owner_hash(secret, page.sequence)
                .map(|candidate| owner_matches(&page.owner, &candidate))
                .unwrap_or(false)
    }

    fn post(page: &PageState, message: &str, secret: &SecretKey) -> Result<PageState, LedgerRejection> {
        if page.state == BoardState::Occupied {
            return Err(LedgerRejection::BoardOccupied);
        }
        Ok(PageState {
            state: BoardState::Occupied,
            message: Some(message.to_string()),
            owner: owner_hash(secret, page.sequence)?,
            ..page.clone()
        })
    }

    fn require_poster(page: &PageState, secret: &SecretKey) -> Result<(), LedgerRejection> {
        if page.state == BoardState::Vacant {
            return Err(LedgerRejection::BoardVacant);
        }
        if owner_matches(&page.owner, &owner_hash(secret, page.sequence)?) {
            Ok(())
        } else {
            Err(LedgerRejection::NotOwner)
        }
    }

    /// Vacate the page and open a new epoch. The owner bytes stay, bound to
    /// the old epoch; the metadata goes with the post.
    fn take_down(page: &PageState) -> PageState {
        PageState {
            sequence: page.sequence + 1,
            state: BoardState::Vacant,
            message: None,
            owner: page.owner,
            ..PageState::initial()
        }
    }
}

fn owner_hash(secret: &SecretKey, sequence: u64) -> Result<Hash, LedgerRejection> {
    derive_owner_hash(secret.as_bytes(), sequence)
        .map_err(|e| LedgerRejection::MalformedEntry(e.to_string()))
}
