//! # MI-08 Page Board
//!
//! Page contracts: the sites whose addresses the main index lists.
//!
//! **Subsystem ID:** 8
//! **Architecture:** Hexagonal (pure domain + port + service facade)
//!
//! ## Purpose
//!
//! A page is a single-slot board. Whoever posts to a vacant page owns it for
//! the current epoch, using the same owner-hash binding as the main index.
//! Only the poster may edit the page's metadata or take the post down, and a
//! take-down opens a new epoch so that the old proof stops matching.
//!
//! ## State Machine
//!
//! | From | Operation | Caller | To |
//! |------|-----------|--------|----|
//! | Vacant | `post(m)` | anyone | Occupied, owner = caller, message = m |
//! | Occupied | `post(m)` | anyone | `BoardOccupied` |
//! | Occupied | `takeDown` | owner | Vacant, sequence + 1 |
//! | Occupied | `updateTitle` / `updateDescription` / `setPrivateWeb` | owner | Occupied |
//! | Vacant | `takeDown` / metadata update | anyone | `BoardVacant` |
//!
//! ## Module Structure
//!
//! ```text
//! mi-08-page-board/
//! ├── domain/
//! │   ├── codec.rs        # bincode page state blob
//! │   ├── contract.rs     # PageContract rules
//! │   └── validation.rs   # local checks before a transaction is spent
//! ├── ports/              # PageLedger trait + MockPageLedger
//! └── service.rs          # PageBoard facade, PageDeps
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{decode_page, encode_page, validate_message, validate_title, PageContract};
pub use ports::{MockPageLedger, PageCall, PageLedger};
pub use service::{PageBoard, PageDeps};
