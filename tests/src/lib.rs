//! # Main-Index Test Suite
//!
//! Cross-crate scenarios run against the standalone ledger.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks of the hot paths
//! └── src/integration/  # end-to-end flows, one file per concern
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mi-tests
//! cargo test -p mi-tests integration::ownership_flows
//! cargo bench -p mi-tests
//! ```

pub mod integration;
