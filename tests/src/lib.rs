//! # Ledger Commit Pipeline Test Suite
//!
//! Cross-crate scenarios driving a transaction through endorsement,
//! ordering, block commit and finality on the in-memory network driver.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs     # Nodes, sessions and an in-memory channel
//!     ├── endorsement.rs  # Multi-party endorsement over sessions
//!     └── pipeline.rs     # Endorse → order → commit → finality
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lc-tests
//! cargo test -p lc-tests integration::pipeline::
//! ```

pub mod integration;
