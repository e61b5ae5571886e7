//! Testing utilities and fixtures for redline.
//!
//! - **Fixtures**: temporary documents directories
//! - **Assertions**: helpers for checking files and diffs
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use redline_test_utils::TestDocuments;
//!
//! #[tokio::test]
//! async fn test_read_then_edit() {
//!     let docs = TestDocuments::new()
//!         .with_file("draft.md", "Hello World\n")
//!         .build();
//!
//!     let engine = docs.engine();
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;

pub use fixtures::{TestDocuments, TestDocumentsBuilder};
