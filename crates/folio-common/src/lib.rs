//! # folio-common
//!
//! Common types, errors, and configuration for folio.
//!
//! This crate provides the foundational types shared by the folio crates:
//!
//! - **Types**: Book and attribute identifiers (`BookId`, `AttributeId`)
//! - **Errors**: Unified error handling with `FolioError`
//! - **Config**: Catalog field metadata and author-sort settings
//! - **Constants**: Well-known table, field, and separator names
//!
//! ## Example
//!
//! ```rust
//! use folio_common::types::{AttributeId, BookId};
//! use folio_common::error::FolioResult;
//!
//! fn example() -> FolioResult<()> {
//!     let book = BookId::new(42);
//!     let tag = AttributeId::new(7);
//!     assert_eq!(book.as_i64(), 42);
//!     assert_eq!(tag.as_i64(), 7);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use config::{
    AuthorSortConfig, AuthorSortMethod, CatalogConfig, FieldMetadata, SemanticType, TableKind,
};
pub use error::{ErrorCode, FolioError, FolioResult};
pub use types::{AttributeId, BookId};
