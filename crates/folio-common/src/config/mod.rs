//! Configuration for folio.
//!
//! This module provides the catalog field metadata consumed by the table
//! layer and the settings of the author sort-key transform.

mod author_sort;
mod catalog;

pub use author_sort::{AuthorSortConfig, AuthorSortMethod};
pub use catalog::{CatalogConfig, FieldMetadata, SemanticType, TableKind};
