//! In-memory materialized views over a relational book catalog.
//!
//! Every catalog field is mirrored into an immutable snapshot holding a
//! forward index (book → value or values) and, for many-valued fields, an
//! inverse index (value → books), so per-book lookups never touch the
//! backing store:
//!
//! - **One-to-one**: one value per book (title, timestamp, size, ...)
//! - **Many-to-one**: many books share one value (series, publisher)
//! - **Many-to-many**: ordered values per book (tags, authors, formats,
//!   identifiers)
//!
//! Raw values are converted exactly once at build time by
//! [`ValueAdapters`]. Snapshots are rebuilt wholesale from a [`RowSource`]
//! and published atomically by [`Table`]; readers pin an `Arc` and never
//! observe a half-built snapshot.
//!
//! # Example
//!
//! ```rust
//! use folio_cache::{MemorySource, RawValue, Row, TableRegistry};
//! use folio_common::{BookId, CatalogConfig, FieldMetadata};
//!
//! let config = CatalogConfig::new(vec![FieldMetadata::one_to_one("title", "books", "title")]);
//! let registry = TableRegistry::new(config).unwrap();
//!
//! let source = MemorySource::new();
//! source.set_rows(
//!     "SELECT id, title FROM books",
//!     vec![Row::from(vec![RawValue::from(1), RawValue::from("Dune")])],
//! );
//! registry.reload_all(&source).unwrap();
//!
//! let titles = registry.snapshot("title").unwrap().unwrap();
//! let title = titles.as_one_to_one().unwrap().get(BookId::new(1));
//! assert_eq!(title.and_then(|v| v.as_text()), Some("Dune"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod author_sort;
pub mod query;
pub mod registry;
pub mod source;
pub mod stats;
pub mod table;
pub mod tables;
pub mod value;

pub use adapter::{FieldAdapter, ValueAdapters};
pub use author_sort::author_to_author_sort;
pub use registry::TableRegistry;
pub use source::{MemorySource, RowSource};
#[cfg(feature = "sqlite")]
pub use source::SqliteSource;
pub use stats::ReloadStats;
pub use table::{BuildContext, Table, TableState};
pub use tables::{
    AuthorsSnapshot, Cardinality, FormatEntry, FormatsSnapshot, Identifier, IdentifiersSnapshot,
    LinkIndex, ManyToManySnapshot, ManyToOneSnapshot, OneToOneSnapshot, TableSnapshot,
};
pub use value::{DomainValue, RawValue, Row};
