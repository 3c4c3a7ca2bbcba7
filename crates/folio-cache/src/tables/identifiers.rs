//! Per-book external identifiers such as ISBN.

use folio_common::config::FieldMetadata;
use folio_common::error::FolioResult;
use folio_common::types::BookId;

use super::many_to_many::LinkIndex;
use super::rows::{book_id, fetch, optional_text};
use crate::query::IDENTIFIERS_QUERY;
use crate::table::BuildContext;
use crate::value::RawValue;

/// One identifier of a book.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// Identifier scheme, e.g. `isbn`.
    pub kind: String,
    /// Identifier value.
    pub value: String,
}

impl Identifier {
    /// Creates an identifier.
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Snapshot of the identifiers field; the inverse index is keyed by scheme.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifiersSnapshot {
    links: LinkIndex<String, Identifier>,
}

impl IdentifiersSnapshot {
    /// Builds the snapshot from `(book, type, val)` rows, skipping rows
    /// where either field is NULL.
    pub fn from_rows(field: &str, rows: Vec<[RawValue; 3]>) -> FolioResult<Self> {
        let mut links = LinkIndex::default();
        for [book, kind, value] in rows {
            let (Some(kind), Some(value)) =
                (optional_text(field, 1, kind)?, optional_text(field, 2, value)?)
            else {
                continue;
            };
            let book = book_id(field, 0, &book)?;
            links.link(book, kind.clone(), Identifier { kind, value });
        }
        Ok(Self { links })
    }

    pub(crate) fn load(field: &FieldMetadata, ctx: &BuildContext<'_>) -> FolioResult<Self> {
        let rows = fetch::<3>(ctx.source, &field.name, IDENTIFIERS_QUERY)?;
        Self::from_rows(&field.name, rows)
    }

    /// Returns the identifiers of `book` in source order.
    pub fn get(&self, book: BookId) -> &[Identifier] {
        self.links.get(book)
    }

    /// Returns the books having an identifier of scheme `kind`.
    pub fn books_for(&self, kind: &str) -> &[BookId] {
        self.links.books_for(kind)
    }

    /// Returns the first value of scheme `kind` for `book`.
    pub fn value_of(&self, book: BookId, kind: &str) -> Option<&str> {
        self.get(book)
            .iter()
            .find(|id| id.kind == kind)
            .map(|id| id.value.as_str())
    }

    /// Returns the link index.
    pub fn links(&self) -> &LinkIndex<String, Identifier> {
        &self.links
    }
}
