//! Fields with exactly one value per book.
//!
//! Uniqueness is assumed, not enforced: if the source returns a book twice
//! the later row wins.

use std::collections::HashMap;

use folio_common::config::{FieldMetadata, TableKind};
use folio_common::error::FolioResult;
use folio_common::types::BookId;

use super::rows::{book_id, fetch};
use crate::adapter::FieldAdapter;
use crate::query::{one_to_one_query, SIZE_QUERY};
use crate::table::BuildContext;
use crate::value::{DomainValue, RawValue};

/// Forward index `book → value`. There is no inverse index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneToOneSnapshot {
    values: HashMap<BookId, DomainValue>,
}

impl OneToOneSnapshot {
    /// Builds the index from `(book id, raw value)` rows.
    pub fn from_rows(adapter: &FieldAdapter<'_>, rows: Vec<[RawValue; 2]>) -> FolioResult<Self> {
        let mut values = HashMap::with_capacity(rows.len());
        for [book, raw] in rows {
            let book = book_id(adapter.field(), 0, &book)?;
            values.insert(book, adapter.adapt(raw)?);
        }
        Ok(Self { values })
    }

    /// Runs the field's query and builds the index.
    ///
    /// Size fields take the per-book maximum computed by the store.
    pub(crate) fn load(field: &FieldMetadata, ctx: &BuildContext<'_>) -> FolioResult<Self> {
        let query = match field.kind {
            TableKind::Size => SIZE_QUERY.to_string(),
            _ => one_to_one_query(field),
        };
        let rows = fetch::<2>(ctx.source, &field.name, &query)?;
        Self::from_rows(&ctx.adapters.adapter_for(field), rows)
    }

    /// Returns the value of `book`, or `None` if the book is missing or its
    /// value is NULL.
    pub fn get(&self, book: BookId) -> Option<&DomainValue> {
        self.values.get(&book).filter(|v| !v.is_null())
    }

    /// Returns true if `book` has a row, even a NULL one.
    pub fn contains_book(&self, book: BookId) -> bool {
        self.values.contains_key(&book)
    }

    /// Returns the full forward map.
    pub fn as_map(&self) -> &HashMap<BookId, DomainValue> {
        &self.values
    }

    /// Returns the number of books indexed.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no books are indexed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
