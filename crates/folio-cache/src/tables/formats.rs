//! Per-book file formats, read straight from the file records.
//!
//! There is no format entity table, so there is no id map: the forward
//! index holds `(format, file name)` pairs and the inverse index is keyed
//! by format name.

use folio_common::config::FieldMetadata;
use folio_common::error::FolioResult;
use folio_common::types::BookId;

use super::many_to_many::LinkIndex;
use super::rows::{book_id, fetch, optional_text};
use crate::query::FORMATS_QUERY;
use crate::table::BuildContext;
use crate::value::RawValue;

/// One stored file of a book.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatEntry {
    /// Format name, e.g. `EPUB`.
    pub format: String,
    /// Stored file name, if recorded.
    pub name: Option<String>,
}

impl FormatEntry {
    /// Creates an entry with a file name.
    pub fn new(format: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            name: Some(name.into()),
        }
    }
}

/// Snapshot of the formats field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatsSnapshot {
    links: LinkIndex<String, FormatEntry>,
}

impl FormatsSnapshot {
    /// Builds the snapshot from `(book, format, name)` rows, skipping rows
    /// without a format.
    pub fn from_rows(field: &str, rows: Vec<[RawValue; 3]>) -> FolioResult<Self> {
        let mut links = LinkIndex::default();
        for [book, format, name] in rows {
            let Some(format) = optional_text(field, 1, format)? else {
                continue;
            };
            let book = book_id(field, 0, &book)?;
            let name = optional_text(field, 2, name)?;
            links.link(book, format.clone(), FormatEntry { format, name });
        }
        Ok(Self { links })
    }

    pub(crate) fn load(field: &FieldMetadata, ctx: &BuildContext<'_>) -> FolioResult<Self> {
        let rows = fetch::<3>(ctx.source, &field.name, FORMATS_QUERY)?;
        Self::from_rows(&field.name, rows)
    }

    /// Returns the files of `book` in source order.
    pub fn get(&self, book: BookId) -> &[FormatEntry] {
        self.links.get(book)
    }

    /// Returns the books having a file in `format`.
    pub fn books_for(&self, format: &str) -> &[BookId] {
        self.links.books_for(format)
    }

    /// Returns the format names of `book` in source order.
    pub fn formats_of(&self, book: BookId) -> Vec<&str> {
        self.get(book).iter().map(|e| e.format.as_str()).collect()
    }

    /// Returns the link index.
    pub fn links(&self) -> &LinkIndex<String, FormatEntry> {
        &self.links
    }
}
