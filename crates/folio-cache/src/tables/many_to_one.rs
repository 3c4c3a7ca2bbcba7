//! Fields where many books share one value and each book has at most one,
//! for example series or publisher.
//!
//! Built in two passes: the id-map pass reads the attribute table into
//! `id → value`, the link pass reads the link table into the forward map
//! `book → id` and the inverse map `id → [book]`.

use std::collections::HashMap;

use folio_common::config::FieldMetadata;
use folio_common::error::FolioResult;
use folio_common::types::{AttributeId, BookId};
use tracing::warn;

use super::rows::{attribute_id, book_id, fetch};
use crate::adapter::FieldAdapter;
use crate::query::{id_map_query, link_query};
use crate::table::BuildContext;
use crate::value::{DomainValue, RawValue};

/// Id-map pass shared with the many-to-many variant.
///
/// Rows with a falsy name are skipped.
pub(crate) fn id_map_from_rows(
    adapter: &FieldAdapter<'_>,
    rows: Vec<[RawValue; 2]>,
) -> FolioResult<HashMap<AttributeId, DomainValue>> {
    let mut id_map = HashMap::with_capacity(rows.len());
    for [id, name] in rows {
        if !name.is_truthy() {
            continue;
        }
        let id = attribute_id(adapter.field(), 0, &id)?;
        id_map.insert(id, adapter.adapt(name)?);
    }
    Ok(id_map)
}

/// Reads `(book, attribute id)` link rows, dropping links whose attribute
/// has no id-map entry.
pub(crate) fn links_from_rows(
    field: &str,
    id_map: &HashMap<AttributeId, DomainValue>,
    rows: Vec<[RawValue; 2]>,
) -> FolioResult<Vec<(BookId, AttributeId)>> {
    let mut links = Vec::with_capacity(rows.len());
    let mut dangling = 0usize;

    for [book, attr] in rows {
        let book = book_id(field, 0, &book)?;
        let attr = attribute_id(field, 1, &attr)?;
        if !id_map.contains_key(&attr) {
            dangling += 1;
            continue;
        }
        links.push((book, attr));
    }

    if dangling > 0 {
        warn!(field, dangling, "dropped links to attributes missing from the id map");
    }
    Ok(links)
}

/// Snapshot of a many-to-one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManyToOneSnapshot {
    id_map: HashMap<AttributeId, DomainValue>,
    book_col: HashMap<BookId, AttributeId>,
    col_books: HashMap<AttributeId, Vec<BookId>>,
}

impl ManyToOneSnapshot {
    /// Builds the snapshot from id-map rows `(id, name)` and link rows
    /// `(book, id)`.
    ///
    /// Link rows naming an id without an id-map entry are dropped, including
    /// ids whose name was skipped as falsy. A book linked more than once
    /// keeps its last link, and is removed from the inverse list of the
    /// value it replaced.
    pub fn from_rows(
        adapter: &FieldAdapter<'_>,
        id_rows: Vec<[RawValue; 2]>,
        link_rows: Vec<[RawValue; 2]>,
    ) -> FolioResult<Self> {
        let id_map = id_map_from_rows(adapter, id_rows)?;
        let links = links_from_rows(adapter.field(), &id_map, link_rows)?;

        let mut book_col: HashMap<BookId, AttributeId> = HashMap::with_capacity(links.len());
        let mut col_books: HashMap<AttributeId, Vec<BookId>> = HashMap::new();
        let mut relinked = 0usize;

        for (book, attr) in links {
            if let Some(previous) = book_col.insert(book, attr) {
                relinked += 1;
                if let Some(books) = col_books.get_mut(&previous) {
                    books.retain(|b| *b != book);
                    if books.is_empty() {
                        col_books.remove(&previous);
                    }
                }
            }
            col_books.entry(attr).or_default().push(book);
        }

        if relinked > 0 {
            warn!(
                field = adapter.field(),
                relinked, "books linked to more than one value; kept the last link"
            );
        }

        Ok(Self {
            id_map,
            book_col,
            col_books,
        })
    }

    pub(crate) fn load(field: &FieldMetadata, ctx: &BuildContext<'_>) -> FolioResult<Self> {
        let id_rows = fetch::<2>(ctx.source, &field.name, &id_map_query(field))?;
        let link_rows = fetch::<2>(ctx.source, &field.name, &link_query(field))?;
        Self::from_rows(&ctx.adapters.adapter_for(field), id_rows, link_rows)
    }

    /// Returns the value id of `book`.
    pub fn get(&self, book: BookId) -> Option<AttributeId> {
        self.book_col.get(&book).copied()
    }

    /// Returns the value of an id.
    pub fn id_of(&self, attr: AttributeId) -> Option<&DomainValue> {
        self.id_map.get(&attr)
    }

    /// Returns the value of `book`, resolved through the id map.
    pub fn value_of(&self, book: BookId) -> Option<&DomainValue> {
        self.get(book).and_then(|attr| self.id_of(attr))
    }

    /// Returns the books sharing `attr`, in link order.
    pub fn books_for(&self, attr: AttributeId) -> &[BookId] {
        self.col_books
            .get(&attr)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the id map.
    pub fn id_map(&self) -> &HashMap<AttributeId, DomainValue> {
        &self.id_map
    }

    /// Returns the forward map.
    pub fn forward(&self) -> &HashMap<BookId, AttributeId> {
        &self.book_col
    }

    /// Returns the inverse map.
    pub fn inverse(&self) -> &HashMap<AttributeId, Vec<BookId>> {
        &self.col_books
    }

    /// Returns the number of linked books.
    pub fn book_count(&self) -> usize {
        self.book_col.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ValueAdapters;
    use crate::source::MemorySource;
    use crate::value::Row;
    use folio_common::config::AuthorSortConfig;
    use proptest::prelude::*;

    fn pair(a: i64, b: impl Into<RawValue>) -> Row {
        Row::from(vec![RawValue::from(a), b.into()])
    }

    fn publisher() -> FieldMetadata {
        FieldMetadata::many_to_one("publisher", "publishers", "name", "publisher")
    }

    fn load(source: &MemorySource) -> ManyToOneSnapshot {
        let adapters = ValueAdapters::new();
        let author_sort = AuthorSortConfig::default();
        let ctx = BuildContext::new(source, &adapters, &author_sort);
        ManyToOneSnapshot::load(&publisher(), &ctx).unwrap()
    }

    fn source(ids: Vec<Row>, links: Vec<Row>) -> MemorySource {
        MemorySource::new()
            .with_rows("SELECT id, name FROM publishers", ids)
            .with_rows("SELECT book, publisher FROM books_publishers_link", links)
    }

    #[test]
    fn test_forward_and_inverse() {
        let snapshot = load(&source(
            vec![pair(10, "Ace"), pair(11, "Tor")],
            vec![pair(1, 10), pair(2, 11), pair(3, 10)],
        ));

        let b = BookId::new;
        let a = AttributeId::new;
        assert_eq!(snapshot.get(b(1)), Some(a(10)));
        assert_eq!(snapshot.value_of(b(2)), Some(&DomainValue::text("Tor")));
        assert_eq!(snapshot.books_for(a(10)), &[b(1), b(3)]);
        assert_eq!(snapshot.books_for(a(11)), &[b(2)]);
        assert_eq!(snapshot.get(b(4)), None);
        assert!(snapshot.books_for(a(99)).is_empty());
    }

    #[test]
    fn test_falsy_names_skipped() {
        let snapshot = load(&source(
            vec![pair(10, "Ace"), pair(11, ""), pair(12, RawValue::Null)],
            vec![pair(1, 10), pair(2, 11)],
        ));

        assert_eq!(snapshot.id_map().len(), 1);
        assert_eq!(snapshot.get(BookId::new(2)), None);
        for attr in snapshot.forward().values() {
            assert!(snapshot.id_of(*attr).is_some());
        }
    }

    #[test]
    fn test_relink_keeps_last() {
        let snapshot = load(&source(
            vec![pair(10, "Ace"), pair(11, "Tor")],
            vec![pair(1, 10), pair(1, 11)],
        ));

        assert_eq!(snapshot.get(BookId::new(1)), Some(AttributeId::new(11)));
        assert!(snapshot.books_for(AttributeId::new(10)).is_empty());
        assert_eq!(snapshot.books_for(AttributeId::new(11)), &[BookId::new(1)]);
    }

    #[test]
    fn test_forward_implies_inverse() {
        let snapshot = load(&source(
            (1..=5).map(|i| pair(i, format!("p{i}"))).collect(),
            (1..=40).map(|b| pair(b, b % 5 + 1)).collect(),
        ));

        for (book, attr) in snapshot.forward() {
            assert!(snapshot.books_for(*attr).contains(book));
        }
        let inverse_total: usize = snapshot.inverse().values().map(Vec::len).sum();
        assert_eq!(inverse_total, snapshot.book_count());
    }

    proptest! {
        #[test]
        fn prop_forward_implies_inverse(
            links in proptest::collection::vec((1i64..20, 1i64..6), 0..120)
        ) {
            let ids = (1..6).map(|i| pair(i, format!("p{i}"))).collect();
            let rows = links.iter().map(|(b, a)| pair(*b, *a)).collect();
            let snapshot = load(&source(ids, rows));

            for (book, attr) in snapshot.forward() {
                prop_assert!(snapshot.books_for(*attr).contains(book));
            }
            for (attr, books) in snapshot.inverse() {
                for book in books {
                    prop_assert_eq!(snapshot.get(*book), Some(*attr));
                }
            }

            let mut last = HashMap::new();
            for (book, attr) in &links {
                last.insert(BookId::new(*book), AttributeId::new(*attr));
            }
            prop_assert_eq!(snapshot.forward(), &last);
            let inverse_total: usize = snapshot.inverse().values().map(Vec::len).sum();
            prop_assert_eq!(inverse_total, last.len());
        }
    }
}
