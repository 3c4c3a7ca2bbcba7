//! Fields where each book has any number of values and each value any
//! number of books, for example tags.
//!
//! The id-map pass is the many-to-one one. The link pass appends to both
//! directions of a [`LinkIndex`] at once, preserving source order.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use folio_common::config::FieldMetadata;
use folio_common::error::FolioResult;
use folio_common::types::{AttributeId, BookId};

use super::many_to_one::{id_map_from_rows, links_from_rows};
use super::rows::fetch;
use crate::adapter::FieldAdapter;
use crate::query::{id_map_query, link_query};
use crate::table::BuildContext;
use crate::value::{DomainValue, RawValue};

/// Bidirectional link index: `book → [V]` and `K → [book]`.
///
/// Both lists only grow, in insertion order, and always together: `book`
/// is in `books_for(k)` iff some entry keyed `k` is in `get(book)`.
#[derive(Debug, Clone)]
pub struct LinkIndex<K, V> {
    forward: HashMap<BookId, Vec<V>>,
    inverse: HashMap<K, Vec<BookId>>,
}

impl<K, V> Default for LinkIndex<K, V> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            inverse: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for LinkIndex<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward && self.inverse == other.inverse
    }
}

impl<K: Eq + Hash, V> LinkIndex<K, V> {
    /// Appends `value` to `book`'s list and `book` to `key`'s list.
    pub fn link(&mut self, book: BookId, key: K, value: V) {
        self.inverse.entry(key).or_default().push(book);
        self.forward.entry(book).or_default().push(value);
    }

    /// Returns the values of `book` in link order; empty if none.
    pub fn get(&self, book: BookId) -> &[V] {
        self.forward
            .get(&book)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the books linked to `key` in link order; empty if none.
    pub fn books_for<Q>(&self, key: &Q) -> &[BookId]
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inverse
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the forward map.
    pub fn forward(&self) -> &HashMap<BookId, Vec<V>> {
        &self.forward
    }

    /// Returns the inverse map.
    pub fn inverse(&self) -> &HashMap<K, Vec<BookId>> {
        &self.inverse
    }

    /// Returns true if `book` has at least one link.
    pub fn contains_book(&self, book: BookId) -> bool {
        self.forward.contains_key(&book)
    }

    /// Returns the number of linked books.
    pub fn book_count(&self) -> usize {
        self.forward.len()
    }

    /// Returns the number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.inverse.len()
    }
}

/// Snapshot of a many-to-many field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManyToManySnapshot {
    id_map: HashMap<AttributeId, DomainValue>,
    links: LinkIndex<AttributeId, AttributeId>,
}

impl ManyToManySnapshot {
    /// Builds the snapshot from id-map rows `(id, name)` and link rows
    /// `(book, id)`.
    ///
    /// Link rows naming an id without an id-map entry are dropped, including
    /// ids whose name was skipped as falsy.
    pub fn from_rows(
        adapter: &FieldAdapter<'_>,
        id_rows: Vec<[RawValue; 2]>,
        link_rows: Vec<[RawValue; 2]>,
    ) -> FolioResult<Self> {
        let id_map = id_map_from_rows(adapter, id_rows)?;
        Self::with_id_map(adapter.field(), id_map, link_rows)
    }

    /// Runs the link pass against an already built id map.
    pub(crate) fn with_id_map(
        field: &str,
        id_map: HashMap<AttributeId, DomainValue>,
        link_rows: Vec<[RawValue; 2]>,
    ) -> FolioResult<Self> {
        let mut links = LinkIndex::default();
        for (book, attr) in links_from_rows(field, &id_map, link_rows)? {
            links.link(book, attr, attr);
        }
        Ok(Self { id_map, links })
    }

    pub(crate) fn load(field: &FieldMetadata, ctx: &BuildContext<'_>) -> FolioResult<Self> {
        let id_rows = fetch::<2>(ctx.source, &field.name, &id_map_query(field))?;
        let link_rows = fetch::<2>(ctx.source, &field.name, &link_query(field))?;
        Self::from_rows(&ctx.adapters.adapter_for(field), id_rows, link_rows)
    }

    /// Returns the value ids of `book` in link order.
    pub fn get(&self, book: BookId) -> &[AttributeId] {
        self.links.get(book)
    }

    /// Returns the books linked to `attr` in link order.
    pub fn books_for(&self, attr: AttributeId) -> &[BookId] {
        self.links.books_for(&attr)
    }

    /// Returns the value of an id.
    pub fn id_of(&self, attr: AttributeId) -> Option<&DomainValue> {
        self.id_map.get(&attr)
    }

    /// Returns the values of `book` in link order.
    pub fn values_of(&self, book: BookId) -> Vec<&DomainValue> {
        self.get(book)
            .iter()
            .filter_map(|attr| self.id_of(*attr))
            .collect()
    }

    /// Returns the id map.
    pub fn id_map(&self) -> &HashMap<AttributeId, DomainValue> {
        &self.id_map
    }

    /// Returns the link index.
    pub fn links(&self) -> &LinkIndex<AttributeId, AttributeId> {
        &self.links
    }
}
