//! Authors: many-to-many with a sort key and a link per author.

use std::collections::HashMap;

use folio_common::config::{AuthorSortConfig, FieldMetadata};
use folio_common::error::FolioResult;
use folio_common::types::{AttributeId, BookId};

use super::many_to_many::ManyToManySnapshot;
use super::rows::{attribute_id, fetch, optional_text};
use crate::adapter::FieldAdapter;
use crate::author_sort::author_to_author_sort;
use crate::query::{link_query, AUTHORS_ID_MAP_QUERY};
use crate::table::BuildContext;
use crate::value::{DomainValue, RawValue};

/// Snapshot of the authors field.
///
/// Every author row gets an id-map entry, a sort key, and a link entry.
/// A missing sort key is derived from the name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorsSnapshot {
    base: ManyToManySnapshot,
    sort_map: HashMap<AttributeId, String>,
    link_map: HashMap<AttributeId, Option<String>>,
}

impl AuthorsSnapshot {
    /// Builds the snapshot from `(id, name, sort, link)` rows and
    /// `(book, author id)` link rows.
    pub fn from_rows(
        adapter: &FieldAdapter<'_>,
        author_sort: &AuthorSortConfig,
        author_rows: Vec<[RawValue; 4]>,
        link_rows: Vec<[RawValue; 2]>,
    ) -> FolioResult<Self> {
        let field = adapter.field();
        let mut id_map = HashMap::with_capacity(author_rows.len());
        let mut sort_map = HashMap::with_capacity(author_rows.len());
        let mut link_map = HashMap::with_capacity(author_rows.len());

        for [id, name, sort, link] in author_rows {
            let id = attribute_id(field, 0, &id)?;
            let name = adapter.adapt(name)?;
            let sort = match optional_text(field, 2, sort)? {
                Some(sort) if !sort.is_empty() => sort,
                _ => author_to_author_sort(name.as_text().unwrap_or_default(), author_sort),
            };
            let link = optional_text(field, 3, link)?.filter(|l| !l.is_empty());

            id_map.insert(id, name);
            sort_map.insert(id, sort);
            link_map.insert(id, link);
        }

        Ok(Self {
            base: ManyToManySnapshot::with_id_map(field, id_map, link_rows)?,
            sort_map,
            link_map,
        })
    }

    pub(crate) fn load(field: &FieldMetadata, ctx: &BuildContext<'_>) -> FolioResult<Self> {
        let author_rows = fetch::<4>(ctx.source, &field.name, AUTHORS_ID_MAP_QUERY)?;
        let link_rows = fetch::<2>(ctx.source, &field.name, &link_query(field))?;
        Self::from_rows(
            &ctx.adapters.adapter_for(field),
            ctx.author_sort,
            author_rows,
            link_rows,
        )
    }

    /// Returns the author ids of `book` in link order.
    pub fn get(&self, book: BookId) -> &[AttributeId] {
        self.base.get(book)
    }

    /// Returns the books by `author` in link order.
    pub fn books_for(&self, author: AttributeId) -> &[BookId] {
        self.base.books_for(author)
    }

    /// Returns the display name of an author.
    pub fn name_of(&self, author: AttributeId) -> Option<&DomainValue> {
        self.base.id_of(author)
    }

    /// Returns the sort key of an author.
    pub fn sort_of(&self, author: AttributeId) -> Option<&str> {
        self.sort_map.get(&author).map(String::as_str)
    }

    /// Returns the link of an author, if one is set.
    pub fn link_of(&self, author: AttributeId) -> Option<&str> {
        self.link_map.get(&author).and_then(Option::as_deref)
    }

    /// Returns the author names of `book` in link order.
    pub fn names_of(&self, book: BookId) -> Vec<&DomainValue> {
        self.base.values_of(book)
    }

    /// Returns the sort-key map.
    pub fn sort_map(&self) -> &HashMap<AttributeId, String> {
        &self.sort_map
    }

    /// Returns the underlying many-to-many snapshot.
    pub fn as_many_to_many(&self) -> &ManyToManySnapshot {
        &self.base
    }
}
