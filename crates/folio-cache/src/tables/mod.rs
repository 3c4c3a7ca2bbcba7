//! Snapshot variants, one per table shape.
//!
//! Each variant is built by a pure function from source rows to an
//! immutable struct. [`TableSnapshot`] closes the set so callers can
//! dispatch on it without trait objects.

mod authors;
mod formats;
mod identifiers;
mod many_to_many;
mod many_to_one;
mod one_to_one;
mod rows;

pub use authors::AuthorsSnapshot;
pub use formats::{FormatEntry, FormatsSnapshot};
pub use identifiers::{Identifier, IdentifiersSnapshot};
pub use many_to_many::{LinkIndex, ManyToManySnapshot};
pub use many_to_one::ManyToOneSnapshot;
pub use one_to_one::OneToOneSnapshot;

use folio_common::config::{FieldMetadata, TableKind};
use folio_common::error::FolioResult;
use folio_common::types::BookId;

use crate::table::BuildContext;
use crate::value::DomainValue;

/// Relationship shape between books and a field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// One value per book.
    OneToOne,
    /// At most one shared value per book.
    ManyToOne,
    /// An ordered list of values per book.
    ManyToMany,
}

/// One immutable, fully built generation of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSnapshot {
    /// One-to-one and size fields.
    OneToOne(OneToOneSnapshot),
    /// Many-to-one fields.
    ManyToOne(ManyToOneSnapshot),
    /// Plain many-to-many fields.
    ManyToMany(ManyToManySnapshot),
    /// The authors field.
    Authors(AuthorsSnapshot),
    /// The formats field.
    Formats(FormatsSnapshot),
    /// The identifiers field.
    Identifiers(IdentifiersSnapshot),
}

impl TableSnapshot {
    /// Builds a snapshot for `field` from the context's source.
    pub(crate) fn load(field: &FieldMetadata, ctx: &BuildContext<'_>) -> FolioResult<Self> {
        Ok(match field.kind {
            TableKind::OneToOne | TableKind::Size => {
                Self::OneToOne(OneToOneSnapshot::load(field, ctx)?)
            }
            TableKind::ManyToOne => Self::ManyToOne(ManyToOneSnapshot::load(field, ctx)?),
            TableKind::ManyToMany => Self::ManyToMany(ManyToManySnapshot::load(field, ctx)?),
            TableKind::Authors => Self::Authors(AuthorsSnapshot::load(field, ctx)?),
            TableKind::Formats => Self::Formats(FormatsSnapshot::load(field, ctx)?),
            TableKind::Identifiers => Self::Identifiers(IdentifiersSnapshot::load(field, ctx)?),
        })
    }

    /// Returns the relationship shape.
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::OneToOne(_) => Cardinality::OneToOne,
            Self::ManyToOne(_) => Cardinality::ManyToOne,
            Self::ManyToMany(_) | Self::Authors(_) | Self::Formats(_) | Self::Identifiers(_) => {
                Cardinality::ManyToMany
            }
        }
    }

    /// Returns the number of books with an entry in the forward index.
    pub fn book_count(&self) -> usize {
        match self {
            Self::OneToOne(s) => s.len(),
            Self::ManyToOne(s) => s.book_count(),
            Self::ManyToMany(s) => s.links().book_count(),
            Self::Authors(s) => s.as_many_to_many().links().book_count(),
            Self::Formats(s) => s.links().book_count(),
            Self::Identifiers(s) => s.links().book_count(),
        }
    }

    /// Returns true if `book` has an entry in the forward index.
    pub fn contains_book(&self, book: BookId) -> bool {
        match self {
            Self::OneToOne(s) => s.contains_book(book),
            Self::ManyToOne(s) => s.get(book).is_some(),
            Self::ManyToMany(s) => s.links().contains_book(book),
            Self::Authors(s) => s.as_many_to_many().links().contains_book(book),
            Self::Formats(s) => s.links().contains_book(book),
            Self::Identifiers(s) => s.links().contains_book(book),
        }
    }

    /// Returns the display values of `book` in forward order.
    ///
    /// Ids resolve through the id map; formats yield their names and
    /// identifiers yield `type:value`.
    pub fn values_for(&self, book: BookId) -> Vec<DomainValue> {
        match self {
            Self::OneToOne(s) => s.get(book).cloned().into_iter().collect(),
            Self::ManyToOne(s) => s.value_of(book).cloned().into_iter().collect(),
            Self::ManyToMany(s) => s.values_of(book).into_iter().cloned().collect(),
            Self::Authors(s) => s.names_of(book).into_iter().cloned().collect(),
            Self::Formats(s) => s
                .get(book)
                .iter()
                .map(|entry| DomainValue::text(entry.format.as_str()))
                .collect(),
            Self::Identifiers(s) => s
                .get(book)
                .iter()
                .map(|id| DomainValue::text(format!("{}:{}", id.kind, id.value)))
                .collect(),
        }
    }

    /// Returns the one-to-one snapshot, if this is one.
    pub fn as_one_to_one(&self) -> Option<&OneToOneSnapshot> {
        match self {
            Self::OneToOne(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the many-to-one snapshot, if this is one.
    pub fn as_many_to_one(&self) -> Option<&ManyToOneSnapshot> {
        match self {
            Self::ManyToOne(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the many-to-many snapshot, including the one underlying
    /// the authors field.
    pub fn as_many_to_many(&self) -> Option<&ManyToManySnapshot> {
        match self {
            Self::ManyToMany(s) => Some(s),
            Self::Authors(s) => Some(s.as_many_to_many()),
            _ => None,
        }
    }

    /// Returns the authors snapshot, if this is one.
    pub fn as_authors(&self) -> Option<&AuthorsSnapshot> {
        match self {
            Self::Authors(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the formats snapshot, if this is one.
    pub fn as_formats(&self) -> Option<&FormatsSnapshot> {
        match self {
            Self::Formats(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the identifiers snapshot, if this is one.
    pub fn as_identifiers(&self) -> Option<&IdentifiersSnapshot> {
        match self {
            Self::Identifiers(s) => Some(s),
            _ => None,
        }
    }
}
