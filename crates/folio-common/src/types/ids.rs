//! Core identifier types for folio.
//!
//! These types provide type-safe wrappers around the integer row ids of the
//! backing store, so a book id can never be passed where an attribute id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Book identifier - the id of one row of the books table.
///
/// Stable for the lifetime of a loaded snapshot.
///
/// # Example
///
/// ```rust
/// use folio_common::types::BookId;
///
/// let book = BookId::new(42);
/// assert_eq!(book.as_i64(), 42);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BookId(i64);

impl BookId {
    /// Creates a new `BookId` from a raw row id.
    #[inline]
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    #[inline]
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookId({})", self.0)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BookId {
    #[inline]
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl From<BookId> for i64 {
    #[inline]
    fn from(id: BookId) -> Self {
        id.0
    }
}

/// Attribute identifier - the id of one distinct value of a many-valued
/// attribute (an author, a tag, a publisher, ...).
///
/// Only meaningful within the attribute table it came from.
///
/// # Example
///
/// ```rust
/// use folio_common::types::AttributeId;
///
/// let author = AttributeId::new(3);
/// assert_eq!(author.to_string(), "3");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct AttributeId(i64);

impl AttributeId {
    /// Creates a new `AttributeId` from a raw row id.
    #[inline]
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    #[inline]
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeId({})", self.0)
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AttributeId {
    #[inline]
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl From<AttributeId> for i64 {
    #[inline]
    fn from(id: AttributeId) -> Self {
        id.0
    }
}
