//! Core types for folio.

mod ids;

pub use ids::{AttributeId, BookId};
