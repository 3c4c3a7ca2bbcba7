//! Static source query text for each table kind.
//!
//! Every query is read-only and fully materialized; column order is fixed
//! per query and checked against the row arity at build time.

use folio_common::config::{FieldMetadata, TableKind};

/// Largest stored file size per book, aggregated by the backing store.
pub const SIZE_QUERY: &str =
    "SELECT books.id, (SELECT MAX(uncompressed_size) FROM data WHERE data.book=books.id) FROM books";

/// Author id-map pass: `(id, name, sort, link)`.
pub const AUTHORS_ID_MAP_QUERY: &str = "SELECT id, name, sort, link FROM authors";

/// Per-book file records: `(book, format, name)`.
pub const FORMATS_QUERY: &str = "SELECT book, format, name FROM data";

/// Per-book identifiers: `(book, type, val)`.
pub const IDENTIFIERS_QUERY: &str = "SELECT book, type, val FROM identifiers";

/// One-to-one pass: `(book id, value)`.
pub fn one_to_one_query(field: &FieldMetadata) -> String {
    format!(
        "SELECT {}, {} FROM {}",
        field.book_id_column(),
        field.column,
        field.table
    )
}

/// Id-map pass of an attribute table: `(id, name)`.
pub fn id_map_query(field: &FieldMetadata) -> String {
    format!("SELECT id, {} FROM {}", field.column, field.table)
}

/// Link pass: `(book, attribute id)`.
pub fn link_query(field: &FieldMetadata) -> String {
    format!(
        "SELECT book, {} FROM {}",
        field.link_column.as_deref().unwrap_or_default(),
        field.link_table()
    )
}

/// Every query a build of `field` issues, in execution order.
pub fn queries_for(field: &FieldMetadata) -> Vec<String> {
    match field.kind {
        TableKind::OneToOne => vec![one_to_one_query(field)],
        TableKind::Size => vec![SIZE_QUERY.to_string()],
        TableKind::ManyToOne | TableKind::ManyToMany => {
            vec![id_map_query(field), link_query(field)]
        }
        TableKind::Authors => vec![AUTHORS_ID_MAP_QUERY.to_string(), link_query(field)],
        TableKind::Formats => vec![FORMATS_QUERY.to_string()],
        TableKind::Identifiers => vec![IDENTIFIERS_QUERY.to_string()],
    }
}
