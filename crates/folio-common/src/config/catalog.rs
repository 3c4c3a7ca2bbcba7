//! Catalog field metadata.
//!
//! Each [`FieldMetadata`] describes one logical attribute of a book: which
//! table it lives in, how it relates to books, and which semantic type its
//! stored values carry. The metadata is owned by the schema loader; the
//! table layer only reads it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::author_sort::AuthorSortConfig;
use crate::constants::{default_link_table, BOOKS_ID_COLUMN, BOOKS_TABLE, BOOK_COLUMN};
use crate::error::{FolioError, FolioResult};

/// Relationship shape between books and a field's values, including the
/// specialized tables with bespoke source queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Exactly one value per book, stored in a column.
    OneToOne,
    /// Largest stored file size per book.
    Size,
    /// Many books share a value; each book has at most one.
    ManyToOne,
    /// Each book has any number of values, each shared by any number of books.
    ManyToMany,
    /// Many-to-many authors with sort keys and links.
    Authors,
    /// Per-book file formats.
    Formats,
    /// Per-book external identifiers.
    Identifiers,
}

impl TableKind {
    /// Returns true for kinds backed by an attribute table plus a link table.
    #[must_use]
    pub const fn has_link_table(self) -> bool {
        matches!(self, Self::ManyToOne | Self::ManyToMany | Self::Authors)
    }

    /// Returns true for kinds that may appear at most once in a catalog.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(
            self,
            Self::Size | Self::Authors | Self::Formats | Self::Identifiers
        )
    }
}

/// Declared semantic type of a field's stored values.
///
/// Anything other than the timestamp and boolean tags (including `text`)
/// passes values through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Textual timestamp, parsed into a timezone-aware instant.
    #[serde(alias = "datetime")]
    Timestamp,
    /// Coerced to its truthiness.
    #[serde(alias = "bool")]
    Boolean,
    /// Plain text.
    Text,
    /// No declared type.
    #[default]
    #[serde(other)]
    Unspecified,
}

/// Metadata for one catalog field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Field name, unique within a catalog.
    pub name: String,

    /// Relationship shape.
    pub kind: TableKind,

    /// Table holding the values (for one-to-one, the per-book table).
    #[serde(default)]
    pub table: String,

    /// Column holding the value (for many-valued kinds, the name column).
    #[serde(default)]
    pub column: String,

    /// Column of the link table that references the attribute table.
    #[serde(default)]
    pub link_column: Option<String>,

    /// Link table name. Default: `books_<table>_link`
    #[serde(default)]
    pub link_table: Option<String>,

    /// Semantic type of the stored values.
    #[serde(default)]
    pub datatype: SemanticType,
}

impl FieldMetadata {
    fn new(name: &str, kind: TableKind, table: &str, column: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            table: table.to_string(),
            column: column.to_string(),
            link_column: None,
            link_table: None,
            datatype: SemanticType::Unspecified,
        }
    }

    /// Creates a one-to-one field stored in `table.column`.
    #[must_use]
    pub fn one_to_one(name: &str, table: &str, column: &str) -> Self {
        Self::new(name, TableKind::OneToOne, table, column)
    }

    /// Creates a many-to-one field.
    #[must_use]
    pub fn many_to_one(name: &str, table: &str, column: &str, link_column: &str) -> Self {
        let mut meta = Self::new(name, TableKind::ManyToOne, table, column);
        meta.link_column = Some(link_column.to_string());
        meta
    }

    /// Creates a many-to-many field.
    #[must_use]
    pub fn many_to_many(name: &str, table: &str, column: &str, link_column: &str) -> Self {
        let mut meta = Self::new(name, TableKind::ManyToMany, table, column);
        meta.link_column = Some(link_column.to_string());
        meta
    }

    /// Creates the size field.
    #[must_use]
    pub fn size() -> Self {
        Self::new("size", TableKind::Size, "data", "uncompressed_size")
    }

    /// Creates the authors field.
    #[must_use]
    pub fn authors() -> Self {
        let mut meta = Self::new("authors", TableKind::Authors, "authors", "name");
        meta.link_column = Some("author".to_string());
        meta
    }

    /// Creates the formats field.
    #[must_use]
    pub fn formats() -> Self {
        Self::new("formats", TableKind::Formats, "data", "format")
    }

    /// Creates the identifiers field.
    #[must_use]
    pub fn identifiers() -> Self {
        Self::new("identifiers", TableKind::Identifiers, "identifiers", "val")
    }

    /// Sets the semantic type.
    #[must_use]
    pub fn with_datatype(mut self, datatype: SemanticType) -> Self {
        self.datatype = datatype;
        self
    }

    /// Overrides the link table name.
    #[must_use]
    pub fn with_link_table(mut self, link_table: impl Into<String>) -> Self {
        self.link_table = Some(link_table.into());
        self
    }

    /// Returns the link table, falling back to `books_<table>_link`.
    #[must_use]
    pub fn link_table(&self) -> String {
        self.link_table
            .clone()
            .unwrap_or_else(|| default_link_table(&self.table))
    }

    /// Returns the column that identifies the book in a one-to-one table.
    #[must_use]
    pub fn book_id_column(&self) -> &'static str {
        if self.table == BOOKS_TABLE {
            BOOKS_ID_COLUMN
        } else {
            BOOK_COLUMN
        }
    }

    /// Validates this field in isolation.
    pub fn validate(&self) -> FolioResult<()> {
        if self.name.trim().is_empty() {
            return Err(FolioError::invalid_config("field name must not be empty"));
        }

        if matches!(
            self.kind,
            TableKind::OneToOne | TableKind::ManyToOne | TableKind::ManyToMany
        ) && (self.table.is_empty() || self.column.is_empty())
        {
            return Err(FolioError::invalid_config(format!(
                "field '{}' needs both table and column",
                self.name
            )));
        }

        if self.kind.has_link_table()
            && self.link_column.as_deref().map_or(true, str::is_empty)
        {
            return Err(FolioError::invalid_config(format!(
                "field '{}' needs a link_column",
                self.name
            )));
        }

        Ok(())
    }
}

/// Catalog configuration: every field the registry materializes.
///
/// # Example
///
/// ```rust
/// use folio_common::config::{CatalogConfig, TableKind};
///
/// let config = CatalogConfig::from_toml_str(r#"
///     [[fields]]
///     name = "tags"
///     kind = "many_to_many"
///     table = "tags"
///     column = "name"
///     link_column = "tag"
/// "#).unwrap();
///
/// assert_eq!(config.fields[0].kind, TableKind::ManyToMany);
/// assert_eq!(config.fields[0].link_table(), "books_tags_link");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Fields in registration order.
    #[serde(default)]
    pub fields: Vec<FieldMetadata>,

    /// Author sort-key settings.
    #[serde(default)]
    pub author_sort: AuthorSortConfig,
}

impl CatalogConfig {
    /// Creates a configuration from a list of fields.
    #[must_use]
    pub fn new(fields: Vec<FieldMetadata>) -> Self {
        Self {
            fields,
            author_sort: AuthorSortConfig::default(),
        }
    }

    /// The standard book catalog field set.
    #[must_use]
    pub fn standard() -> Self {
        let books = |name: &str, column: &str| FieldMetadata::one_to_one(name, BOOKS_TABLE, column);

        Self::new(vec![
            books("title", "title"),
            books("sort", "sort"),
            books("timestamp", "timestamp").with_datatype(SemanticType::Timestamp),
            books("pubdate", "pubdate").with_datatype(SemanticType::Timestamp),
            books("last_modified", "last_modified").with_datatype(SemanticType::Timestamp),
            books("uuid", "uuid"),
            books("path", "path"),
            books("has_cover", "has_cover").with_datatype(SemanticType::Boolean),
            books("series_index", "series_index"),
            books("author_sort", "author_sort"),
            FieldMetadata::one_to_one("comments", "comments", "text").with_datatype(SemanticType::Text),
            FieldMetadata::size(),
            FieldMetadata::authors(),
            FieldMetadata::many_to_many("tags", "tags", "name", "tag"),
            FieldMetadata::many_to_one("series", "series", "name", "series"),
            FieldMetadata::many_to_one("publisher", "publishers", "name", "publisher"),
            FieldMetadata::many_to_one("rating", "ratings", "rating", "rating"),
            FieldMetadata::many_to_many("languages", "languages", "lang_code", "lang_code"),
            FieldMetadata::formats(),
            FieldMetadata::identifiers(),
        ])
    }

    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(text: &str) -> FolioResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> FolioResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Returns the metadata of the named field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> FolioResult<()> {
        let mut names = HashSet::new();
        let mut singletons = HashSet::new();

        for field in &self.fields {
            field.validate()?;

            if !names.insert(field.name.as_str()) {
                return Err(FolioError::invalid_config(format!(
                    "duplicate field '{}'",
                    field.name
                )));
            }

            if field.kind.is_singleton() && !singletons.insert(field.kind) {
                return Err(FolioError::invalid_config(format!(
                    "more than one {:?} field",
                    field.kind
                )));
            }
        }

        Ok(())
    }
}
