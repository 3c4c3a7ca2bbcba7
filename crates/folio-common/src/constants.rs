//! Well-known names shared across folio.

/// Name of the primary books table.
pub const BOOKS_TABLE: &str = "books";

/// Id column of the books table.
pub const BOOKS_ID_COLUMN: &str = "id";

/// Book reference column of every per-book and link table.
pub const BOOK_COLUMN: &str = "book";

/// Separator used by the legacy storage encoding to join authors in one name.
pub const LEGACY_AUTHOR_SEPARATOR: char = '|';

/// Separator used for display in place of [`LEGACY_AUTHOR_SEPARATOR`].
pub const DISPLAY_AUTHOR_SEPARATOR: char = ',';

/// Prefix of the default link table name (`books_<table>_link`).
pub const LINK_TABLE_PREFIX: &str = "books_";

/// Suffix of the default link table name (`books_<table>_link`).
pub const LINK_TABLE_SUFFIX: &str = "_link";

/// Builds the default link table name for an attribute table.
#[must_use]
pub fn default_link_table(table: &str) -> String {
    format!("{LINK_TABLE_PREFIX}{table}{LINK_TABLE_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_link_table() {
        assert_eq!(default_link_table("tags"), "books_tags_link");
        assert_eq!(default_link_table("publishers"), "books_publishers_link");
    }
}
