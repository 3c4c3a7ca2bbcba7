//! Row fetching and cell extraction shared by the table builds.

use folio_common::error::{FolioError, FolioResult};
use folio_common::types::{AttributeId, BookId};
use tracing::debug;

use crate::source::RowSource;
use crate::value::RawValue;

/// Executes `query` and checks every row has exactly `N` columns.
pub(crate) fn fetch<const N: usize>(
    source: &dyn RowSource,
    field: &str,
    query: &str,
) -> FolioResult<Vec<[RawValue; N]>> {
    let rows = source.execute(query)?;
    debug!(field, query, rows = rows.len(), "fetched source rows");

    rows.into_iter()
        .map(|row| {
            row.into_array::<N>().map_err(|row| FolioError::MalformedRow {
                table: field.to_string(),
                query: query.to_string(),
                expected: N,
                actual: row.len(),
            })
        })
        .collect()
}

fn integer_cell(field: &str, column: usize, value: &RawValue) -> FolioResult<i64> {
    value.as_i64().ok_or_else(|| FolioError::UnexpectedValue {
        table: field.to_string(),
        column,
        expected: "integer".to_string(),
        actual: value.type_name().to_string(),
    })
}

/// Reads a book id cell.
pub(crate) fn book_id(field: &str, column: usize, value: &RawValue) -> FolioResult<BookId> {
    integer_cell(field, column, value).map(BookId::new)
}

/// Reads an attribute id cell.
pub(crate) fn attribute_id(field: &str, column: usize, value: &RawValue) -> FolioResult<AttributeId> {
    integer_cell(field, column, value).map(AttributeId::new)
}

/// Reads a text cell, treating NULL as absent.
pub(crate) fn optional_text(
    field: &str,
    column: usize,
    value: RawValue,
) -> FolioResult<Option<String>> {
    match value {
        RawValue::Null => Ok(None),
        RawValue::Text(s) => Ok(Some(s)),
        other => Err(FolioError::UnexpectedValue {
            table: field.to_string(),
            column,
            expected: "text".to_string(),
            actual: other.type_name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crate::value::Row;
    use folio_common::error::ErrorCode;

    #[test]
    fn test_fetch_checks_arity() {
        let source = MemorySource::new().with_rows(
            "q",
            vec![
                Row::from(vec![RawValue::from(1), RawValue::from("a")]),
                Row::from(vec![RawValue::from(2)]),
            ],
        );
        let err = fetch::<2>(&source, "tags", "q").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedRow);
    }

    #[test]
    fn test_cells() {
        assert_eq!(book_id("f", 0, &RawValue::from(7)).unwrap(), BookId::new(7));
        let err = attribute_id("f", 1, &RawValue::from("7")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnexpectedValue);

        assert_eq!(optional_text("f", 1, RawValue::Null).unwrap(), None);
        assert_eq!(
            optional_text("f", 1, RawValue::from("EPUB")).unwrap().as_deref(),
            Some("EPUB")
        );
        assert!(optional_text("f", 1, RawValue::from(3)).is_err());
    }
}
