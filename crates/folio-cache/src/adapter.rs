//! Conversion of raw stored values into domain values.
//!
//! [`ValueAdapters`] is a fixed registry keyed by [`SemanticType`], built
//! once and handed to every table build. A field without a registered
//! conversion passes values through unchanged.
//!
//! # Timestamps
//!
//! Textual timestamps go through two parsers:
//!
//! 1. A structured parser for the canonical stored layout
//!    `YYYY-MM-DD HH:MM:SS[.ffffff](+|-)HH:MM` (also `T` and `Z`). The
//!    instant is built with the explicit offset and converted to the local
//!    zone.
//! 2. When that fails, a flexible parser trying RFC 3339, RFC 2822, and a
//!    list of common layouts. Layouts without an offset are read as local
//!    time. Its failure is an adaptation error.
//!
//! Null and empty text adapt to `Null` without invoking either parser.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use folio_common::config::{FieldMetadata, SemanticType, TableKind};
use folio_common::constants::{DISPLAY_AUTHOR_SEPARATOR, LEGACY_AUTHOR_SEPARATOR};
use folio_common::error::{FolioError, FolioResult};

use crate::value::{DomainValue, RawValue};

/// Why a single value could not be adapted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptFailure {
    /// The raw value, rendered as text.
    pub value: String,
    /// Reason for failure.
    pub reason: String,
}

impl AdaptFailure {
    fn new(value: &RawValue, reason: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// A pure conversion from a raw value to its domain value.
pub type AdaptFn = fn(RawValue) -> Result<DomainValue, AdaptFailure>;

/// Registry of value conversions keyed by semantic type.
#[derive(Debug, Clone)]
pub struct ValueAdapters {
    by_type: HashMap<SemanticType, AdaptFn>,
    legacy_authors: AdaptFn,
}

impl Default for ValueAdapters {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueAdapters {
    /// Creates the standard registry.
    pub fn new() -> Self {
        let mut by_type: HashMap<SemanticType, AdaptFn> = HashMap::new();
        by_type.insert(SemanticType::Timestamp, adapt_timestamp);
        by_type.insert(SemanticType::Boolean, adapt_boolean);

        Self {
            by_type,
            legacy_authors: adapt_legacy_author_name,
        }
    }

    /// Returns the conversion registered for a semantic type, or identity.
    pub fn for_type(&self, datatype: SemanticType) -> AdaptFn {
        self.by_type.get(&datatype).copied().unwrap_or(adapt_identity)
    }

    /// Returns the conversion for a field's value (or name) column.
    ///
    /// The authors name column always uses the legacy separator
    /// normalization, regardless of its declared type.
    pub fn adapter_for<'a>(&self, field: &'a FieldMetadata) -> FieldAdapter<'a> {
        let adapt = if field.kind == TableKind::Authors {
            self.legacy_authors
        } else {
            self.for_type(field.datatype)
        };

        FieldAdapter {
            field: &field.name,
            adapt,
        }
    }
}

/// The conversion bound to one field, reporting failures against it.
#[derive(Debug, Clone, Copy)]
pub struct FieldAdapter<'a> {
    field: &'a str,
    adapt: AdaptFn,
}

impl<'a> FieldAdapter<'a> {
    /// Creates an adapter for `field` using `adapt`.
    pub fn new(field: &'a str, adapt: AdaptFn) -> Self {
        Self { field, adapt }
    }

    /// Returns the field name.
    pub fn field(&self) -> &str {
        self.field
    }

    /// Converts one raw value.
    pub fn adapt(&self, raw: RawValue) -> FolioResult<DomainValue> {
        (self.adapt)(raw).map_err(|failure| FolioError::Adaptation {
            field: self.field.to_string(),
            value: failure.value,
            reason: failure.reason,
        })
    }
}

/// Passes the value through unchanged.
pub fn adapt_identity(raw: RawValue) -> Result<DomainValue, AdaptFailure> {
    Ok(DomainValue::from(raw))
}

/// Coerces any non-null value to its truthiness.
pub fn adapt_boolean(raw: RawValue) -> Result<DomainValue, AdaptFailure> {
    if raw.is_null() {
        return Ok(DomainValue::Null);
    }
    Ok(DomainValue::Boolean(raw.is_truthy()))
}

/// Replaces the legacy in-name author separator with the display one.
pub fn adapt_legacy_author_name(raw: RawValue) -> Result<DomainValue, AdaptFailure> {
    if !raw.is_truthy() {
        return Ok(DomainValue::Null);
    }
    match raw {
        RawValue::Text(name) => Ok(DomainValue::Text(
            name.replace(LEGACY_AUTHOR_SEPARATOR, &DISPLAY_AUTHOR_SEPARATOR.to_string()),
        )),
        other => Err(AdaptFailure::new(&other, "author name must be text")),
    }
}

/// Parses a textual timestamp into a local-zone instant.
pub fn adapt_timestamp(raw: RawValue) -> Result<DomainValue, AdaptFailure> {
    let text = match raw {
        RawValue::Null => return Ok(DomainValue::Null),
        RawValue::Text(ref s) if s.is_empty() => return Ok(DomainValue::Null),
        RawValue::Text(s) => s,
        other => return Err(AdaptFailure::new(&other, "timestamp must be text")),
    };

    if let Some(instant) = parse_structured(text.trim()).and_then(|p| p.to_local()) {
        return Ok(DomainValue::Timestamp(instant));
    }

    parse_flexible(&text)
        .map(DomainValue::Timestamp)
        .ok_or_else(|| AdaptFailure {
            value: text.clone(),
            reason: "unrecognized timestamp".to_string(),
        })
}

/// Fields of a timestamp read by [`parse_structured`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredTimestamp {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Day of month.
    pub day: u32,
    /// Hour, 0-23.
    pub hour: u32,
    /// Minute.
    pub minute: u32,
    /// Second.
    pub second: u32,
    /// Offset east of UTC in seconds.
    pub offset_secs: i32,
}

impl StructuredTimestamp {
    /// Builds the instant at the explicit offset and converts it to the
    /// local zone. Returns `None` for out-of-range fields.
    pub fn to_local(self) -> Option<DateTime<Local>> {
        let offset = FixedOffset::east_opt(self.offset_secs)?;
        let naive = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)?;
        let instant = offset.from_local_datetime(&naive).single()?;
        Some(instant.with_timezone(&Local))
    }
}

/// Reads `YYYY-MM-DD[ T]HH:MM:SS[.f*](Z|(+|-)HH[:]MM)`.
///
/// Fractional seconds are skipped. A missing offset is a parse failure so
/// the caller falls through to the flexible parser.
pub fn parse_structured(text: &str) -> Option<StructuredTimestamp> {
    let mut cursor = Cursor::new(text.as_bytes());

    let year = cursor.digits(4)?;
    cursor.expect(b'-')?;
    let month = cursor.digits(2)?;
    cursor.expect(b'-')?;
    let day = cursor.digits(2)?;
    match cursor.next()? {
        b' ' | b'T' => {}
        _ => return None,
    }
    let hour = cursor.digits(2)?;
    cursor.expect(b':')?;
    let minute = cursor.digits(2)?;
    cursor.expect(b':')?;
    let second = cursor.digits(2)?;

    if cursor.peek() == Some(b'.') {
        cursor.next();
        while cursor.peek().is_some_and(|b| b.is_ascii_digit()) {
            cursor.next();
        }
    }

    let offset_secs = match cursor.next()? {
        b'Z' => 0,
        sign @ (b'+' | b'-') => {
            let hours = cursor.digits(2)?;
            if cursor.peek() == Some(b':') {
                cursor.next();
            }
            let minutes = cursor.digits(2)?;
            let secs = i32::try_from(hours * 3600 + minutes * 60).ok()?;
            if sign == b'-' {
                -secs
            } else {
                secs
            }
        }
        _ => return None,
    };

    if !cursor.is_done() {
        return None;
    }

    Some(StructuredTimestamp {
        year: i32::try_from(year).ok()?,
        month,
        day,
        hour,
        minute,
        second,
        offset_secs,
    })
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn expect(&mut self, want: u8) -> Option<()> {
        (self.next()? == want).then_some(())
    }

    fn digits(&mut self, count: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let b = self.next()?;
            if !b.is_ascii_digit() {
                return None;
            }
            value = value * 10 + u32::from(b - b'0');
        }
        Some(value)
    }

    fn is_done(&self) -> bool {
        self.pos == self.bytes.len()
    }
}

const OFFSET_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%d %b %Y %H:%M:%S %z",
];

const NAIVE_DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
];

const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%d %b %Y", "%d %B %Y", "%b %d, %Y", "%B %d, %Y", "%b %d %Y",
    "%B %d %Y",
];

/// Parses the common timestamp layouts, reading offset-free layouts as
/// local time.
pub fn parse_flexible(text: &str) -> Option<DateTime<Local>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Local));
    }
    for layout in OFFSET_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(text, layout) {
            return Some(dt.with_timezone(&Local));
        }
    }
    for layout in NAIVE_DATETIME_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
            return local_from_naive(&naive);
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
            return local_from_naive(&date.and_hms_opt(0, 0, 0)?);
        }
    }
    None
}

fn local_from_naive(naive: &NaiveDateTime) -> Option<DateTime<Local>> {
    // A wall time inside a DST gap has no local instant.
    Local.from_local_datetime(naive).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, datatype: SemanticType) -> FieldMetadata {
        FieldMetadata::one_to_one(name, "books", name).with_datatype(datatype)
    }

    #[test]
    fn test_empty_timestamp_is_null() {
        assert_eq!(adapt_timestamp(RawValue::Null), Ok(DomainValue::Null));
        assert_eq!(adapt_timestamp(RawValue::from("")), Ok(DomainValue::Null));
    }

    #[test]
    fn test_structured_timestamp_matches_reference() {
        let value = adapt_timestamp(RawValue::from("2011-03-04 05:06:07+05:30")).unwrap();
        let expected = DateTime::parse_from_rfc3339("2011-03-04T05:06:07+05:30")
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(value.as_timestamp(), Some(&expected));
    }

    #[test]
    fn test_parse_structured_fields() {
        let parsed = parse_structured("2020-12-31T23:59:58.123456-04:00").unwrap();
        assert_eq!(
            parsed,
            StructuredTimestamp {
                year: 2020,
                month: 12,
                day: 31,
                hour: 23,
                minute: 59,
                second: 58,
                offset_secs: -4 * 3600,
            }
        );
        assert_eq!(parse_structured("2020-01-02 03:04:05Z").unwrap().offset_secs, 0);
        assert_eq!(parse_structured("2020-01-02 03:04:05+0130").unwrap().offset_secs, 5400);
    }

    #[test]
    fn test_parse_structured_rejects() {
        assert!(parse_structured("2020-01-02 03:04:05").is_none());
        assert!(parse_structured("2020-01-02").is_none());
        assert!(parse_structured("2020-01-02 03:04:05+00:00 extra").is_none());
        assert!(parse_structured("20-01-02 03:04:05+00:00").is_none());
    }

    #[test]
    fn test_invalid_fields_fall_through() {
        // Month 13 passes the structured reader but not construction; the
        // flexible parser rejects it too.
        let parsed = parse_structured("2020-13-02 03:04:05+00:00").unwrap();
        assert!(parsed.to_local().is_none());
        let err = adapt_timestamp(RawValue::from("2020-13-02 03:04:05+00:00")).unwrap_err();
        assert_eq!(err.reason, "unrecognized timestamp");
    }

    #[test]
    fn test_flexible_fallback() {
        let value = adapt_timestamp(RawValue::from("Tue, 1 Jul 2003 10:52:37 +0200")).unwrap();
        let expected = DateTime::parse_from_rfc2822("Tue, 1 Jul 2003 10:52:37 +0200")
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(value.as_timestamp(), Some(&expected));

        let local = adapt_timestamp(RawValue::from("2003-07-01")).unwrap();
        let expected = Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2003, 7, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )
            .earliest()
            .unwrap();
        assert_eq!(local.as_timestamp(), Some(&expected));
    }

    #[test]
    fn test_unparseable_timestamp_errors() {
        let adapters = ValueAdapters::new();
        let field = meta("pubdate", SemanticType::Timestamp);
        let err = adapters
            .adapter_for(&field)
            .adapt(RawValue::from("not a date"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot adapt value \"not a date\" for field 'pubdate': unrecognized timestamp"
        );
    }

    #[test]
    fn test_boolean() {
        assert_eq!(adapt_boolean(RawValue::Null), Ok(DomainValue::Null));
        assert_eq!(adapt_boolean(RawValue::Integer(1)), Ok(DomainValue::Boolean(true)));
        assert_eq!(adapt_boolean(RawValue::Integer(0)), Ok(DomainValue::Boolean(false)));
        assert_eq!(adapt_boolean(RawValue::from("")), Ok(DomainValue::Boolean(false)));
    }

    #[test]
    fn test_identity_for_text_and_unspecified() {
        let adapters = ValueAdapters::new();
        for datatype in [SemanticType::Text, SemanticType::Unspecified] {
            let field = meta("title", datatype);
            let adapter = adapters.adapter_for(&field);
            assert_eq!(
                adapter.adapt(RawValue::from("A|B")).unwrap(),
                DomainValue::text("A|B")
            );
            assert_eq!(adapter.adapt(RawValue::Null).unwrap(), DomainValue::Null);
        }
    }

    #[test]
    fn test_legacy_author_names() {
        let adapters = ValueAdapters::new();
        let field = FieldMetadata::authors();
        let adapter = adapters.adapter_for(&field);
        assert_eq!(
            adapter.adapt(RawValue::from("Smith|Jones")).unwrap(),
            DomainValue::text("Smith,Jones")
        );
        assert_eq!(adapter.adapt(RawValue::Null).unwrap(), DomainValue::Null);
        assert_eq!(adapter.adapt(RawValue::from("")).unwrap(), DomainValue::Null);
    }

    #[test]
    fn test_legacy_normalization_scoped_to_authors() {
        let adapters = ValueAdapters::new();
        let tags = FieldMetadata::many_to_many("tags", "tags", "name", "tag");
        assert_eq!(
            adapters.adapter_for(&tags).adapt(RawValue::from("a|b")).unwrap(),
            DomainValue::text("a|b")
        );

        let mut writers = FieldMetadata::authors();
        writers.name = "writers".to_string();
        assert_eq!(
            adapters.adapter_for(&writers).adapt(RawValue::from("a|b")).unwrap(),
            DomainValue::text("a,b")
        );
    }
}
