//! End-to-end reload of the standard catalog from SQLite.

use chrono::{DateTime, Local};
use folio_cache::{DomainValue, FormatEntry, TableRegistry, TableState};
use folio_common::{AttributeId, BookId};
use folio_test::fixtures;
use folio_test::utils::init_tracing;

fn loaded() -> TableRegistry {
    init_tracing();
    let source = fixtures::catalog().unwrap();
    let registry = TableRegistry::standard().unwrap();
    registry.reload_all(&source).unwrap();
    registry
}

fn local(rfc3339: &str) -> DateTime<Local> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Local)
}

fn book(id: i64) -> BookId {
    BookId::new(id)
}

#[test]
fn test_every_table_loaded() {
    let registry = loaded();
    for table in registry.tables() {
        assert_eq!(table.state(), TableState::Loaded, "{}", table.name());
        assert_eq!(table.generation(), 1);
        assert_eq!(table.stats().builds(), 1);
    }
}

#[test]
fn test_one_to_one_fields() {
    let registry = loaded();

    let title = registry.snapshot("title").unwrap().unwrap();
    assert_eq!(title.values_for(book(2)), vec![DomainValue::text("Good Omens")]);

    let has_cover = registry.snapshot("has_cover").unwrap().unwrap();
    let has_cover = has_cover.as_one_to_one().unwrap();
    assert_eq!(has_cover.get(book(1)), Some(&DomainValue::Boolean(true)));
    assert_eq!(has_cover.get(book(2)), Some(&DomainValue::Boolean(false)));
    assert_eq!(has_cover.get(book(3)), None);

    let comments = registry.snapshot("comments").unwrap().unwrap();
    let comments = comments.as_one_to_one().unwrap();
    assert_eq!(comments.get(book(1)), Some(&DomainValue::text("<p>Desert planet.</p>")));
    assert_eq!(comments.get(book(2)), None);
    assert_eq!(comments.get(book(3)), None);
}

#[test]
fn test_timestamps_converted_to_local_zone() {
    let registry = loaded();

    let timestamp = registry.snapshot("timestamp").unwrap().unwrap();
    let timestamp = timestamp.as_one_to_one().unwrap();
    assert_eq!(
        timestamp.get(book(1)).and_then(DomainValue::as_timestamp),
        Some(&local("2024-03-01T10:15:30+00:00"))
    );
    assert_eq!(
        timestamp.get(book(2)).and_then(DomainValue::as_timestamp),
        Some(&local("2024-03-05T18:30:00Z"))
    );
    assert_eq!(timestamp.get(book(3)), None);

    let pubdate = registry.snapshot("pubdate").unwrap().unwrap();
    let pubdate = pubdate.as_one_to_one().unwrap();
    assert_eq!(
        pubdate.get(book(2)).and_then(DomainValue::as_timestamp),
        Some(&local("1990-05-01T00:00:00-05:00"))
    );

    let modified = registry.snapshot("last_modified").unwrap().unwrap();
    let modified = modified.as_one_to_one().unwrap();
    assert_eq!(
        modified.get(book(1)).and_then(DomainValue::as_timestamp),
        Some(&local("2024-03-02T09:00:00+02:00"))
    );
}

#[test]
fn test_size_is_largest_file() {
    let registry = loaded();
    let size = registry.snapshot("size").unwrap().unwrap();
    let size = size.as_one_to_one().unwrap();

    assert_eq!(size.get(book(1)), Some(&DomainValue::Integer(250)));
    assert_eq!(size.get(book(2)), Some(&DomainValue::Integer(300)));
    assert_eq!(size.get(book(3)), None);
}

#[test]
fn test_authors() {
    let registry = loaded();
    let snapshot = registry.snapshot("authors").unwrap().unwrap();
    let authors = snapshot.as_authors().unwrap();
    let a = AttributeId::new;

    assert_eq!(authors.get(book(2)), &[a(2), a(3)]);
    assert_eq!(
        snapshot.values_for(book(2)),
        vec![DomainValue::text("Terry Pratchett"), DomainValue::text("Neil Gaiman")]
    );
    assert_eq!(authors.books_for(a(1)), &[book(1)]);

    assert_eq!(authors.sort_of(a(1)), Some("Herbert, Frank"));
    assert_eq!(authors.sort_of(a(2)), Some("Pratchett, Terry"));
    assert_eq!(authors.sort_of(a(3)), Some("Gaiman, Neil"));
    assert_eq!(authors.link_of(a(1)), Some("https://example.org/herbert"));
    assert_eq!(authors.link_of(a(2)), None);

    assert_eq!(authors.name_of(a(4)), Some(&DomainValue::text("Smith,Jones")));
}

#[test]
fn test_many_to_many_fields() {
    let registry = loaded();
    let tags = registry.snapshot("tags").unwrap().unwrap();
    let tags = tags.as_many_to_many().unwrap();
    let a = AttributeId::new;

    assert_eq!(tags.get(book(1)), &[a(1), a(2)]);
    assert_eq!(tags.get(book(2)), &[a(3), a(2)]);
    assert_eq!(tags.books_for(a(2)), &[book(1), book(2)]);
    assert!(tags.get(book(3)).is_empty());
    assert_eq!(tags.id_of(a(4)), None);

    let languages = registry.snapshot("languages").unwrap().unwrap();
    assert_eq!(languages.values_for(book(3)), vec![DomainValue::text("fra")]);
}

#[test]
fn test_many_to_one_fields() {
    let registry = loaded();

    let series = registry.snapshot("series").unwrap().unwrap();
    let series = series.as_many_to_one().unwrap();
    assert_eq!(series.value_of(book(1)), Some(&DomainValue::text("Dune Chronicles")));
    assert_eq!(series.get(book(2)), None);

    let publisher = registry.snapshot("publisher").unwrap().unwrap();
    let publisher = publisher.as_many_to_one().unwrap();
    assert_eq!(publisher.books_for(AttributeId::new(2)), &[book(2)]);

    let rating = registry.snapshot("rating").unwrap().unwrap();
    assert_eq!(rating.values_for(book(1)), vec![DomainValue::Integer(10)]);
}

#[test]
fn test_formats_in_file_order() {
    let registry = loaded();
    let snapshot = registry.snapshot("formats").unwrap().unwrap();
    let formats = snapshot.as_formats().unwrap();

    assert_eq!(
        formats.get(book(1)),
        &[
            FormatEntry::new("EPUB", "Dune - Frank Herbert"),
            FormatEntry::new("PDF", "Dune - Frank Herbert"),
            FormatEntry::new("MOBI", "Dune - Frank Herbert"),
        ]
    );
    assert_eq!(formats.formats_of(book(2)), vec!["EPUB"]);
    assert_eq!(formats.books_for("EPUB"), &[book(1), book(2)]);
    assert!(formats.get(book(3)).is_empty());
}

#[test]
fn test_identifiers() {
    let registry = loaded();
    let snapshot = registry.snapshot("identifiers").unwrap().unwrap();
    let identifiers = snapshot.as_identifiers().unwrap();

    assert_eq!(identifiers.value_of(book(1), "goodreads"), Some("234225"));
    assert_eq!(identifiers.books_for("isbn"), &[book(1), book(2)]);
    assert!(identifiers.get(book(3)).is_empty());
    assert_eq!(
        snapshot.values_for(book(2)),
        vec![DomainValue::text("isbn:9780060853983")]
    );
}
