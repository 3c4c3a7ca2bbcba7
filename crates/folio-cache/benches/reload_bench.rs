//! Table build benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_cache::{BuildContext, MemorySource, RawValue, Row, Table, ValueAdapters};
use folio_common::{AttributeId, AuthorSortConfig, BookId, FieldMetadata};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BOOKS: i64 = 10_000;
const TAGS: i64 = 500;

fn pair(a: i64, b: impl Into<RawValue>) -> Row {
    Row::from(vec![RawValue::from(a), b.into()])
}

fn tags_source() -> MemorySource {
    let mut rng = StdRng::seed_from_u64(42);
    let ids = (1..=TAGS).map(|i| pair(i, format!("tag-{i}"))).collect();
    let links = (1..=BOOKS)
        .flat_map(|book| {
            let count = rng.gen_range(1..=5);
            (0..count)
                .map(|_| pair(book, rng.gen_range(1..=TAGS)))
                .collect::<Vec<_>>()
        })
        .collect();

    MemorySource::new()
        .with_rows("SELECT id, name FROM tags", ids)
        .with_rows("SELECT book, tag FROM books_tags_link", links)
}

fn many_to_many_reload_benchmark(c: &mut Criterion) {
    let source = tags_source();
    let adapters = ValueAdapters::new();
    let author_sort = AuthorSortConfig::default();
    let ctx = BuildContext::new(&source, &adapters, &author_sort);
    let table = Table::new(FieldMetadata::many_to_many("tags", "tags", "name", "tag"));

    c.bench_function("many_to_many_reload_10000", |b| {
        b.iter(|| black_box(table.reload(&ctx).map(|s| s.book_count())))
    });
}

fn many_to_many_lookup_benchmark(c: &mut Criterion) {
    let source = tags_source();
    let adapters = ValueAdapters::new();
    let author_sort = AuthorSortConfig::default();
    let ctx = BuildContext::new(&source, &adapters, &author_sort);
    let table = Table::new(FieldMetadata::many_to_many("tags", "tags", "name", "tag"));
    if table.reload(&ctx).is_err() {
        return;
    }

    c.bench_function("many_to_many_lookup_10000", |b| {
        b.iter(|| {
            let Some(snapshot) = table.snapshot() else {
                return 0;
            };
            let Some(tags) = snapshot.as_many_to_many() else {
                return 0;
            };
            let mut linked = 0;
            for book in 1..=BOOKS {
                linked += tags.get(BookId::new(book)).len();
            }
            for tag in 1..=TAGS {
                linked += tags.books_for(AttributeId::new(tag)).len();
            }
            black_box(linked)
        })
    });
}

criterion_group!(
    benches,
    many_to_many_reload_benchmark,
    many_to_many_lookup_benchmark,
);
criterion_main!(benches);
