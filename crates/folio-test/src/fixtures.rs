//! A three-book catalog in the standard schema.
//!
//! | id | title | authors | formats (size) |
//! |---|---|---|---|
//! | 1 | Dune | Frank Herbert | EPUB (100), PDF (250), MOBI (50) |
//! | 2 | Good Omens | Terry Pratchett, Neil Gaiman | EPUB (120), one file without a format (300) |
//! | 3 | Collected Letters | `Smith\|Jones` (legacy encoding) | none |

use folio_cache::SqliteSource;
use folio_common::error::{FolioError, FolioResult};
use rusqlite::Connection;

/// Schema of the standard catalog tables.
pub const SCHEMA: &str = "
CREATE TABLE books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL DEFAULT 'Unknown',
    sort TEXT,
    timestamp TEXT,
    pubdate TEXT,
    last_modified TEXT,
    uuid TEXT,
    path TEXT NOT NULL DEFAULT '',
    has_cover INTEGER,
    series_index REAL NOT NULL DEFAULT 1.0,
    author_sort TEXT
);
CREATE TABLE data (
    id INTEGER PRIMARY KEY,
    book INTEGER NOT NULL,
    format TEXT,
    uncompressed_size INTEGER NOT NULL,
    name TEXT
);
CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL, sort TEXT, link TEXT NOT NULL DEFAULT '');
CREATE TABLE books_authors_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, author INTEGER NOT NULL);
CREATE TABLE tags (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE books_tags_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, tag INTEGER NOT NULL);
CREATE TABLE series (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE books_series_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, series INTEGER NOT NULL);
CREATE TABLE publishers (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE books_publishers_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, publisher INTEGER NOT NULL);
CREATE TABLE ratings (id INTEGER PRIMARY KEY, rating INTEGER);
CREATE TABLE books_ratings_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, rating INTEGER NOT NULL);
CREATE TABLE languages (id INTEGER PRIMARY KEY, lang_code TEXT NOT NULL);
CREATE TABLE books_languages_link (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, lang_code INTEGER NOT NULL);
CREATE TABLE identifiers (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, type TEXT, val TEXT);
CREATE TABLE comments (id INTEGER PRIMARY KEY, book INTEGER NOT NULL, text TEXT);
";

/// Rows of the three-book catalog.
pub const SEED: &str = "
INSERT INTO books (id, title, sort, timestamp, pubdate, last_modified, uuid, path, has_cover, series_index, author_sort) VALUES
    (1, 'Dune', 'Dune', '2024-03-01 10:15:30+00:00', '1965-08-01T00:00:00+00:00', '2024-03-02 09:00:00.123456+02:00',
        'c3a5f0b2-1111-4c6e-9d0e-000000000001', 'Frank Herbert/Dune (1)', 1, 1.0, 'Herbert, Frank'),
    (2, 'Good Omens', 'Good Omens', '2024-03-05T18:30:00Z', '1990-05-01 00:00:00-05:00', NULL,
        'c3a5f0b2-1111-4c6e-9d0e-000000000002', 'Terry Pratchett/Good Omens (2)', 0, 1.0, 'Pratchett, Terry & Gaiman, Neil'),
    (3, 'Collected Letters', 'Collected Letters', '', NULL, NULL,
        'c3a5f0b2-1111-4c6e-9d0e-000000000003', 'Smith/Collected Letters (3)', NULL, 1.0, 'Smith');

INSERT INTO data (id, book, format, uncompressed_size, name) VALUES
    (1, 1, 'EPUB', 100, 'Dune - Frank Herbert'),
    (2, 1, 'PDF', 250, 'Dune - Frank Herbert'),
    (3, 1, 'MOBI', 50, 'Dune - Frank Herbert'),
    (4, 2, 'EPUB', 120, 'Good Omens - Terry Pratchett'),
    (5, 2, NULL, 300, 'stray');

INSERT INTO authors (id, name, sort, link) VALUES
    (1, 'Frank Herbert', NULL, 'https://example.org/herbert'),
    (2, 'Terry Pratchett', 'Pratchett, Terry', ''),
    (3, 'Neil Gaiman', '', ''),
    (4, 'Smith|Jones', NULL, '');
INSERT INTO books_authors_link (book, author) VALUES (1, 1), (2, 2), (2, 3), (3, 4);

INSERT INTO tags (id, name) VALUES (1, 'Science Fiction'), (2, 'Classic'), (3, 'Fantasy'), (4, '');
INSERT INTO books_tags_link (book, tag) VALUES (1, 1), (1, 2), (2, 3), (2, 2);

INSERT INTO series (id, name) VALUES (1, 'Dune Chronicles');
INSERT INTO books_series_link (book, series) VALUES (1, 1);

INSERT INTO publishers (id, name) VALUES (1, 'Chilton'), (2, 'Gollancz');
INSERT INTO books_publishers_link (book, publisher) VALUES (1, 1), (2, 2);

INSERT INTO ratings (id, rating) VALUES (1, 10), (2, 8);
INSERT INTO books_ratings_link (book, rating) VALUES (1, 1), (2, 2);

INSERT INTO languages (id, lang_code) VALUES (1, 'eng'), (2, 'fra');
INSERT INTO books_languages_link (book, lang_code) VALUES (1, 1), (2, 1), (3, 2);

INSERT INTO identifiers (book, type, val) VALUES
    (1, 'isbn', '9780441013593'),
    (1, 'goodreads', '234225'),
    (2, 'isbn', '9780060853983'),
    (3, 'isbn', NULL);

INSERT INTO comments (book, text) VALUES (1, '<p>Desert planet.</p>'), (2, NULL);
";

/// Creates the schema and seeds the catalog on `conn`.
pub fn seed(conn: &Connection) -> FolioResult<()> {
    execute_batch(conn, SCHEMA)?;
    execute_batch(conn, SEED)
}

/// Runs `sql` on `conn`, reporting failures as source errors.
pub fn execute_batch(conn: &Connection, sql: &str) -> FolioResult<()> {
    conn.execute_batch(sql)
        .map_err(|e| FolioError::source_query("fixture", e.to_string()))
}

/// Opens an in-memory database seeded with the catalog.
pub fn catalog() -> FolioResult<SqliteSource> {
    let source = SqliteSource::open_in_memory()?;
    seed(&source.connection())?;
    Ok(source)
}

/// Opens an in-memory database with `books` rows `1..=count`, each titled
/// `title`.
pub fn books(count: i64, title: &str) -> FolioResult<SqliteSource> {
    let source = SqliteSource::open_in_memory()?;
    {
        let conn = source.connection();
        execute_batch(&conn, SCHEMA)?;
        conn.execute(
            "WITH RECURSIVE n(id) AS (SELECT 1 UNION ALL SELECT id + 1 FROM n WHERE id < ?1)
             INSERT INTO books (id, title) SELECT id, ?2 FROM n",
            rusqlite::params![count, title],
        )
        .map_err(|e| FolioError::source_query("fixture", e.to_string()))?;
    }
    Ok(source)
}
