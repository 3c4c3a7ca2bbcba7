//! Surname-first sort keys for author names.

use folio_common::config::{AuthorSortConfig, AuthorSortMethod};

/// Derives the sort key of an author name.
///
/// `"John Smith"` becomes `"Smith, John"`; honorific prefixes are dropped,
/// generational suffixes are kept at the end, and single-word or corporate
/// names are returned unchanged.
///
/// # Example
///
/// ```rust
/// use folio_cache::author_to_author_sort;
/// use folio_common::config::AuthorSortConfig;
///
/// let config = AuthorSortConfig::default();
/// assert_eq!(author_to_author_sort("Dr. John Smith Jr.", &config), "Smith, John Jr.");
/// assert_eq!(author_to_author_sort("Jones", &config), "Jones");
/// ```
pub fn author_to_author_sort(author: &str, config: &AuthorSortConfig) -> String {
    if author.is_empty() {
        return String::new();
    }

    let stripped = remove_bracketed_text(author);
    let mut tokens: Vec<&str> = stripped.split_whitespace().collect();
    if tokens.len() < 2 {
        return author.to_string();
    }

    let mut method = config.method;
    let copy_words = lowercase_set(&config.copy_words, false);
    if tokens
        .iter()
        .any(|t| copy_words.contains(&t.to_lowercase()))
    {
        method = AuthorSortMethod::Copy;
    }
    if method == AuthorSortMethod::Copy {
        return author.to_string();
    }

    let prefixes = lowercase_set(&config.prefixes, true);
    while let Some(first) = tokens.first() {
        if prefixes.contains(&first.to_lowercase()) {
            tokens.remove(0);
        } else {
            break;
        }
    }
    if tokens.is_empty() {
        return author.to_string();
    }

    let suffixes = lowercase_set(&config.suffixes, true);
    let mut suffix_tokens = Vec::new();
    while let Some(last) = tokens.last() {
        if suffixes.contains(&last.to_lowercase()) {
            suffix_tokens.insert(0, *last);
            tokens.pop();
        } else {
            break;
        }
    }
    if tokens.is_empty() {
        return author.to_string();
    }

    if method == AuthorSortMethod::Comma && tokens.iter().any(|t| t.contains(',')) {
        return author.to_string();
    }

    let name_count = tokens.len();
    let mut parts: Vec<String> = Vec::with_capacity(name_count + 1);
    parts.push(tokens[name_count - 1].to_string());
    parts.extend(tokens[..name_count - 1].iter().map(|t| (*t).to_string()));
    if !suffix_tokens.is_empty() {
        parts.push(suffix_tokens.join(" "));
    }
    if method != AuthorSortMethod::NoComma && name_count > 1 {
        parts[0].push(',');
    }
    parts.join(" ")
}

fn lowercase_set(words: &[String], with_period: bool) -> Vec<String> {
    let mut set: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    if with_period {
        set.extend(words.iter().map(|w| format!("{}.", w.to_lowercase())));
    }
    set
}

/// Removes text enclosed in `()`, `[]` or `{}`, including the brackets.
///
/// Nesting is tracked per bracket kind; unmatched closing brackets are
/// dropped.
pub fn remove_bracketed_text(src: &str) -> String {
    const OPENERS: [char; 3] = ['(', '[', '{'];
    const CLOSERS: [char; 3] = [')', ']', '}'];

    let mut depth = [0usize; 3];
    let mut out = String::with_capacity(src.len());

    for ch in src.chars() {
        if let Some(i) = OPENERS.iter().position(|&c| c == ch) {
            depth[i] += 1;
        } else if let Some(i) = CLOSERS.iter().position(|&c| c == ch) {
            depth[i] = depth[i].saturating_sub(1);
        } else if depth.iter().all(|&d| d == 0) {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort(name: &str) -> String {
        author_to_author_sort(name, &AuthorSortConfig::default())
    }

    #[test]
    fn test_invert() {
        assert_eq!(sort("John Smith"), "Smith, John");
        assert_eq!(sort("John Ronald Reuel Tolkien"), "Tolkien, John Ronald Reuel");
    }

    #[test]
    fn test_single_token_and_empty() {
        assert_eq!(sort("Jones"), "Jones");
        assert_eq!(sort(""), "");
        assert_eq!(sort("Homer (poet)"), "Homer (poet)");
    }

    #[test]
    fn test_prefixes_and_suffixes() {
        assert_eq!(sort("Dr. John Smith Jr."), "Smith, John Jr.");
        assert_eq!(sort("Mr John Smith"), "Smith, John");
        assert_eq!(sort("Martin Luther King Jr. III"), "King, Martin Luther Jr. III");
        assert_eq!(sort("Dr. Smith"), "Smith");
        assert_eq!(sort("Dr. Prof."), "Dr. Prof.");
    }

    #[test]
    fn test_copy_words() {
        assert_eq!(sort("Acme Corporation"), "Acme Corporation");
        assert_eq!(sort("The Chess Club"), "The Chess Club");
    }

    #[test]
    fn test_brackets_removed_before_split() {
        assert_eq!(sort("John Smith (editor)"), "Smith, John");
        assert_eq!(remove_bracketed_text("a (b [c]) d] e"), "a  d e");
    }

    #[test]
    fn test_methods() {
        let nocomma = AuthorSortConfig::with_method(AuthorSortMethod::NoComma);
        assert_eq!(author_to_author_sort("John Smith", &nocomma), "Smith John");

        let copy = AuthorSortConfig::with_method(AuthorSortMethod::Copy);
        assert_eq!(author_to_author_sort("John Smith", &copy), "John Smith");

        let comma = AuthorSortConfig::with_method(AuthorSortMethod::Comma);
        assert_eq!(author_to_author_sort("Smith, John", &comma), "Smith, John");
        assert_eq!(author_to_author_sort("John Smith", &comma), "Smith, John");
    }
}
