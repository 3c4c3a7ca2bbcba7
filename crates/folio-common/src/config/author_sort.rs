//! Settings for deriving an author sort key from a display name.

use serde::{Deserialize, Serialize};

/// How an author name is turned into its sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorSortMethod {
    /// Surname first, followed by a comma: `"Smith, John"`.
    #[default]
    Invert,
    /// The name unchanged.
    Copy,
    /// Like `Invert`, but names that already contain a comma are copied.
    Comma,
    /// Surname first without the comma: `"Smith John"`.
    #[serde(rename = "nocomma")]
    NoComma,
}

/// Author sort-key configuration.
///
/// Word lists are compared case-insensitively. Prefixes and suffixes also
/// match with a trailing `.` appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorSortConfig {
    /// Transform applied to names.
    pub method: AuthorSortMethod,

    /// Honorifics dropped from the front of a name.
    /// Default: Mr, Mrs, Ms, Dr, Prof
    pub prefixes: Vec<String>,

    /// Generational and professional suffixes kept after the given names.
    /// Default: Jr, Sr, Inc, Ph.D, Phd, MD, M.D, I, II, III, IV, Junior, Senior
    pub suffixes: Vec<String>,

    /// Words marking a corporate name, which is always copied unchanged.
    /// Default: Corporation, Company, Co., Agency, Council, Committee, Inc.,
    /// Institute, Society, Club, Team
    pub copy_words: Vec<String>,
}

impl Default for AuthorSortConfig {
    fn default() -> Self {
        Self {
            method: AuthorSortMethod::Invert,
            prefixes: to_strings(&["Mr", "Mrs", "Ms", "Dr", "Prof"]),
            suffixes: to_strings(&[
                "Jr", "Sr", "Inc", "Ph.D", "Phd", "MD", "M.D", "I", "II", "III", "IV", "Junior",
                "Senior",
            ]),
            copy_words: to_strings(&[
                "Corporation",
                "Company",
                "Co.",
                "Agency",
                "Council",
                "Committee",
                "Inc.",
                "Institute",
                "Society",
                "Club",
                "Team",
            ]),
        }
    }
}

impl AuthorSortConfig {
    /// Creates a default configuration using the given method.
    #[must_use]
    pub fn with_method(method: AuthorSortMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}
