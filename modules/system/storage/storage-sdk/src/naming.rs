//! Index and collection naming rules shared by the document-store backends.

use serde::{Deserialize, Serialize};

/// Characters that may never appear in an index or collection name.
pub const FORBIDDEN_CHARS: &[char] = &[
    '\\', '/', '*', '?', '"', '<', '>', '|', ' ', '\t', '\r', '\n', ',', '+', '#', ':', '%', '.',
    '&',
];

pub const DEFAULT_MAX_LENGTH: usize = 126;

/// Name validity rules.
///
/// A name is valid iff it is non-empty, at most `max_length` bytes long, has no
/// uppercase characters, and contains none of [`FORBIDDEN_CHARS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingRules {
    pub max_length: usize,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl NamingRules {
    #[must_use]
    pub fn is_valid_name(&self, name: &str) -> bool {
        !name.is_empty()
            && name.len() <= self.max_length
            && !name.chars().any(|c| c.is_uppercase() || FORBIDDEN_CHARS.contains(&c))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_lowercase_names() {
        let rules = NamingRules::default();
        for name in ["foo", "bar", "my-index_01", "internal"] {
            assert!(rules.is_valid_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_empty_and_uppercase() {
        let rules = NamingRules::default();
        assert!(!rules.is_valid_name(""));
        assert!(!rules.is_valid_name("Foo"));
        assert!(!rules.is_valid_name("foo\u{c9}"));
    }

    #[test]
    fn rejects_every_forbidden_character() {
        let rules = NamingRules::default();
        for c in FORBIDDEN_CHARS {
            let name = format!("ab{c}cd");
            assert!(!rules.is_valid_name(&name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn length_is_measured_in_bytes() {
        let rules = NamingRules { max_length: 4 };
        assert!(rules.is_valid_name("abcd"));
        assert!(!rules.is_valid_name("abcde"));
        // U+00E9 is two bytes in UTF-8
        assert!(!rules.is_valid_name("abc\u{e9}"));
    }

    #[test]
    fn default_limit_is_126_bytes() {
        let rules = NamingRules::default();
        assert!(rules.is_valid_name(&"a".repeat(126)));
        assert!(!rules.is_valid_name(&"a".repeat(127)));
    }
}
