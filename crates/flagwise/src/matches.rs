//! Parsed flag values and non-flag tokens.

use std::collections::HashMap;

/// Values collected by a parse pass.
///
/// Keys are flag spellings as they appeared on the command line. After a
/// successful pass both the primary name and the alias of every given flag
/// resolve to the same value. An empty value means "present without value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    values: HashMap<String, String>,
    non_flags: Vec<String>,
}

impl Matches {
    /// Raw value stored under `spelling`.
    pub fn get(&self, spelling: &str) -> Option<&str> {
        self.values.get(spelling).map(|v| v.as_str())
    }

    /// Whether `spelling` itself is stored. Does not resolve aliases.
    pub fn contains(&self, spelling: &str) -> bool {
        self.values.contains_key(spelling)
    }

    /// Non-flag tokens in command-line order.
    pub fn non_flags(&self) -> &[String] {
        &self.non_flags
    }

    pub fn non_flag(&self, index: usize) -> Option<&str> {
        self.non_flags.get(index).map(|s| s.as_str())
    }

    /// Stored spellings and values, sorted by spelling.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.non_flags.is_empty()
    }
}

impl Matches {
    pub(crate) fn insert(&mut self, spelling: impl Into<String>, value: impl Into<String>) {
        self.values.insert(spelling.into(), value.into());
    }

    pub(crate) fn push_non_flag(&mut self, token: impl Into<String>) {
        self.non_flags.push(token.into());
    }
}
