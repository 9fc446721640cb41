//! Flag declarations.

/// One declared flag.
///
/// A flag has a primary spelling (`--name`) and an optional alias (`-n`).
/// Either may be empty, but not both in any useful declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSpec {
    pub flag: String,
    pub alias: String,
    pub description: String,
    pub takes_value: bool,
    /// Value substituted when the flag is not given. Empty means no default.
    pub fallback: String,
}

impl FlagSpec {
    pub fn new(
        flag: impl Into<String>,
        alias: impl Into<String>,
        description: impl Into<String>,
        takes_value: bool,
    ) -> Self {
        Self {
            flag: flag.into(),
            alias: alias.into(),
            description: description.into(),
            takes_value,
            fallback: String::new(),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Whether `spelling` is this flag's primary name or alias.
    pub fn matches(&self, spelling: &str) -> bool {
        !spelling.is_empty() && (self.flag == spelling || self.alias == spelling)
    }

    /// The non-empty spellings, primary first.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        [self.flag.as_str(), self.alias.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
    }

    /// The spelling that is not `spelling`, if this flag has one.
    pub fn other(&self, spelling: &str) -> Option<&str> {
        let other = if self.flag == spelling {
            self.alias.as_str()
        } else if self.alias == spelling {
            self.flag.as_str()
        } else {
            return None;
        };
        (!other.is_empty()).then_some(other)
    }

    /// Primary spelling, or the alias when no primary is declared.
    pub fn display_name(&self) -> &str {
        if self.flag.is_empty() {
            &self.alias
        } else {
            &self.flag
        }
    }

    pub fn has_fallback(&self) -> bool {
        !self.fallback.is_empty()
    }
}

/// Ordered required and optional declarations.
///
/// Lookups scan `required` then `optional` in declaration order and the first
/// match wins. Duplicate spellings are accepted but logged, since a later
/// declaration can never be reached by lookup.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    required: Vec<FlagSpec>,
    optional: Vec<FlagSpec>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_required(&mut self, spec: FlagSpec) {
        self.warn_on_shadowed(&spec);
        self.required.push(spec);
    }

    pub fn add_optional(&mut self, spec: FlagSpec) {
        self.warn_on_shadowed(&spec);
        self.optional.push(spec);
    }

    pub fn required(&self) -> &[FlagSpec] {
        &self.required
    }

    pub fn optional(&self) -> &[FlagSpec] {
        &self.optional
    }

    /// All declarations, required first.
    pub fn iter(&self) -> impl Iterator<Item = &FlagSpec> {
        self.required.iter().chain(self.optional.iter())
    }

    /// Number of declared flags (required + optional).
    pub fn total(&self) -> usize {
        self.required.len() + self.optional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// First declaration using `spelling` as primary name or alias.
    pub fn find(&self, spelling: &str) -> Option<&FlagSpec> {
        self.iter().find(|spec| spec.matches(spelling))
    }

    pub fn declares(&self, spelling: &str) -> bool {
        self.find(spelling).is_some()
    }

    /// The other spelling of the declaration matching `spelling`.
    pub fn alternative(&self, spelling: &str) -> Option<&str> {
        self.find(spelling).and_then(|spec| spec.other(spelling))
    }

    fn warn_on_shadowed(&self, spec: &FlagSpec) {
        for spelling in spec.spellings() {
            if let Some(prev) = self.find(spelling) {
                tracing::warn!(
                    spelling,
                    previous = prev.display_name(),
                    "flag spelling declared twice; the first declaration wins"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut r = Registry::new();
        r.add_required(FlagSpec::new("--name", "-n", "Name", true));
        r.add_optional(FlagSpec::new("--verbose", "-v", "Verbose", false));
        r.add_optional(FlagSpec::new("--only-long", "", "No alias", false));
        r
    }

    #[test]
    fn find_matches_either_spelling() {
        let r = registry();
        assert_eq!(r.find("-n").map(|s| s.flag.as_str()), Some("--name"));
        assert_eq!(r.find("--verbose").map(|s| s.alias.as_str()), Some("-v"));
        assert!(r.find("--missing").is_none());
        assert!(r.find("").is_none());
        assert_eq!(r.total(), 3);
    }

    #[test]
    fn alternative_resolves_both_directions() {
        let r = registry();
        assert_eq!(r.alternative("--name"), Some("-n"));
        assert_eq!(r.alternative("-v"), Some("--verbose"));
        assert_eq!(r.alternative("--only-long"), None);
        assert_eq!(r.alternative("--missing"), None);
    }

    #[test]
    fn first_declaration_wins_on_duplicates() {
        let mut r = registry();
        r.add_optional(FlagSpec::new("--name", "-N", "Shadowed", false));
        let spec = r.find("--name").unwrap();
        assert!(spec.takes_value);
        assert_eq!(spec.alias, "-n");
        // The shadowed declaration is still reachable through its own alias.
        assert_eq!(r.find("-N").map(|s| s.description.as_str()), Some("Shadowed"));
    }

    #[test]
    fn display_name_falls_back_to_alias() {
        let spec = FlagSpec::new("", "-x", "alias only", false);
        assert_eq!(spec.display_name(), "-x");
        assert_eq!(spec.spellings().collect::<Vec<_>>(), vec!["-x"]);
        assert_eq!(spec.other("-x"), None);
    }
}
