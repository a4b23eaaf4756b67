//! Path-prefix rule sets
//!
//! A `RuleSet` holds the `Allow` or `Disallow` paths of a robots.txt group.
//! Matching is a literal prefix check on the raw path string; wildcards and
//! `$` anchors are not interpreted.

/// An append-only collection of path-prefix patterns
///
/// Patterns are never removed once added. The set is filled during the
/// directive build phase and queried many times afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    patterns: Vec<String>,
}

impl RuleSet {
    /// Creates an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a prefix pattern
    ///
    /// No validation is performed. An empty pattern is legal and matches every
    /// path, so callers must not add one unintentionally.
    pub fn add(&mut self, pattern: impl Into<String>) {
        self.patterns.push(pattern.into());
    }

    /// Checks whether any stored pattern is a literal prefix of `path`
    ///
    /// The comparison is byte-wise and not aware of path segments: `/a`
    /// matches `/a/b` and also `/abc`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_politeness::RuleSet;
    ///
    /// let mut rules = RuleSet::new();
    /// rules.add("/a");
    /// assert!(rules.contains_prefix_of("/a/b"));
    /// assert!(!rules.contains_prefix_of("/b/a"));
    /// ```
    pub fn contains_prefix_of(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| path.starts_with(pattern.as_str()))
    }

    /// Returns the number of stored patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if no pattern has been added
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates over the stored patterns in insertion order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }
}
