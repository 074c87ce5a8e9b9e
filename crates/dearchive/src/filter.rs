//! Entry filtering.
//!
//! Filters run after sanitization and strip-components, so they see the
//! entry under the name it will be written with. A rejected entry is
//! silently omitted; it never reaches the error handler.

use crate::types::Entry;

/// Decides whether an entry is extracted.
///
/// Any `Fn(&Entry) -> bool` is a filter:
///
/// ```
/// use dearchive::EntryFilter;
/// use dearchive::types::Entry;
///
/// let no_some = |entry: &Entry| !entry.name.contains("some");
/// assert!(no_some.accept(&Entry::file("test1", None)));
/// assert!(!no_some.accept(&Entry::file("subdir/some/file", None)));
/// ```
pub trait EntryFilter {
    /// Returns `true` to extract the entry.
    fn accept(&self, entry: &Entry) -> bool;
}

impl<F> EntryFilter for F
where
    F: Fn(&Entry) -> bool,
{
    fn accept(&self, entry: &Entry) -> bool {
        self(entry)
    }
}

/// Filter accepting every entry. Used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl EntryFilter for AcceptAll {
    fn accept(&self, _entry: &Entry) -> bool {
        true
    }
}

/// Excludes entries by name pattern and, optionally, hidden entries.
///
/// Patterns are matched against every path segment and against the whole
/// name:
/// - Exact match: `".git"` matches only `.git`
/// - Extension wildcard: `"*.tmp"` matches names ending with `.tmp`
/// - Prefix wildcard: `"temp*"` matches names starting with `temp`
///
/// # Examples
///
/// ```
/// use dearchive::EntryFilter;
/// use dearchive::PatternFilter;
/// use dearchive::types::Entry;
///
/// let filter = PatternFilter::new()
///     .exclude("*.tmp")
///     .exclude(".git")
///     .with_hidden(false);
///
/// assert!(filter.accept(&Entry::file("src/main.rs", None)));
/// assert!(!filter.accept(&Entry::file("build/cache.tmp", None)));
/// assert!(!filter.accept(&Entry::file("repo/.git/HEAD", None)));
/// assert!(!filter.accept(&Entry::file("home/.profile", None)));
/// ```
#[derive(Debug, Clone)]
pub struct PatternFilter {
    exclude_patterns: Vec<String>,
    include_hidden: bool,
}

impl Default for PatternFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternFilter {
    /// Creates a filter that accepts everything, hidden entries included.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            include_hidden: true,
        }
    }

    /// Adds an exclude pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets whether entries whose final segment starts with `.` are kept.
    #[must_use]
    pub const fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Returns the configured exclude patterns.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.exclude_patterns
    }
}

impl EntryFilter for PatternFilter {
    fn accept(&self, entry: &Entry) -> bool {
        if !self.include_hidden && is_hidden(&entry.name) {
            return false;
        }
        !self
            .exclude_patterns
            .iter()
            .any(|pattern| matches_pattern(&entry.name, pattern))
    }
}

/// Checks if the final segment of a slash-separated name starts with `.`.
#[must_use]
pub fn is_hidden(name: &str) -> bool {
    name.trim_end_matches('/')
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment.starts_with('.'))
}

/// Matches a slash-separated name against a pattern.
#[must_use]
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    name.split('/')
        .filter(|segment| !segment.is_empty())
        .any(|segment| pattern_matches(segment, pattern))
        || pattern_matches(name, pattern)
}

fn pattern_matches(s: &str, pattern: &str) -> bool {
    if pattern == s {
        return true;
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        return s.starts_with(prefix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        return s.ends_with(suffix);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all() {
        assert!(AcceptAll.accept(&Entry::file("anything", None)));
        assert!(AcceptAll.accept(&Entry::directory(".hidden")));
    }

    #[test]
    fn test_closure_filter() {
        let only_dirs = |entry: &Entry| entry.entry_type.is_directory();
        assert!(only_dirs.accept(&Entry::directory("a")));
        assert!(!only_dirs.accept(&Entry::file("a", None)));
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(".gitignore"));
        assert!(is_hidden("dir/.hidden"));
        assert!(is_hidden("dir/.cache/"));
        assert!(!is_hidden("visible.txt"));
        assert!(!is_hidden(".config/visible.txt"));
    }

    #[test]
    fn test_matches_pattern_exact() {
        assert!(matches_pattern(".git", ".git"));
        assert!(matches_pattern("repo/.git/config", ".git"));
        assert!(!matches_pattern(".github/workflows", ".git"));
    }

    #[test]
    fn test_matches_pattern_wildcards() {
        assert!(matches_pattern("file.tmp", "*.tmp"));
        assert!(matches_pattern("dir/test.tmp", "*.tmp"));
        assert!(matches_pattern("temp_file", "temp*"));
        assert!(matches_pattern("dir/temp_file", "temp*"));
        assert!(!matches_pattern("file_temp", "temp*"));
    }

    #[test]
    fn test_pattern_filter_default_accepts_all() {
        let filter = PatternFilter::default();
        assert!(filter.patterns().is_empty());
        assert!(filter.accept(&Entry::file(".env", None)));
    }

    #[test]
    fn test_pattern_filter_excludes() {
        let filter = PatternFilter::new().exclude("node_modules").exclude("*.log");
        assert!(filter.accept(&Entry::file("src/index.js", None)));
        assert!(!filter.accept(&Entry::directory("app/node_modules")));
        assert!(!filter.accept(&Entry::file("logs/debug.log", None)));
    }
}
