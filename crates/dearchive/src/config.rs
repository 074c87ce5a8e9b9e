//! Extraction options.

/// How symlink entries are materialized.
///
/// Link targets come straight from the archive and are untrusted, so the
/// default refuses anything that could resolve outside the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkPolicy {
    /// Reject absolute targets and relative targets resolving outside the
    /// destination with `SymlinkEscape`.
    #[default]
    Disallow,

    /// Create targets verbatim. Only for trusted archives.
    Allow,

    /// Like `Disallow`, but absolute targets are rewritten to point at the
    /// same path under the destination root.
    RelativizeAbsolute,
}

/// Options controlling one extraction call.
///
/// # Examples
///
/// ```
/// use dearchive::ExtractOptions;
/// use dearchive::SymlinkPolicy;
///
/// let options = ExtractOptions::default()
///     .with_strip_components(1)
///     .with_symlink_policy(SymlinkPolicy::RelativizeAbsolute);
/// assert_eq!(options.strip_components, 1);
/// assert!(options.overwrite);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Number of leading path segments removed from every entry name.
    pub strip_components: usize,

    /// Replace files and links already present at the destination.
    pub overwrite: bool,

    /// Apply the archive's permission bits to extracted entries.
    pub preserve_permissions: bool,

    /// Symlink target handling.
    pub symlink_policy: SymlinkPolicy,

    /// Bytes of entry content kept in memory for retries before the replay
    /// spool moves to a temporary file.
    pub replay_memory_limit: usize,
}

impl Default for ExtractOptions {
    /// Creates options with the following defaults:
    /// - `strip_components`: 0
    /// - `overwrite`: true
    /// - `preserve_permissions`: true
    /// - `symlink_policy`: `Disallow`
    /// - `replay_memory_limit`: 1 MiB
    fn default() -> Self {
        Self {
            strip_components: 0,
            overwrite: true,
            preserve_permissions: true,
            symlink_policy: SymlinkPolicy::Disallow,
            replay_memory_limit: 1024 * 1024,
        }
    }
}

impl ExtractOptions {
    /// Sets the number of leading segments to strip.
    #[must_use]
    pub const fn with_strip_components(mut self, count: usize) -> Self {
        self.strip_components = count;
        self
    }

    /// Sets whether existing files are replaced.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether archive permissions are applied.
    #[must_use]
    pub const fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets the symlink policy.
    #[must_use]
    pub const fn with_symlink_policy(mut self, policy: SymlinkPolicy) -> Self {
        self.symlink_policy = policy;
        self
    }

    /// Sets the in-memory size of the retry spool.
    #[must_use]
    pub const fn with_replay_memory_limit(mut self, bytes: usize) -> Self {
        self.replay_memory_limit = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.strip_components, 0);
        assert!(options.overwrite);
        assert!(options.preserve_permissions);
        assert_eq!(options.symlink_policy, SymlinkPolicy::Disallow);
        assert_eq!(options.replay_memory_limit, 1024 * 1024);
    }

    #[test]
    fn test_builder_chain() {
        let options = ExtractOptions::default()
            .with_strip_components(2)
            .with_overwrite(false)
            .with_preserve_permissions(false)
            .with_symlink_policy(SymlinkPolicy::Allow)
            .with_replay_memory_limit(0);

        assert_eq!(options.strip_components, 2);
        assert!(!options.overwrite);
        assert!(!options.preserve_permissions);
        assert_eq!(options.symlink_policy, SymlinkPolicy::Allow);
        assert_eq!(options.replay_memory_limit, 0);
    }

    #[test]
    fn test_struct_update_syntax() {
        let options = ExtractOptions {
            overwrite: false,
            ..Default::default()
        };
        assert!(!options.overwrite);
        assert_eq!(options.symlink_policy, SymlinkPolicy::default());
    }
}
