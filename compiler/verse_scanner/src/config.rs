//! Scanner configuration.
//!
//! Hosts either build a [`ScanConfig`] directly, deserialize it from their
//! own settings (it derives `serde` traits), or read overrides from the
//! environment with [`ScanConfig::from_env`].

use serde::{Deserialize, Serialize};

/// Default hard cap on the attribute trial scan, in bytes examined.
pub const DEFAULT_TRIAL_STEP_LIMIT: u32 = 4096;

/// Tunables for a [`Scanner`](crate::Scanner).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Column width of a tab when measuring indentation.
    ///
    /// `1` counts a tab as a single column, matching how tree-sitter
    /// reports columns.
    pub tab_width: u8,
    /// Maximum bytes the attribute/comparison trial may examine. The
    /// effective bound is also capped by the remaining input.
    pub trial_step_limit: u32,
    /// Report error-recovery sentinels under the terminator kind.
    ///
    /// Older grammar revisions expect the recovery token
    /// under the automatic terminator's symbol.
    pub sentinel_as_terminator: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tab_width: 1,
            trial_step_limit: DEFAULT_TRIAL_STEP_LIMIT,
            sentinel_as_terminator: false,
        }
    }
}

impl ScanConfig {
    /// Environment variable overriding [`ScanConfig::tab_width`].
    pub const TAB_WIDTH_VAR: &'static str = "VERSE_SCAN_TAB_WIDTH";
    /// Environment variable overriding [`ScanConfig::trial_step_limit`].
    pub const TRIAL_LIMIT_VAR: &'static str = "VERSE_SCAN_TRIAL_LIMIT";
    /// Environment variable overriding [`ScanConfig::sentinel_as_terminator`].
    pub const SENTINEL_VAR: &'static str = "VERSE_SCAN_SENTINEL_AS_TERMINATOR";

    /// Defaults, overridden by any `VERSE_SCAN_*` variables that parse.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(width) = lookup(Self::TAB_WIDTH_VAR).and_then(|v| v.trim().parse::<u8>().ok()) {
            config.tab_width = width.max(1);
        }
        if let Some(limit) = lookup(Self::TRIAL_LIMIT_VAR).and_then(|v| v.trim().parse().ok()) {
            config.trial_step_limit = limit;
        }
        if let Some(flag) = lookup(Self::SENTINEL_VAR) {
            config.sentinel_as_terminator = matches!(flag.trim(), "1" | "true" | "yes");
        }
        config
    }

    #[must_use]
    pub fn with_tab_width(mut self, tab_width: u8) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    #[must_use]
    pub fn with_trial_step_limit(mut self, limit: u32) -> Self {
        self.trial_step_limit = limit;
        self
    }

    #[must_use]
    pub fn with_sentinel_as_terminator(mut self, enabled: bool) -> Self {
        self.sentinel_as_terminator = enabled;
        self
    }
}
