//! Build-hook protocol consumed by joist plugins.
//!
//! Models the host pipeline's registration surface: plugins declare which
//! hooks they participate in via [`HookUsage`], optionally restrict their
//! load hook to a filename suffix, and receive a [`BuildContext`] with the
//! immutable build configuration on every invocation.
//!
//! Hook ordering within one build cycle is always Start → Load* → End.
//! In watch mode the cycle repeats; plugins must not assume they run once
//! per process. Load hooks for different files may be in flight
//! concurrently and their completions may interleave, so any cross-event
//! state a plugin keeps has to tolerate that.

use std::borrow::Cow;
use std::ops::BitOr;

use async_trait::async_trait;

use crate::context::BuildContext;
use crate::manifest::BuildManifest;

/// Bit set describing which hooks a plugin participates in.
///
/// Lets the driver skip plugins entirely for hooks they never registered,
/// mirroring the host protocol where each hook is an explicit registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HookUsage(u8);

impl HookUsage {
    /// Participates in no hooks.
    pub const EMPTY: Self = Self(0);
    /// `on_start`: once per build cycle, before any module is processed.
    pub const START: Self = Self(1);
    /// `on_load`: once per file entering the module graph.
    pub const LOAD: Self = Self(1 << 1);
    /// `on_end`: once per build cycle, after all outputs are emitted.
    pub const END: Self = Self(1 << 2);

    /// Whether every hook in `other` is enabled in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for HookUsage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Filename-suffix filter restricting which paths reach a load hook.
///
/// The test is a case-sensitive suffix match against the full path, the
/// same restriction the host protocol expresses as a filter pattern at
/// registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixFilter {
    suffix: String,
}

impl SuffixFilter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Whether `path` ends with this filter's suffix.
    pub fn matches(&self, path: &str) -> bool {
        path.ends_with(&self.suffix)
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

/// Arguments to [`Plugin::on_load`].
#[derive(Debug, Clone, Copy)]
pub struct HookLoadArgs<'a> {
    /// Path of the file entering the module graph.
    pub path: &'a str,
}

/// Replacement content returned from a load hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookLoadOutput {
    /// The file's new content, handed to the bundler in place of the
    /// on-disk source.
    pub code: String,
}

/// Return type of [`Plugin::on_load`].
///
/// `Ok(Some(_))` replaces the file's content; `Ok(None)` passes through
/// untouched.
pub type HookLoadReturn = anyhow::Result<Option<HookLoadOutput>>;

/// Arguments to [`Plugin::on_end`].
#[derive(Debug, Clone, Default)]
pub struct HookEndArgs {
    /// Artifact manifest for the finished cycle, when the host produced
    /// one.
    pub manifest: Option<BuildManifest>,
}

/// A joist build plugin.
///
/// Implementations register for the hooks they need and keep each hook
/// body failure-contained: an error returned from a hook is logged by the
/// driver and never aborts the current or future cycles, so plugins that
/// want finer-grained degradation catch their own failures and return
/// `Ok`.
///
/// All hooks take `&self`; a plugin that keeps per-cycle state owns its
/// synchronization.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Plugin name used in diagnostics.
    fn name(&self) -> Cow<'static, str>;

    /// Declare which hooks this plugin uses.
    fn register_hook_usage(&self) -> HookUsage;

    /// Optional suffix filter the driver applies before `on_load`.
    fn load_filter(&self) -> Option<SuffixFilter> {
        None
    }

    /// Runs once per cycle before any module is processed.
    async fn on_start(&self, _ctx: &BuildContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs once per file entering the module graph, possibly many times
    /// per cycle. Return replacement content to override the file's
    /// source, or `None` to pass through.
    async fn on_load(&self, _ctx: &BuildContext, _args: &HookLoadArgs<'_>) -> HookLoadReturn {
        Ok(None)
    }

    /// Runs once per cycle after all outputs are emitted, carrying the
    /// cycle's artifact manifest when the host produced one.
    async fn on_end(&self, _ctx: &BuildContext, _args: &HookEndArgs) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_usage_contains() {
        let usage = HookUsage::LOAD | HookUsage::END;
        assert!(usage.contains(HookUsage::LOAD));
        assert!(usage.contains(HookUsage::END));
        assert!(!usage.contains(HookUsage::START));
        assert!(usage.contains(HookUsage::EMPTY));
    }

    #[test]
    fn test_hook_usage_empty() {
        assert!(!HookUsage::EMPTY.contains(HookUsage::START));
        assert_eq!(HookUsage::default(), HookUsage::EMPTY);
    }

    #[test]
    fn test_suffix_filter_matches() {
        let filter = SuffixFilter::new(".ts");
        assert!(filter.matches("src/App.ts"));
        assert!(filter.matches(".ts"));
        assert!(!filter.matches("src/App.tsx"));
        assert!(!filter.matches("src/App.TS"));
    }
}
