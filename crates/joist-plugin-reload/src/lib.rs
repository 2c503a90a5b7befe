//! Live-reload bootstrap injection.
//!
//! In development mode, rewrites the first matching entry source file once
//! per build cycle to prepend a one-line `EventSource` subscription, so
//! the served bundle connects to the host's notification channel and runs
//! a callback on every change event. The rewrite must happen exactly once
//! per cycle even when load completions for several files interleave; an
//! atomic claim/commit token guards the injection.

mod token;

use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;
use joist_core::{
    BuildContext, EntryPoint, HookEndArgs, HookLoadArgs, HookLoadOutput, HookLoadReturn,
    HookUsage, Plugin, SuffixFilter,
};
use tracing::{debug, error};

use token::InjectionToken;

/// Strategy turning injected source text into loadable code.
///
/// Stands in for the bundler's lowering step (TypeScript to JavaScript and
/// the like), which is outside this plugin's scope. Defaults to identity.
pub type SourceTransform = Box<dyn Fn(String) -> anyhow::Result<String> + Send + Sync>;

/// Injects a live-reload bootstrap into the first matching entry file,
/// exactly once per build cycle.
///
/// The plugin is inert in production mode and when no entry points are
/// declared. A loading path matches an entry when it contains the entry's
/// input path as a substring; the first declared entry that matches an
/// in-progress load becomes the cycle's bootstrap target.
pub struct ReloadPlugin {
    event_url: String,
    event_callback: String,
    filter: SuffixFilter,
    transform: Option<SourceTransform>,
    token: InjectionToken,
}

impl ReloadPlugin {
    /// Default extension of injectable entry sources.
    pub const DEFAULT_FILTER: &'static str = ".ts";

    /// Create an injector subscribing to `event_url` and running
    /// `event_callback` on every change event. The callback is a
    /// client-side expression, e.g. `() => location.reload()`.
    pub fn new(event_url: impl Into<String>, event_callback: impl Into<String>) -> Self {
        Self {
            event_url: event_url.into(),
            event_callback: event_callback.into(),
            filter: SuffixFilter::new(Self::DEFAULT_FILTER),
            transform: None,
            token: InjectionToken::new(),
        }
    }

    /// Restrict injection to paths with the given suffix instead of `.ts`.
    pub fn with_filter(mut self, suffix: impl Into<String>) -> Self {
        self.filter = SuffixFilter::new(suffix);
        self
    }

    /// Run injected source through `transform` before handing it back to
    /// the bundler.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(String) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    /// The bootstrap statement prepended to the entry source.
    fn bootstrap_statement(&self) -> String {
        format!(
            "new EventSource('{}').addEventListener('change', {});\n",
            self.event_url, self.event_callback
        )
    }

    /// First declared entry whose input path occurs in the loading path.
    fn matching_entry<'a>(&self, entry_points: &'a [EntryPoint], path: &str) -> Option<&'a str> {
        entry_points
            .iter()
            .map(EntryPoint::input)
            .find(|input| path.contains(*input))
    }

    /// Read the entry source from disk and produce the rewritten content.
    async fn inject(&self, entry_input: &str) -> anyhow::Result<String> {
        let source = tokio::fs::read_to_string(entry_input).await?;
        let combined = format!("{}{}", self.bootstrap_statement(), source);
        match &self.transform {
            Some(transform) => transform(combined),
            None => Ok(combined),
        }
    }
}

impl fmt::Debug for ReloadPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadPlugin")
            .field("event_url", &self.event_url)
            .field("event_callback", &self.event_callback)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Plugin for ReloadPlugin {
    fn name(&self) -> Cow<'static, str> {
        "joist-reload".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::LOAD | HookUsage::END
    }

    fn load_filter(&self) -> Option<SuffixFilter> {
        Some(self.filter.clone())
    }

    async fn on_load(&self, ctx: &BuildContext, args: &HookLoadArgs<'_>) -> HookLoadReturn {
        if ctx.mode().is_production() {
            return Ok(None);
        }

        let entry_points = ctx.entry_points();
        if entry_points.is_empty() {
            return Ok(None);
        }

        let Some(entry_input) = self.matching_entry(entry_points, args.path) else {
            return Ok(None);
        };

        // Claim before the first await so interleaved load completions
        // cannot both observe an un-injected cycle.
        if !self.token.try_claim() {
            return Ok(None);
        }

        match self.inject(entry_input).await {
            Ok(code) => {
                self.token.commit();
                debug!(entry = entry_input, "injected reload bootstrap");
                Ok(Some(HookLoadOutput { code }))
            }
            Err(err) => {
                // Reopen the slot so a later load in this cycle can retry.
                self.token.revert();
                error!(entry = entry_input, "reload injection failed: {err:#}");
                Ok(None)
            }
        }
    }

    /// Rearm for the next cycle, whether or not this one injected.
    async fn on_end(&self, _ctx: &BuildContext, _args: &HookEndArgs) -> anyhow::Result<()> {
        self.token.reset();
        Ok(())
    }
}
