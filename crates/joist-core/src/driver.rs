//! Hook dispatch for registered plugins.
//!
//! The driver is the host-facing half of the protocol: the pipeline calls
//! [`run_start`](PluginDriver::run_start) /
//! [`run_load`](PluginDriver::run_load) /
//! [`run_end`](PluginDriver::run_end) in cycle order and the driver fans
//! each hook out to the plugins that registered for it. A failing hook is
//! logged under the plugin's name and never aborts the cycle; a degraded
//! cycle is preferred over a halted watch process.

use std::sync::Arc;

use tracing::{debug, error};

use crate::context::BuildContext;
use crate::hooks::{HookEndArgs, HookLoadArgs, HookLoadOutput, HookUsage, Plugin};
use crate::manifest::BuildManifest;
use crate::options::BuildOptions;

/// Dispatches build-cycle hooks to registered plugins in registration
/// order.
///
/// Reusable across cycles: watch-mode hosts call
/// `run_start` → `run_load`* → `run_end` repeatedly on one driver. The
/// caller owns that ordering guarantee; the driver only fans out.
pub struct PluginDriver {
    context: BuildContext,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginDriver {
    /// Create a driver for the given build configuration.
    pub fn new(options: BuildOptions) -> Self {
        Self {
            context: BuildContext::new(options),
            plugins: Vec::new(),
        }
    }

    /// Register a plugin. Hooks run in registration order.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// The shared build context handed to hooks.
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Fire the start hook on every participating plugin.
    pub async fn run_start(&self) {
        for plugin in self.participants(HookUsage::START) {
            if let Err(err) = plugin.on_start(&self.context).await {
                error!(plugin = %plugin.name(), "start hook failed: {err:#}");
            }
        }
    }

    /// Offer a loading file to every participating plugin.
    ///
    /// Plugins are consulted in registration order, skipping those whose
    /// suffix filter rejects the path. The first replacement content wins;
    /// later plugins are not consulted for this file.
    pub async fn run_load(&self, path: &str) -> Option<HookLoadOutput> {
        let args = HookLoadArgs { path };
        for plugin in self.participants(HookUsage::LOAD) {
            if let Some(filter) = plugin.load_filter() {
                if !filter.matches(path) {
                    continue;
                }
            }
            match plugin.on_load(&self.context, &args).await {
                Ok(Some(output)) => {
                    debug!(plugin = %plugin.name(), path, "load hook replaced content");
                    return Some(output);
                }
                Ok(None) => {}
                Err(err) => {
                    error!(plugin = %plugin.name(), path, "load hook failed: {err:#}");
                }
            }
        }
        None
    }

    /// Fire the end hook on every participating plugin.
    ///
    /// A cycle that produced no manifest is delivered as `None`; what to
    /// do about that is each plugin's policy.
    pub async fn run_end(&self, manifest: Option<BuildManifest>) {
        let args = HookEndArgs { manifest };
        for plugin in self.participants(HookUsage::END) {
            if let Err(err) = plugin.on_end(&self.context, &args).await {
                error!(plugin = %plugin.name(), "end hook failed: {err:#}");
            }
        }
    }

    fn participants(&self, usage: HookUsage) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins
            .iter()
            .filter(move |plugin| plugin.register_hook_usage().contains(usage))
    }
}
