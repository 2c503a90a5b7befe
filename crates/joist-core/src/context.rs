//! Shared build configuration handed to every hook invocation.

use std::sync::Arc;

use crate::options::{BuildMode, BuildOptions, EntryPoint};

/// Immutable build configuration shared with hooks.
///
/// The host's options are fixed at configuration time; cloning the context
/// is cheap and every clone observes the same options.
#[derive(Debug, Clone)]
pub struct BuildContext {
    options: Arc<BuildOptions>,
}

impl BuildContext {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Declared entry points, in configuration order.
    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.options.entry_points
    }

    pub fn mode(&self) -> BuildMode {
        self.options.mode
    }
}
