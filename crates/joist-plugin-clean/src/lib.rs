//! Output cleanup plugin.
//!
//! Removes stale build output before a new cycle begins: the configured
//! single-output file, the configured output directory (recursively), or
//! both. Cleanup is a best-effort convenience, never a hard dependency for
//! later stages: a target that does not exist is skipped, and a deletion
//! failure is logged without aborting the cycle.

use std::borrow::Cow;
use std::path::Path;

use async_trait::async_trait;
use joist_core::{BuildContext, HookUsage, Plugin};
use tracing::{debug, warn};

/// Removes pre-existing build output at the start of every cycle.
///
/// Reads the output locations from the shared build options; with neither
/// an output file nor an output directory configured the plugin does
/// nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanPlugin;

impl CleanPlugin {
    pub fn new() -> Self {
        Self
    }
}

/// Existence check that degrades to "absent" on error, so a probe failure
/// cannot escalate past the cleanup stage.
async fn target_exists(path: &Path) -> bool {
    match tokio::fs::try_exists(path).await {
        Ok(found) => found,
        Err(err) => {
            warn!(path = %path.display(), "existence check failed, skipping cleanup: {err}");
            false
        }
    }
}

#[async_trait]
impl Plugin for CleanPlugin {
    fn name(&self) -> Cow<'static, str> {
        "joist-clean".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::START
    }

    /// Delete the configured output file and/or output directory when they
    /// exist. Never returns an error: every failure is logged and the
    /// cycle proceeds.
    async fn on_start(&self, ctx: &BuildContext) -> anyhow::Result<()> {
        let options = ctx.options();

        if let Some(out_file) = options.out_file.as_deref() {
            if target_exists(out_file).await {
                match tokio::fs::remove_file(out_file).await {
                    Ok(()) => debug!(path = %out_file.display(), "removed stale output file"),
                    Err(err) => {
                        warn!(path = %out_file.display(), "failed to remove output file: {err}")
                    }
                }
            }
        }

        if let Some(out_dir) = options.out_dir.as_deref() {
            if target_exists(out_dir).await {
                match tokio::fs::remove_dir_all(out_dir).await {
                    Ok(()) => debug!(path = %out_dir.display(), "removed stale output directory"),
                    Err(err) => {
                        warn!(path = %out_dir.display(), "failed to remove output directory: {err}")
                    }
                }
            }
        }

        Ok(())
    }
}
