//! HTML assembly plugin.
//!
//! Consumes the cycle's artifact manifest at *End*, classifies the emitted
//! files that trace back to declared entry points, reads any emitted HTML
//! fragments, and writes one assembled `index.html` into the output
//! directory. Assembly is a pure function of the classified set and the
//! fragment contents, so repeated cycles over identical inputs rewrite an
//! identical document.
//!
//! The per-cycle pipeline is manifest check → classify → read fragments →
//! render → write; any failing stage is reported and the cycle completes
//! without a new document.

mod classify;
mod document;

pub use classify::{classify, ClassifiedOutputs};
pub use document::{default_document, module_script, stylesheet_link, DocumentElements};

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;
use joist_core::{BuildContext, BuildManifest, HookEndArgs, HookUsage, Plugin};
use thiserror::Error;
use tracing::{debug, error};

/// Name of the produced document inside the output directory.
pub const DOCUMENT_FILENAME: &str = "index.html";

/// Strategy receiving the rendered element groups and returning the final
/// document string.
pub type AssemblyFn = Box<dyn Fn(&DocumentElements) -> String + Send + Sync>;

/// Assembly failures, by stage.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The cycle ended without an artifact manifest.
    #[error("artifact manifest is not available")]
    MissingManifest,

    /// An emitted HTML fragment could not be read back.
    #[error("failed to read fragment '{}': {source}", .path.display())]
    FragmentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The assembled document could not be written.
    #[error("failed to write '{}': {source}", .path.display())]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Assembles `index.html` from the cycle's classified outputs.
///
/// Inert without a configured output directory. The assembly strategy is
/// injected at construction; [`default_document`] is used when no custom
/// strategy is supplied.
pub struct HtmlAssemblerPlugin {
    assemble: AssemblyFn,
}

impl HtmlAssemblerPlugin {
    /// Plugin using the ready-made [`default_document`] skeleton.
    pub fn new() -> Self {
        Self::with_assembly(default_document)
    }

    /// Plugin with a caller-supplied assembly strategy.
    pub fn with_assembly<F>(assemble: F) -> Self
    where
        F: Fn(&DocumentElements) -> String + Send + Sync + 'static,
    {
        Self {
            assemble: Box::new(assemble),
        }
    }

    async fn assemble_document(
        &self,
        ctx: &BuildContext,
        out_dir: &Path,
        manifest: Option<&BuildManifest>,
    ) -> Result<(), AssembleError> {
        let manifest = manifest.ok_or(AssembleError::MissingManifest)?;

        let outputs = classify(manifest, out_dir, ctx.entry_points());

        // Reads are collected in classification order before being awaited
        // together, so fragment order never depends on completion order.
        let reads = outputs.fragments.iter().map(|fragment| {
            let path = out_dir.join(fragment);
            async move {
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| AssembleError::FragmentRead { path, source })
            }
        });
        let fragments = try_join_all(reads).await?;

        let elements = DocumentElements::render(&outputs, &fragments);
        let rendered = (self.assemble)(&elements);

        let target = out_dir.join(DOCUMENT_FILENAME);
        if let Err(source) = tokio::fs::write(&target, rendered).await {
            return Err(AssembleError::DocumentWrite {
                path: target,
                source,
            });
        }

        debug!(
            path = %target.display(),
            stylesheets = outputs.stylesheets.len(),
            scripts = outputs.scripts.len(),
            fragments = outputs.fragments.len(),
            "assembled document"
        );
        Ok(())
    }
}

impl Default for HtmlAssemblerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HtmlAssemblerPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlAssemblerPlugin").finish_non_exhaustive()
    }
}

#[async_trait]
impl Plugin for HtmlAssemblerPlugin {
    fn name(&self) -> Cow<'static, str> {
        "joist-html".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::END
    }

    /// Assemble and write the document. Failures are reported and the
    /// cycle continues; a stale or absent document is the accepted
    /// degraded outcome until the next successful cycle.
    async fn on_end(&self, ctx: &BuildContext, args: &HookEndArgs) -> anyhow::Result<()> {
        let Some(out_dir) = ctx.options().out_dir.clone() else {
            return Ok(());
        };

        if let Err(err) = self
            .assemble_document(ctx, &out_dir, args.manifest.as_ref())
            .await
        {
            error!(plugin = "joist-html", "document assembly skipped: {err}");
        }
        Ok(())
    }
}
