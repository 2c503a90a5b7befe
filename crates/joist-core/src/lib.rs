//! # joist-core
//!
//! Foundation crate for the joist build plugins: the host build-hook
//! protocol ([`Plugin`], [`PluginDriver`]), the per-cycle artifact manifest
//! model ([`BuildManifest`]), and the shared build configuration
//! ([`BuildOptions`]).
//!
//! The bundler itself is an external collaborator: it resolves and bundles
//! modules, emits output files, and produces the artifact manifest. This
//! crate only models the hook surface that collaborator exposes. Hosts
//! drive registered plugins through the cycle order
//! [`run_start`](PluginDriver::run_start) →
//! [`run_load`](PluginDriver::run_load)* →
//! [`run_end`](PluginDriver::run_end); in watch mode the cycle repeats on
//! the same driver.
//!
//! ## Quick start
//!
//! ```
//! use joist_core::{BuildManifest, BuildOptions, PluginDriver};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let options = BuildOptions::new()
//!     .with_entry("src/App.ts")
//!     .with_out_dir("dist");
//!
//! let mut driver = PluginDriver::new(options);
//! // driver.register(Arc::new(SomePlugin::new()));
//!
//! driver.run_start().await;
//! let replaced = driver.run_load("src/App.ts").await;
//! driver.run_end(Some(BuildManifest::new())).await;
//! # let _ = replaced;
//! # }
//! ```

pub mod context;
pub mod driver;
pub mod error;
pub mod hooks;
#[cfg(feature = "logging")]
pub mod logging;
pub mod manifest;
pub mod options;

pub use context::BuildContext;
pub use driver::PluginDriver;
pub use error::{CoreError, Result};
pub use hooks::{
    HookEndArgs, HookLoadArgs, HookLoadOutput, HookLoadReturn, HookUsage, Plugin, SuffixFilter,
};
pub use manifest::{BuildManifest, InputRecord, OutputRecord};
pub use options::{normalize_entry_inputs, BuildMode, BuildOptions, EntryPoint};
