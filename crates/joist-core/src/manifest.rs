//! Per-cycle artifact manifest: emitted outputs and the inputs consumed
//! into each.
//!
//! The host pipeline delivers this once per cycle at *End*, as a JSON
//! document. [`BuildManifest::from_json`] is the boundary adapter; code
//! downstream of it only ever sees the typed model. Ordering matters here:
//! the fallback origin rule inspects the *last* input consumed into an
//! output, so both maps preserve the host's insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Metadata for one input consumed into an output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Bytes this input contributed to the output.
    #[serde(default, rename = "bytesInOutput")]
    pub bytes_in_output: u64,
}

/// One emitted output file and where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Entry point this output originates from, when the host recorded
    /// one. Expected to appear in the build's declared entry list; that is
    /// a semantic requirement on the host, not enforced structurally.
    #[serde(default, rename = "entryPoint", skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,

    /// Inputs consumed into this output, in the order the host recorded
    /// them.
    #[serde(default)]
    pub inputs: IndexMap<String, InputRecord>,

    /// Total output size in bytes.
    #[serde(default)]
    pub bytes: u64,
}

impl OutputRecord {
    /// Last input consumed into this output, if any.
    pub fn last_input(&self) -> Option<&str> {
        self.inputs.keys().last().map(String::as_str)
    }

    /// Resolve which declared entry this output originates from.
    ///
    /// Prefers the recorded entry point when it appears in `declared`.
    /// Otherwise falls back to the last key of the inputs mapping: some
    /// emitted files carry their originating module only via the input
    /// list. The fallback inspects only the final key, even when an
    /// earlier input would also match a declared entry; the policy is
    /// arbitrary but fixed.
    pub fn origin_entry<'a, S: AsRef<str>>(&'a self, declared: &[S]) -> Option<&'a str> {
        if let Some(entry) = self.entry_point.as_deref() {
            if declared.iter().any(|d| d.as_ref() == entry) {
                return Some(entry);
            }
        }
        self.last_input()
            .filter(|last| declared.iter().any(|d| d.as_ref() == *last))
    }
}

/// Artifact manifest for one build cycle.
///
/// Maps each emitted output path to its [`OutputRecord`], in emission
/// order. Created fresh each cycle and discarded after assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    #[serde(default)]
    pub outputs: IndexMap<String, OutputRecord>,
}

impl BuildManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the host's JSON manifest document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CoreError::ManifestParse)
    }

    /// Serialize back into the host's JSON document shape.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(CoreError::ManifestParse)
    }

    /// Record an emitted output. Convenience for hosts assembling the
    /// manifest incrementally.
    pub fn insert_output(&mut self, path: impl Into<String>, record: OutputRecord) {
        self.outputs.insert(path.into(), record);
    }
}
