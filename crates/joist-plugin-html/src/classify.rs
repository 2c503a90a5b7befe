//! Manifest classification: which emitted outputs belong in the document.
//!
//! An output qualifies when it is traceable to a declared entry point,
//! either through its recorded entry point or through the last-input
//! fallback on its record. Qualifying paths are rebased onto the output
//! directory and partitioned by filename suffix.

use std::path::Path;

use joist_core::{normalize_entry_inputs, BuildManifest, EntryPoint};
use once_cell::sync::Lazy;
use path_clean::PathClean;
use regex::Regex;

static STYLESHEET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.css$").expect("static pattern"));
static SCRIPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.js$").expect("static pattern"));
static FRAGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.html$").expect("static pattern"));

/// The three-way partition of a cycle's qualifying outputs.
///
/// Each list preserves manifest emission order; paths are relative to the
/// output directory. Derived fresh per cycle and discarded after assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedOutputs {
    /// `.css` outputs, rendered as stylesheet links.
    pub stylesheets: Vec<String>,
    /// `.js` outputs, rendered as module script tags.
    pub scripts: Vec<String>,
    /// `.html` outputs, inlined as fragment content.
    pub fragments: Vec<String>,
}

impl ClassifiedOutputs {
    pub fn is_empty(&self) -> bool {
        self.stylesheets.is_empty() && self.scripts.is_empty() && self.fragments.is_empty()
    }
}

/// Classify a cycle's manifest into the outputs the document references.
///
/// Outputs that trace to no declared entry (shared dependency chunks, for
/// example) are excluded from all three lists. The suffix tests are
/// case-sensitive and mutually exclusive in practice, since an emitted
/// file carries one extension.
pub fn classify(
    manifest: &BuildManifest,
    out_dir: &Path,
    entry_points: &[EntryPoint],
) -> ClassifiedOutputs {
    let declared = normalize_entry_inputs(entry_points);

    let qualifying: Vec<String> = manifest
        .outputs
        .iter()
        .filter(|(_, record)| record.origin_entry(&declared).is_some())
        .map(|(output_path, _)| relative_output_path(out_dir, output_path))
        .collect();

    ClassifiedOutputs {
        stylesheets: split_files(&qualifying, &STYLESHEET),
        scripts: split_files(&qualifying, &SCRIPT),
        fragments: split_files(&qualifying, &FRAGMENT),
    }
}

/// Keep the files whose full name matches `pattern`, preserving order.
fn split_files(files: &[String], pattern: &Regex) -> Vec<String> {
    files
        .iter()
        .filter(|file| pattern.is_match(file))
        .cloned()
        .collect()
}

/// Rebase an emitted output path onto the output directory.
///
/// Outputs the host placed elsewhere keep their cleaned path unchanged.
fn relative_output_path(out_dir: &Path, output_path: &str) -> String {
    let cleaned = Path::new(output_path).clean();
    let base = out_dir.clean();
    cleaned
        .strip_prefix(&base)
        .unwrap_or(&cleaned)
        .to_string_lossy()
        .into_owned()
}
