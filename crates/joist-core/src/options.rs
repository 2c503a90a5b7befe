//! Build configuration: entry points, output locations, and mode.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Build mode selecting development conveniences.
///
/// Development mode activates the reload injector; production builds leave
/// loaded sources untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub fn is_development(self) -> bool {
        matches!(self, BuildMode::Development)
    }

    pub fn is_production(self) -> bool {
        matches!(self, BuildMode::Production)
    }
}

/// A source file declared as a root of the build.
///
/// Either a bare source path, or an input path paired with a custom output
/// name. Serialized the way host configurations spell it: a plain string,
/// or an `{ "in": ..., "out": ... }` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryPoint {
    /// Bare source path.
    Path(String),
    /// Input path with a custom output name.
    Named {
        #[serde(rename = "in")]
        input: String,
        #[serde(rename = "out")]
        output: String,
    },
}

impl EntryPoint {
    /// The source path this entry reads from.
    pub fn input(&self) -> &str {
        match self {
            EntryPoint::Path(path) => path,
            EntryPoint::Named { input, .. } => input,
        }
    }
}

impl From<&str> for EntryPoint {
    fn from(path: &str) -> Self {
        EntryPoint::Path(path.to_string())
    }
}

impl From<String> for EntryPoint {
    fn from(path: String) -> Self {
        EntryPoint::Path(path)
    }
}

/// Flatten declared entry points into their input paths, in declaration
/// order. Named entries contribute their input field.
pub fn normalize_entry_inputs(entry_points: &[EntryPoint]) -> Vec<String> {
    entry_points
        .iter()
        .map(|entry| entry.input().to_string())
        .collect()
}

/// Host build configuration consumed by joist plugins.
///
/// Fixed for the process lifetime; hooks observe it through
/// [`BuildContext`](crate::BuildContext).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Declared entry points. Declaration order decides which entry wins
    /// reload injection when several match a loading path.
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,

    /// Output directory. The HTML assembler is inert without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Single-output-file path, removed before each cycle when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_file: Option<PathBuf>,

    #[serde(default)]
    pub mode: BuildMode,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: impl Into<EntryPoint>) -> Self {
        self.entry_points.push(entry.into());
        self
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    pub fn with_out_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.out_file = Some(file.into());
        self
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_point_input() {
        let bare = EntryPoint::Path("src/App.ts".to_string());
        assert_eq!(bare.input(), "src/App.ts");

        let named = EntryPoint::Named {
            input: "src/App.ts".to_string(),
            output: "app".to_string(),
        };
        assert_eq!(named.input(), "src/App.ts");
    }

    #[test]
    fn test_entry_point_deserializes_string_and_object() {
        let bare: EntryPoint = serde_json::from_str(r#""src/App.css""#).unwrap();
        assert_eq!(bare, EntryPoint::Path("src/App.css".to_string()));

        let named: EntryPoint =
            serde_json::from_str(r#"{"in": "src/App.ts", "out": "app"}"#).unwrap();
        assert_eq!(
            named,
            EntryPoint::Named {
                input: "src/App.ts".to_string(),
                output: "app".to_string(),
            }
        );
    }

    #[test]
    fn test_normalize_entry_inputs_preserves_order() {
        let entries = vec![
            EntryPoint::from("src/App.html"),
            EntryPoint::Named {
                input: "src/App.ts".to_string(),
                output: "app".to_string(),
            },
            EntryPoint::from("src/assets/css/App.css"),
        ];

        assert_eq!(
            normalize_entry_inputs(&entries),
            vec!["src/App.html", "src/App.ts", "src/assets/css/App.css"]
        );
    }

    #[test]
    fn test_build_options_builders() {
        let options = BuildOptions::new()
            .with_entry("src/App.ts")
            .with_out_dir("dist")
            .with_out_file("dist/bundle.js")
            .with_mode(BuildMode::Production);

        assert_eq!(options.entry_points.len(), 1);
        assert_eq!(options.out_dir.as_deref(), Some(std::path::Path::new("dist")));
        assert!(options.mode.is_production());
    }
}
