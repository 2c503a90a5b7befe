//! Full-cycle integration tests: the three joist plugins registered on one
//! driver and driven through Start → Load* → End cycles the way a host
//! pipeline would, including repeated watch-mode cycles.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use joist_core::{
    BuildManifest, BuildMode, BuildOptions, InputRecord, OutputRecord, PluginDriver,
};
use joist_plugin_clean::CleanPlugin;
use joist_plugin_html::{DocumentElements, HtmlAssemblerPlugin, DOCUMENT_FILENAME};
use joist_plugin_reload::ReloadPlugin;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn record(entry_point: Option<&str>, inputs: &[&str]) -> OutputRecord {
    OutputRecord {
        entry_point: entry_point.map(String::from),
        inputs: inputs
            .iter()
            .map(|input| (input.to_string(), InputRecord::default()))
            .collect(),
        bytes: 0,
    }
}

/// Source fixture mirroring a small app: an HTML shell, a script entry,
/// and a stylesheet, all declared as entry points.
struct Project {
    _tmp: tempfile::TempDir,
    out_dir: PathBuf,
    entry_html: String,
    entry_ts: String,
    entry_css: String,
}

impl Project {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        let entry_html = root.join("src/App.html");
        let entry_ts = root.join("src/App.ts");
        let entry_css = root.join("src/assets/css/App.css");
        write(&entry_html, "<div id=\"root\"></div>");
        write(&entry_ts, "console.log('app');\n");
        write(&entry_css, "body { margin: 0; }\n");

        Self {
            out_dir: root.join("dist"),
            entry_html: entry_html.to_string_lossy().into_owned(),
            entry_ts: entry_ts.to_string_lossy().into_owned(),
            entry_css: entry_css.to_string_lossy().into_owned(),
            _tmp: tmp,
        }
    }

    fn options(&self, mode: BuildMode) -> BuildOptions {
        BuildOptions::new()
            .with_entry(self.entry_html.as_str())
            .with_entry(self.entry_ts.as_str())
            .with_entry(self.entry_css.as_str())
            .with_out_dir(&self.out_dir)
            .with_mode(mode)
    }

    fn driver(&self, mode: BuildMode) -> PluginDriver {
        let mut driver = PluginDriver::new(self.options(mode));
        driver.register(Arc::new(CleanPlugin::new()));
        driver.register(Arc::new(ReloadPlugin::new(
            "/joist",
            "() => location.reload()",
        )));
        driver.register(Arc::new(HtmlAssemblerPlugin::with_assembly(skeleton)));
        driver
    }

    /// Simulate the bundler writing hashed outputs and recording them in
    /// the cycle's manifest.
    fn emit_outputs(&self, hash: &str) -> BuildManifest {
        let name = |stem: &str, ext: &str| self.out_dir.join(format!("{stem}-{hash}.{ext}"));

        write(&name("App", "css"), "body{margin:0}");
        write(&name("App", "js"), "console.log('app');");
        write(&name("App", "html"), "<div id=\"root\"></div>");
        write(&name("chunk", "js"), "export const shared = 1;");

        let mut manifest = BuildManifest::new();
        let key = |path: &Path| path.to_string_lossy().into_owned();
        manifest.insert_output(
            key(&name("App", "css")),
            record(Some(&self.entry_css), &[&self.entry_css]),
        );
        manifest.insert_output(
            key(&name("App", "js")),
            record(Some(&self.entry_ts), &["src/util.ts", &self.entry_ts]),
        );
        manifest.insert_output(key(&name("App", "html")), record(None, &[&self.entry_html]));
        manifest.insert_output(
            key(&name("chunk", "js")),
            record(None, &["node_modules/lib/index.js"]),
        );
        manifest
    }

    fn document(&self) -> String {
        std::fs::read_to_string(self.out_dir.join(DOCUMENT_FILENAME)).unwrap()
    }
}

fn skeleton(elements: &DocumentElements) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n{}</head>\n<body>\n{}{}</body>\n</html>\n",
        elements.links, elements.divs, elements.scripts
    )
}

#[tokio::test]
async fn test_full_cycle_assembles_document() {
    let project = Project::new();
    let driver = project.driver(BuildMode::Development);

    driver.run_start().await;

    let injected = driver.run_load(&project.entry_ts).await.unwrap();
    assert!(injected.code.starts_with("new EventSource('/joist')"));
    assert!(injected.code.contains("console.log('app');"));

    let manifest = project.emit_outputs("GYCL6B7V");
    driver.run_end(Some(manifest)).await;

    let document = project.document();
    assert_eq!(
        document
            .matches("<link rel=\"stylesheet\" href=\"App-GYCL6B7V.css\">")
            .count(),
        1
    );
    assert_eq!(
        document
            .matches("<script type=\"module\" src=\"App-GYCL6B7V.js\" defer></script>")
            .count(),
        1
    );
    assert!(document.contains("<div id=\"root\"></div>"));

    // Stylesheet before fragment before script.
    let link = document.find("App-GYCL6B7V.css").unwrap();
    let div = document.find("<div id=\"root\">").unwrap();
    let script = document.find("App-GYCL6B7V.js").unwrap();
    assert!(link < div);
    assert!(div < script);

    // The shared chunk traces to no declared entry and stays out.
    assert!(!document.contains("chunk-GYCL6B7V.js"));
}

#[tokio::test]
async fn test_repeated_cycles_are_idempotent() {
    let project = Project::new();
    let driver = project.driver(BuildMode::Development);

    let mut documents = Vec::new();
    for _ in 0..2 {
        driver.run_start().await;
        driver.run_load(&project.entry_ts).await;
        let manifest = project.emit_outputs("GYCL6B7V");
        driver.run_end(Some(manifest)).await;
        documents.push(project.document());
    }

    assert_eq!(documents[0], documents[1]);
}

#[tokio::test]
async fn test_watch_cycle_picks_up_new_hashes() {
    let project = Project::new();
    let driver = project.driver(BuildMode::Development);

    driver.run_start().await;
    assert!(driver.run_load(&project.entry_ts).await.is_some());
    driver.run_end(Some(project.emit_outputs("AAAA1111"))).await;
    assert!(project.document().contains("App-AAAA1111.js"));

    // Second cycle: cleanup drops the old outputs, the bundler emits new
    // hashes, and the injector must fire again after its end-of-cycle
    // reset.
    driver.run_start().await;
    assert!(!project.out_dir.exists());
    assert!(driver.run_load(&project.entry_ts).await.is_some());
    driver.run_end(Some(project.emit_outputs("BBBB2222"))).await;

    let document = project.document();
    assert!(document.contains("App-BBBB2222.js"));
    assert!(!document.contains("App-AAAA1111.js"));
}

#[tokio::test]
async fn test_missing_manifest_preserves_previous_document() {
    let project = Project::new();
    let driver = project.driver(BuildMode::Development);

    driver.run_start().await;
    driver.run_load(&project.entry_ts).await;
    driver.run_end(Some(project.emit_outputs("GYCL6B7V"))).await;
    let before = project.document();

    // A degraded cycle that produced no manifest: no write, no crash.
    driver.run_end(None).await;
    assert_eq!(project.document(), before);
}

#[tokio::test]
async fn test_production_cycle_skips_injection() {
    let project = Project::new();
    let driver = project.driver(BuildMode::Production);

    driver.run_start().await;
    assert!(driver.run_load(&project.entry_ts).await.is_none());
    driver.run_end(Some(project.emit_outputs("GYCL6B7V"))).await;

    // The document is still assembled; only the reload wiring is absent.
    let document = project.document();
    assert!(document.contains("App-GYCL6B7V.js"));
    assert!(!document.contains("EventSource"));
}

#[tokio::test]
async fn test_loads_for_non_entry_files_pass_through() {
    let project = Project::new();
    let driver = project.driver(BuildMode::Development);

    driver.run_start().await;
    assert!(driver.run_load("src/components/Button.ts").await.is_none());
    assert!(driver.run_load(&project.entry_css).await.is_none());
}
