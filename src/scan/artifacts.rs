//! Per-test artifact discovery.
//!
//! The e2e framework writes one folder per test under `<run>/artifacts/`,
//! each with a `metadata.json` naming the test it belongs to. The index maps
//! that declared name to the folder once per run so lookups are O(1).

use crate::config::ScanOptions;
use crate::model::{ArtifactMetadata, FileContent, FileKind};
use crate::util::{tail_lines, truncate_bytes};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const ARTIFACT_METADATA_FILE: &str = "metadata.json";
const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Declared test name -> artifact directory, for one run.
#[derive(Debug, Default, Clone)]
pub struct ArtifactIndex {
    entries: HashMap<String, PathBuf>,
}

impl ArtifactIndex {
    /// Scan `artifacts_dir/*/metadata.json`.
    ///
    /// Directories are visited in name order; when two declare the same
    /// name the later one wins. Unreadable metadata is skipped.
    #[must_use]
    pub fn build(artifacts_dir: &Path) -> Self {
        let mut entries = HashMap::new();

        let Ok(read_dir) = fs::read_dir(artifacts_dir) else {
            return Self { entries };
        };

        let mut dirs: Vec<PathBuf> = read_dir
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        for dir in dirs {
            let meta_file = dir.join(ARTIFACT_METADATA_FILE);
            let Ok(contents) = fs::read_to_string(&meta_file) else {
                continue;
            };
            match serde_json::from_str::<serde_json::Value>(&contents) {
                Ok(value) => {
                    let name = value
                        .get("name")
                        .and_then(serde_json::Value::as_str)
                        .map(str::trim)
                        .unwrap_or_default();
                    if name.is_empty() {
                        continue;
                    }
                    if let Some(previous) = entries.insert(name.to_string(), dir.clone()) {
                        debug!(
                            name,
                            previous = %previous.display(),
                            current = %dir.display(),
                            "Duplicate artifact name, keeping the later directory"
                        );
                    }
                }
                Err(e) => {
                    debug!(path = %meta_file.display(), error = %e, "Skipping unreadable artifact metadata");
                }
            }
        }

        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory for a test's full name (trimmed before lookup).
    #[must_use]
    pub fn lookup(&self, test_name: &str) -> Option<&Path> {
        self.entries.get(test_name.trim()).map(PathBuf::as_path)
    }

    /// Load the full artifact payload for a test, if one is indexed.
    #[must_use]
    pub fn load(
        &self,
        test_name: &str,
        results_root: &Path,
        options: &ScanOptions,
    ) -> Option<ArtifactMetadata> {
        let dir = self.lookup(test_name)?;
        load_artifact(dir, results_root, options)
    }
}

/// Read an artifact directory's metadata and the files it lists.
#[must_use]
pub fn load_artifact(
    dir: &Path,
    results_root: &Path,
    options: &ScanOptions,
) -> Option<ArtifactMetadata> {
    let meta_file = dir.join(ARTIFACT_METADATA_FILE);
    let contents = fs::read_to_string(&meta_file).ok()?;
    let mut meta: ArtifactMetadata = match serde_json::from_str(&contents) {
        Ok(meta) => meta,
        Err(e) => {
            warn!(path = %meta_file.display(), error = %e, "Invalid artifact metadata");
            return None;
        }
    };

    meta.relative_path = dir
        .strip_prefix(results_root)
        .unwrap_or(dir)
        .to_string_lossy()
        .to_string();
    meta.file_contents.clear();

    let inventory = meta.artifacts.clone();
    for name in &inventory.log_files {
        if let Some(content) = read_listed_file(dir, name, |text| log_content(text, options)) {
            meta.file_contents.insert(name.clone(), content);
        }
    }
    for name in inventory.resource_files.iter().take(options.resource_max_files) {
        if let Some(content) =
            read_listed_file(dir, name, |text| resource_content(text, options))
        {
            meta.file_contents.insert(name.clone(), content);
        }
    }
    for name in &inventory.event_files {
        if let Some(content) = read_listed_file(dir, name, |text| FileContent {
            content: text,
            kind: FileKind::Events,
            truncated: None,
            total_lines: None,
        }) {
            meta.file_contents.insert(name.clone(), content);
        }
    }

    Some(meta)
}

/// Read one listed file.
///
/// Missing files are omitted; unsafe names and read failures become
/// `error` entries.
fn read_listed_file<F>(dir: &Path, name: &str, build: F) -> Option<FileContent>
where
    F: FnOnce(String) -> FileContent,
{
    if !is_safe_relative(name) {
        warn!(name, dir = %dir.display(), "Refusing artifact path outside its directory");
        return Some(FileContent::error(format!(
            "Refusing to read '{name}': path escapes the artifact directory"
        )));
    }

    let path = dir.join(name);
    if !path.exists() {
        debug!(path = %path.display(), "Listed artifact file is missing");
        return None;
    }

    match fs::read(&path) {
        Ok(bytes) => Some(build(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) => Some(FileContent::error(e.to_string())),
    }
}

fn log_content(text: String, options: &ScanOptions) -> FileContent {
    let tail = tail_lines(&text, options.artifact_log_tail_lines);
    FileContent {
        content: tail.text,
        kind: FileKind::Log,
        truncated: Some(tail.truncated),
        total_lines: Some(tail.total_lines),
    }
}

fn resource_content(text: String, options: &ScanOptions) -> FileContent {
    let content = match truncate_bytes(&text, options.resource_max_bytes) {
        Some(cut) => format!("{cut}{TRUNCATION_MARKER}"),
        None => text,
    };
    FileContent {
        content,
        kind: FileKind::Resource,
        truncated: None,
        total_lines: None,
    }
}

/// A listed name must stay inside the artifact directory.
fn is_safe_relative(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
