//! Configuration management for `e2e_report`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`E2E_REPORT_*`)
//! 3. Results-root config (`<root>/.e2e-report.yaml`, or `--config FILE`)
//! 4. User config (`~/.config/e2e-report/config.yaml`)
//! 5. Defaults

use crate::error::{ReportError, Result};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Default report file name, written into the results root.
pub const DEFAULT_OUTPUT_FILENAME: &str = "test_results_report.html";
/// Prefix that marks a run directory.
pub const DEFAULT_RUN_PREFIX: &str = "run-";
/// Project config file looked up in the results root.
pub const PROJECT_CONFIG_FILENAME: &str = ".e2e-report.yaml";
/// Environment variable prefix.
pub const ENV_PREFIX: &str = "E2E_REPORT_";

const DEFAULT_TITLE: &str = "E2E Test Results";
const DEFAULT_CONSOLE_LOG_MAX_LINES: usize = 10_000;
const DEFAULT_ARTIFACT_LOG_TAIL_LINES: usize = 500;
const DEFAULT_RESOURCE_MAX_BYTES: usize = 51_200;
const DEFAULT_RESOURCE_MAX_FILES: usize = 10;
const DEFAULT_CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// Limits applied while reading a run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub run_prefix: String,
    pub console_log_max_lines: usize,
    pub artifact_log_tail_lines: usize,
    pub resource_max_bytes: usize,
    pub resource_max_files: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            run_prefix: DEFAULT_RUN_PREFIX.to_string(),
            console_log_max_lines: DEFAULT_CONSOLE_LOG_MAX_LINES,
            artifact_log_tail_lines: DEFAULT_ARTIFACT_LOG_TAIL_LINES,
            resource_max_bytes: DEFAULT_RESOURCE_MAX_BYTES,
            resource_max_files: DEFAULT_RESOURCE_MAX_FILES,
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Output file; relative paths resolve against the results root.
    pub output: PathBuf,
    pub title: String,
    pub chart_js_url: String,
    pub scan: ScanOptions,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            title: DEFAULT_TITLE.to_string(),
            chart_js_url: DEFAULT_CHART_JS_URL.to_string(),
            scan: ScanOptions::default(),
        }
    }
}

impl ReportConfig {
    /// Build the typed view from a merged layer.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric key holds something other than a
    /// non-negative integer.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let mut config = Self::default();

        if let Some(output) = non_empty(layer.get("output")) {
            config.output = PathBuf::from(output);
        }
        if let Some(title) = non_empty(layer.get("title")) {
            config.title = title.to_string();
        }
        if let Some(url) = non_empty(layer.get("chart-js-url")) {
            config.chart_js_url = url.to_string();
        }
        if let Some(prefix) = non_empty(layer.get("run-prefix")) {
            config.scan.run_prefix = prefix.to_string();
        }
        if let Some(value) = parse_number(layer, "console-log-max-lines")? {
            config.scan.console_log_max_lines = value;
        }
        if let Some(value) = parse_number(layer, "artifact-log-tail-lines")? {
            config.scan.artifact_log_tail_lines = value;
        }
        if let Some(value) = parse_number(layer, "resource-max-bytes")? {
            config.scan.resource_max_bytes = value;
        }
        if let Some(value) = parse_number(layer, "resource-max-files")? {
            config.scan.resource_max_files = value;
        }

        Ok(config)
    }

    /// Absolute location of the report for a given results root.
    #[must_use]
    pub fn output_path(&self, results_dir: &Path) -> PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            results_dir.join(&self.output)
        }
    }
}

/// A flat layer of normalized `key -> value` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "Loading config file");
        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))?;
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from `E2E_REPORT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Build a layer from an explicit variable list.
    #[must_use]
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.insert(stripped, value);
            }
        }
        layer
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub run_prefix: Option<String>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(output) = &self.output {
            layer.insert("output", output.to_string_lossy().to_string());
        }
        if let Some(title) = &self.title {
            layer.insert("title", title.clone());
        }
        if let Some(prefix) = &self.run_prefix {
            layer.insert("run-prefix", prefix.clone());
        }

        layer
    }
}

/// Load user config (~/.config/e2e-report/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("e2e-report")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Load the results-root config, or the explicit `--config` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if an explicit
/// config file does not exist.
pub fn load_project_config(results_dir: &Path, explicit: Option<&Path>) -> Result<ConfigLayer> {
    match explicit {
        Some(path) if !path.exists() => Err(ReportError::Config(format!(
            "config file not found: {}",
            path.display()
        ))),
        Some(path) => ConfigLayer::from_yaml(path),
        None => ConfigLayer::from_yaml(&results_dir.join(PROJECT_CONFIG_FILENAME)),
    }
}

/// Load configuration with the full precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed, or a value
/// is invalid.
pub fn load_config(results_dir: &Path, cli: &CliOverrides) -> Result<ReportConfig> {
    let user = load_user_config()?;
    let project = load_project_config(results_dir, cli.config.as_deref())?;
    let env_layer = ConfigLayer::from_env();
    let cli_layer = cli.as_layer();

    let merged = ConfigLayer::merge_layers(&[user, project, env_layer, cli_layer]);
    ReportConfig::from_layer(&merged)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(layer: &ConfigLayer, key: &str) -> Result<Option<T>> {
    match non_empty(layer.get(key)) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            ReportError::config(key, format!("expected a non-negative integer, got '{raw}'"))
        }),
    }
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    let mut layer = ConfigLayer::default();
    for (key, value) in flat {
        layer.insert(&key, value);
    }
    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::Sequence(values) => {
            let joined = values
                .iter()
                .filter_map(yaml_scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
