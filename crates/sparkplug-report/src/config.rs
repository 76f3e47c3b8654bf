use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_REQUIREMENTS_MODULE: &str =
    "src/main/java/org/eclipse/sparkplug/tck/test/common/Requirements.java";
pub const DEFAULT_OUTPUT_PATH: &str = "summary.html";
pub const DEFAULT_TITLE: &str = "Eclipse\u{2122} Sparkplug\u{2122} TCK Results summary";

fn default_module_suffix() -> String {
    "Test.java".to_string()
}

fn default_monitor_module() -> String {
    "Monitor.java".to_string()
}

fn default_excluded_modules() -> Vec<String> {
    vec!["TCKTest.java".to_string()]
}

/// Where the report generator finds its inputs and writes its outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Root of the TCK source tree scanned for test modules.
    pub source_root: PathBuf,
    /// Requirements module holding the id/description constants.
    pub requirements_module: PathBuf,
    pub output_path: PathBuf,
    /// Optional machine-readable rendition of the same report.
    pub json_output: Option<PathBuf>,
    pub module_suffix: String,
    pub monitor_module: String,
    /// Abstract base modules skipped during discovery.
    pub excluded_modules: Vec<String>,
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            requirements_module: PathBuf::from(DEFAULT_REQUIREMENTS_MODULE),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            json_output: None,
            module_suffix: default_module_suffix(),
            monitor_module: default_monitor_module(),
            excluded_modules: default_excluded_modules(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl ReportConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a TOML file; unspecified keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ReportError::read(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ReportError::Configuration(e.to_string()))
    }

    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    #[must_use]
    pub fn with_requirements_module(mut self, path: impl Into<PathBuf>) -> Self {
        self.requirements_module = path.into();
        self
    }

    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    #[must_use]
    pub fn with_json_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_output = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded_modules.iter().any(|m| m == file_name)
    }

    pub fn validate(&self) -> Result<&Self> {
        if self.module_suffix.is_empty() {
            return Err(ReportError::Configuration(
                "module_suffix must not be empty".to_string(),
            ));
        }

        if self.monitor_module.is_empty() {
            return Err(ReportError::Configuration(
                "monitor_module must not be empty".to_string(),
            ));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ReportError::Configuration(
                "output_path must not be empty".to_string(),
            ));
        }

        if self.json_output.as_ref() == Some(&self.output_path) {
            return Err(ReportError::Configuration(
                "json_output must differ from output_path".to_string(),
            ));
        }

        Ok(self)
    }
}
