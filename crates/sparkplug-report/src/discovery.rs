//! Locates the TCK test modules that declare assertion ids.

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::types::Profile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A test module and the profile its directory places it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileModule {
    pub profile: Profile,
    pub path: PathBuf,
}

/// Modules found under the source root, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceModules {
    pub profile_modules: Vec<ProfileModule>,
    /// Cross-cutting monitor modules whose ids are classified lexically.
    pub monitor_modules: Vec<PathBuf>,
}

/// Profile of a module from its location, e.g. `.../test/edge/SendDataTest.java`.
#[must_use]
pub fn profile_for_path(path: &Path) -> Option<Profile> {
    let normalized = path.to_string_lossy().replace('\\', "/");
    Profile::ALL.into_iter().find(|profile| {
        let segment = format!("test/{}/", profile.as_str().to_ascii_lowercase());
        normalized.contains(&segment)
    })
}

pub fn discover_modules(config: &ReportConfig) -> Result<SourceModules> {
    let mut files = Vec::new();
    collect_files(&config.source_root, &mut files)?;
    files.sort();

    let mut modules = SourceModules::default();
    for path in files {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if file_name == config.monitor_module {
            debug!(path = %path.display(), "monitor module");
            modules.monitor_modules.push(path);
            continue;
        }

        if !file_name.ends_with(&config.module_suffix) {
            continue;
        }

        if config.is_excluded(file_name) {
            debug!(path = %path.display(), "skipping excluded base module");
            continue;
        }

        match profile_for_path(&path) {
            Some(profile) => modules.profile_modules.push(ProfileModule { profile, path }),
            None => debug!(path = %path.display(), "test module outside any profile directory"),
        }
    }

    Ok(modules)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| ReportError::read(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ReportError::read(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| ReportError::read(&path, e))?;
        if file_type.is_dir() {
            collect_files(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
