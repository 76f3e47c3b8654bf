//! The immutable set of assertions each profile is reported against.

use crate::classifier::classify_cross_cutting;
use crate::config::ReportConfig;
use crate::discovery::discover_modules;
use crate::error::{ReportError, Result};
use crate::extractor::extract_declaration;
use crate::requirements::{NormativeLevel, RequirementCatalog};
use crate::types::Profile;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Per-profile assertion ids plus the requirement catalog describing them.
///
/// Built once per report and never mutated afterwards; the log correlator
/// relies on it being complete before the first log line is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssertionUniverse {
    profiles: BTreeMap<Profile, BTreeSet<String>>,
    catalog: RequirementCatalog,
}

impl AssertionUniverse {
    #[must_use]
    pub fn builder() -> UniverseBuilder {
        UniverseBuilder::default()
    }

    /// Scans the configured source tree and requirements module.
    pub fn discover(config: &ReportConfig) -> Result<Self> {
        let modules = discover_modules(config)?;
        let mut builder = Self::builder();

        for module in &modules.profile_modules {
            if let Some(ids) = read_declared_ids(&module.path)? {
                debug!(profile = %module.profile, path = %module.path.display(), count = ids.len(), "declared assertions");
                builder = builder.add_profile_ids(module.profile, ids);
            }
        }

        for path in &modules.monitor_modules {
            if let Some(ids) = read_declared_ids(path)? {
                debug!(path = %path.display(), count = ids.len(), "cross-cutting assertions");
                builder = builder.add_cross_cutting(ids);
            }
        }

        let catalog = RequirementCatalog::load(&config.requirements_module)?;
        let universe = builder.with_catalog(catalog).build();

        info!(
            broker = universe.len(Profile::Broker),
            host = universe.len(Profile::Host),
            edge = universe.len(Profile::Edge),
            requirements = universe.catalog.len(),
            "assertion universe built"
        );
        Ok(universe)
    }

    #[must_use]
    pub fn contains(&self, profile: Profile, id: &str) -> bool {
        self.profiles.get(&profile).is_some_and(|ids| ids.contains(id))
    }

    /// Ids of a profile in ascending order.
    pub fn ids(&self, profile: Profile) -> impl Iterator<Item = &str> {
        self.profiles
            .get(&profile)
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    #[must_use]
    pub fn len(&self, profile: Profile) -> usize {
        self.profiles.get(&profile).map_or(0, BTreeSet::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.values().all(BTreeSet::is_empty)
    }

    /// Profiles whose universe contains `id`, in report order.
    #[must_use]
    pub fn profiles_of(&self, id: &str) -> Vec<Profile> {
        Profile::ALL
            .into_iter()
            .filter(|profile| self.contains(*profile, id))
            .collect()
    }

    #[must_use]
    pub fn catalog(&self) -> &RequirementCatalog {
        &self.catalog
    }

    /// Normative level of an id; ids without a catalog entry read as `MUST`.
    #[must_use]
    pub fn level_of(&self, id: &str) -> NormativeLevel {
        self.catalog.level_of(id).unwrap_or(NormativeLevel::Must)
    }

    /// Logs every universe id that has no description in the catalog.
    pub fn warn_undescribed(&self) {
        let undescribed: BTreeSet<&str> = self
            .profiles
            .values()
            .flatten()
            .map(String::as_str)
            .filter(|id| self.catalog.get(id).is_none())
            .collect();
        for id in undescribed {
            warn!(
                id,
                "assertion has no description in the requirements module, treating it as MUST"
            );
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UniverseBuilder {
    profiles: BTreeMap<Profile, BTreeSet<String>>,
    catalog: RequirementCatalog,
}

impl UniverseBuilder {
    #[must_use]
    pub fn add_profile_ids<I, S>(mut self, profile: Profile, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles
            .entry(profile)
            .or_default()
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds monitor ids, placing each by the lexical profile rules.
    #[must_use]
    pub fn add_cross_cutting<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            for profile in classify_cross_cutting(&id).profiles() {
                self.profiles.entry(*profile).or_default().insert(id.clone());
            }
        }
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: RequirementCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn build(self) -> AssertionUniverse {
        AssertionUniverse {
            profiles: self.profiles,
            catalog: self.catalog,
        }
    }
}

fn read_declared_ids(path: &Path) -> Result<Option<BTreeSet<String>>> {
    let source = std::fs::read_to_string(path).map_err(|e| ReportError::read(path, e))?;
    let Some(declaration) = extract_declaration(&source) else {
        debug!(path = %path.display(), "no testIds declaration");
        return Ok(None);
    };
    if !declaration.duplicates.is_empty() {
        warn!(
            path = %path.display(),
            duplicates = ?declaration.duplicates,
            "module declares assertion ids more than once"
        );
    }
    Ok(Some(declaration.ids))
}
