//! Reads the requirements module into an assertion id → description catalog.
//!
//! The module pairs an identifier constant with a description constant for
//! every assertion:
//!
//! ```text
//! public final static String ID_INTRO_GROUP_ID_STRING = "intro-group-id-string";
//! public final static String INTRO_GROUP_ID_STRING = "The Group ID MUST be a UTF-8 string ...";
//! ```
//!
//! The description's normative keyword decides the assertion type.

use crate::error::{ReportError, Result};
use crate::types::ASSERTION_ID_PREFIX;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, warn};

static CONSTANT_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?:public|private|protected|final|static)\s+)*String\s+([A-Za-z0-9_]+)\s*=(.*)$")
        .expect("valid constant declaration pattern")
});

static QUOTED_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid quoted segment pattern")
});

static NORMATIVE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(MUST|SHOULD|MAY)\b").expect("valid keyword pattern"));

/// RFC 2119 requirement level of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormativeLevel {
    Must,
    Should,
    May,
}

impl NormativeLevel {
    /// Derives the level from a description. `SHOULD` outranks `MAY`, which
    /// outranks `MUST`, so "MUST ... MAY ..." reads as `May`.
    #[must_use]
    pub fn from_description(description: &str) -> Option<Self> {
        let mut level = None;
        for keyword in NORMATIVE_KEYWORD.find_iter(description) {
            let found = match keyword.as_str() {
                "SHOULD" => Self::Should,
                "MAY" => Self::May,
                _ => Self::Must,
            };
            level = Some(match (level, found) {
                (Some(Self::Should), _) | (_, Self::Should) => Self::Should,
                (Some(Self::May), _) | (_, Self::May) => Self::May,
                _ => Self::Must,
            });
        }
        level
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Must => "MUST",
            Self::Should => "SHOULD",
            Self::May => "MAY",
        }
    }
}

impl fmt::Display for NormativeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normative statement of the Sparkplug standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    /// The dashed form used in the published document, e.g. `intro-group-id-string`.
    pub spec_id: String,
    pub description: String,
    pub level: NormativeLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementCatalog {
    entries: BTreeMap<String, Requirement>,
}

impl RequirementCatalog {
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| ReportError::read(path, e))?;
        let catalog = Self::parse(&source)?;
        debug!(path = %path.display(), requirements = catalog.len(), "requirements module resolved");
        Ok(catalog)
    }

    /// Builds the catalog from the text of the requirements module.
    ///
    /// Fails on the first description that carries no normative keyword.
    pub fn parse(source: &str) -> Result<Self> {
        let constants = read_string_constants(source);

        let mut entries = BTreeMap::new();
        for (name, spec_id) in &constants {
            let Some(description_name) = name.strip_prefix(ASSERTION_ID_PREFIX) else {
                continue;
            };
            let Some(description) = constants.get(description_name) else {
                warn!(id = %name, "identifier constant has no matching description constant");
                continue;
            };
            let level = NormativeLevel::from_description(description).ok_or_else(|| {
                ReportError::MissingNormativeKeyword {
                    id: name.clone(),
                    description: description.clone(),
                }
            })?;
            entries.insert(
                name.clone(),
                Requirement {
                    id: name.clone(),
                    spec_id: spec_id.clone(),
                    description: description.clone(),
                    level,
                },
            );
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Requirement> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn level_of(&self, id: &str) -> Option<NormativeLevel> {
        self.entries.get(id).map(|r| r.level)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Requirement> for RequirementCatalog {
    fn from_iter<I: IntoIterator<Item = Requirement>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }
}

/// Collects every `String NAME = "..." [+ "..."]*;` constant, joining
/// concatenated segments that continue over following lines.
fn read_string_constants(source: &str) -> BTreeMap<String, String> {
    let mut constants = BTreeMap::new();
    let mut lines = source.lines();

    while let Some(line) = lines.next() {
        let Some(caps) = CONSTANT_DECLARATION.captures(line) else {
            continue;
        };
        let name = caps[1].to_string();
        let mut value_text = caps[2].to_string();
        while !value_text.trim_end().ends_with(';') {
            match lines.next() {
                Some(next) => {
                    value_text.push('\n');
                    value_text.push_str(next);
                }
                None => break,
            }
        }

        let value: String = QUOTED_SEGMENT
            .captures_iter(&value_text)
            .map(|segment| unescape(&segment[1]))
            .collect();
        constants.insert(name, value);
    }

    constants
}

fn unescape(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
