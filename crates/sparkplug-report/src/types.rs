//! Core value types shared by every stage of the report pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by every canonical assertion identifier.
pub const ASSERTION_ID_PREFIX: &str = "ID_";

/// Sparkplug conformance profile an assertion is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Profile {
    Broker,
    Host,
    Edge,
}

impl Profile {
    /// Report order of the profile sections.
    pub const ALL: [Profile; 3] = [Profile::Broker, Profile::Host, Profile::Edge];

    /// Parses a profile token from a log header, ignoring case.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "broker" => Some(Self::Broker),
            "host" => Some(Self::Host),
            "edge" => Some(Self::Edge),
            _ => None,
        }
    }

    /// Host and Edge share the cross-cutting monitor assertions; Broker has no counterpart.
    #[must_use]
    pub fn counterpart(self) -> Option<Self> {
        match self {
            Self::Host => Some(Self::Edge),
            Self::Edge => Some(Self::Host),
            Self::Broker => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Broker => "Broker",
            Self::Host => "Host",
            Self::Edge => "Edge",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a free-form result label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
    Other,
}

impl Verdict {
    #[must_use]
    pub fn of(label: &str) -> Self {
        if label.starts_with("PASS") {
            Self::Pass
        } else if label.starts_with("FAIL") {
            Self::Fail
        } else {
            Self::Other
        }
    }
}

/// One observed result for an assertion: which test logged it, when, and the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub test: String,
    pub timestamp: String,
    pub result: String,
}

impl Outcome {
    #[must_use]
    pub fn new(
        test: impl Into<String>,
        timestamp: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            test: test.into(),
            timestamp: timestamp.into(),
            result: result.into(),
        }
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::of(&self.result)
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.verdict() == Verdict::Fail
    }
}

/// Converts a raw logged id such as `payloads-timestamp-in-UTC` into the
/// canonical `ID_PAYLOADS_TIMESTAMP_IN_UTC` form.
#[must_use]
pub fn canonical_assertion_id(raw: &str) -> String {
    let normalized = raw.trim().to_uppercase().replace('-', "_");
    if normalized.starts_with(ASSERTION_ID_PREFIX) {
        normalized
    } else {
        format!("{ASSERTION_ID_PREFIX}{normalized}")
    }
}
