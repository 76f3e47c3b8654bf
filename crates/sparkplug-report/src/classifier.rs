//! Lexical rule tables that assign profiles and optional feature groups.
//!
//! Both tables are ordered and the first matching rule wins. Matching is a
//! substring test against the upper-cased assertion id.

use crate::types::Profile;

/// Maps an id substring to the profile a cross-cutting assertion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileRule {
    pub hint: &'static str,
    pub profile: Profile,
}

/// Maps an id substring to an optional feature group label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRule {
    pub hint: &'static str,
    pub label: &'static str,
}

/// Edge hints come before Host hints.
pub const PROFILE_RULES: [ProfileRule; 11] = [
    ProfileRule {
        hint: "EDGE",
        profile: Profile::Edge,
    },
    ProfileRule {
        hint: "DEVICE",
        profile: Profile::Edge,
    },
    ProfileRule {
        hint: "NDATA",
        profile: Profile::Edge,
    },
    ProfileRule {
        hint: "DDATA",
        profile: Profile::Edge,
    },
    ProfileRule {
        hint: "DBIRTH",
        profile: Profile::Edge,
    },
    ProfileRule {
        hint: "NBIRTH",
        profile: Profile::Edge,
    },
    ProfileRule {
        hint: "DDEATH",
        profile: Profile::Edge,
    },
    ProfileRule {
        hint: "NDEATH",
        profile: Profile::Edge,
    },
    ProfileRule {
        hint: "RBE",
        profile: Profile::Edge,
    },
    ProfileRule {
        hint: "HOST",
        profile: Profile::Host,
    },
    ProfileRule {
        hint: "STATE",
        profile: Profile::Host,
    },
];

pub const GROUP_RULES: [GroupRule; 7] = [
    GroupRule {
        hint: "MULTIPLE",
        label: "Multiple Brokers",
    },
    GroupRule {
        hint: "REORDERING",
        label: "Message Reordering",
    },
    GroupRule {
        hint: "TEMPLATE",
        label: "Templates",
    },
    GroupRule {
        hint: "PROPERTY",
        label: "Properties",
    },
    GroupRule {
        hint: "DATASET",
        label: "Datasets",
    },
    GroupRule {
        hint: "ALIAS",
        label: "Aliases",
    },
    GroupRule {
        hint: "AWARE",
        label: "Aware",
    },
];

/// Where a cross-cutting monitor assertion is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAssignment {
    Single(Profile),
    /// No hint matched: the assertion is meaningful under Host and Edge alike.
    HostAndEdge,
}

impl ProfileAssignment {
    #[must_use]
    pub fn profiles(self) -> &'static [Profile] {
        match self {
            Self::Single(Profile::Broker) => &[Profile::Broker],
            Self::Single(Profile::Host) => &[Profile::Host],
            Self::Single(Profile::Edge) => &[Profile::Edge],
            Self::HostAndEdge => &[Profile::Host, Profile::Edge],
        }
    }
}

#[must_use]
pub fn classify_cross_cutting(assertion_id: &str) -> ProfileAssignment {
    let upper = assertion_id.to_uppercase();
    PROFILE_RULES
        .iter()
        .find(|rule| upper.contains(rule.hint))
        .map_or(ProfileAssignment::HostAndEdge, |rule| {
            ProfileAssignment::Single(rule.profile)
        })
}

/// Returns the optional group label of an id, or `None` for the main collection.
#[must_use]
pub fn optional_group(assertion_id: &str) -> Option<&'static str> {
    let upper = assertion_id.to_uppercase();
    GROUP_RULES
        .iter()
        .find(|rule| upper.contains(rule.hint))
        .map(|rule| rule.label)
}
