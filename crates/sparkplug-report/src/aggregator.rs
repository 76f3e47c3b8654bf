//! Folds correlated log events into one outcome per assertion and profile.
//!
//! A recorded failure is sticky: later results for the same assertion never
//! replace it. Any other stored outcome is replaced by the newest one.

use crate::correlator::{CorrelatedLog, LogEvent};
use crate::types::{Outcome, Profile};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// What [`merge`] decided for an incoming outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    /// First outcome seen for the assertion.
    Recorded(Outcome),
    /// The stored non-failing outcome is replaced.
    Replaced(Outcome),
    /// The stored outcome is a failure and stays; the incoming one is dropped.
    KeptFailure,
}

/// Pure merge rule between the stored and the incoming outcome.
#[must_use]
pub fn merge(current: Option<&Outcome>, incoming: Outcome) -> MergeDecision {
    match current {
        None => MergeDecision::Recorded(incoming),
        Some(stored) if stored.is_failure() => MergeDecision::KeptFailure,
        Some(_) => MergeDecision::Replaced(incoming),
    }
}

/// Text of the warning emitted when a test produces more than one result block.
#[must_use]
pub fn duplicate_run_warning(profile: &str, test: &str) -> String {
    format!(
        "Warning: test: {profile}.{test} logged more than once. Any previously failing assertion will not be overwritten by a later success."
    )
}

/// Final per-profile outcome maps and the warnings raised while building them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedResults {
    outcomes: BTreeMap<Profile, BTreeMap<String, Outcome>>,
    pub warnings: Vec<String>,
}

impl AggregatedResults {
    #[must_use]
    pub fn outcome(&self, profile: Profile, id: &str) -> Option<&Outcome> {
        self.outcomes.get(&profile).and_then(|m| m.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accumulates outcomes across all result blocks of one log.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    outcomes: BTreeMap<Profile, BTreeMap<String, Outcome>>,
    executed: BTreeSet<(String, String)>,
    warnings: BTreeSet<String>,
}

impl ResultAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the start of a result block.
    ///
    /// Returns true when the same profile and test already produced a block.
    /// The warning is recorded on every repeat, whether or not any assertion
    /// ends up conflicting, since conflicts are only visible during [`merge`].
    pub fn begin_run(&mut self, profile_token: &str, test: &str) -> bool {
        let profile = Profile::from_token(profile_token)
            .map_or_else(|| profile_token.to_string(), |p| p.as_str().to_string());
        let repeated = !self.executed.insert((profile.clone(), test.to_string()));
        if repeated {
            let warning = duplicate_run_warning(&profile, test);
            info!("{warning}");
            self.warnings.insert(warning);
        }
        repeated
    }

    /// Applies the merge rule to one outcome and returns the decision taken.
    pub fn merge(
        &mut self,
        profile: Profile,
        assertion_id: &str,
        outcome: Outcome,
    ) -> MergeDecision {
        let results = self.outcomes.entry(profile).or_default();
        let decision = merge(results.get(assertion_id), outcome);
        match &decision {
            MergeDecision::Recorded(outcome) | MergeDecision::Replaced(outcome) => {
                results.insert(assertion_id.to_string(), outcome.clone());
            }
            MergeDecision::KeptFailure => {
                debug!(assertion = assertion_id, profile = %profile, "keeping earlier failure");
            }
        }
        decision
    }

    pub fn apply(&mut self, event: LogEvent) {
        match event {
            LogEvent::RunStarted {
                profile_token,
                test,
                ..
            } => {
                self.begin_run(&profile_token, &test);
            }
            LogEvent::Outcome {
                profile,
                assertion_id,
                outcome,
                ..
            } => {
                self.merge(profile, &assertion_id, outcome);
            }
        }
    }

    pub fn apply_log(&mut self, log: CorrelatedLog) {
        for event in log.events {
            self.apply(event);
        }
    }

    #[must_use]
    pub fn finish(self) -> AggregatedResults {
        AggregatedResults {
            outcomes: self.outcomes,
            warnings: self.warnings.into_iter().collect(),
        }
    }
}
