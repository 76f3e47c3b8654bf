//! Turns the TCK execution log into run and outcome events.
//!
//! The log is free text. Structure comes only from two sentinels:
//!
//! ```text
//! 2022-12-02 11:05:15.155 Summary Test Results for Edge SessionEstablishment
//! Monitor:payloads-timestamp-in-UTC: PASS;
//! topics-nbirth-mqtt: FAIL: NBIRTH not received;
//! OVERALL: FAIL;
//! ```
//!
//! Every line is classified once by [`classify_line`] and fed to a two-state
//! machine (scanning for a block, consuming assertion lines).

use crate::error::{ReportError, Result};
use crate::types::{canonical_assertion_id, Outcome, Profile};
use crate::universe::AssertionUniverse;
use tracing::{debug, info, trace, warn};

pub const SUMMARY_SENTINEL: &str = "Summary Test Results for";
pub const OVERALL_TOKEN: &str = "OVERALL";
pub const MONITOR_PREFIX: &str = "Monitor:";

/// Header line opening a result block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHeader {
    /// Date and time preceding the sentinel, empty when the line has none.
    pub timestamp: String,
    pub profile_token: String,
    /// Test name with all whitespace removed.
    pub test: String,
}

impl RunHeader {
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        Profile::from_token(&self.profile_token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    Header(RunHeader),
    Terminator,
    AssertionResult { raw_id: String, result: String },
    Other,
}

#[must_use]
pub fn classify_line(line: &str) -> LogLine {
    if let Some(pos) = line.find(SUMMARY_SENTINEL) {
        return LogLine::Header(parse_header(
            &line[..pos],
            &line[pos + SUMMARY_SENTINEL.len()..],
        ));
    }
    if line.contains(OVERALL_TOKEN) {
        return LogLine::Terminator;
    }

    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix(MONITOR_PREFIX).unwrap_or(trimmed);
    match trimmed.split_once(':') {
        Some((raw_id, result)) if !raw_id.trim().is_empty() => LogLine::AssertionResult {
            raw_id: raw_id.trim().to_string(),
            result: result.trim().trim_end_matches(';').trim_end().to_string(),
        },
        _ => LogLine::Other,
    }
}

fn parse_header(before: &str, after: &str) -> RunHeader {
    let timestamp = before.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
    let mut rest = after.trim().splitn(2, char::is_whitespace);
    let profile_token = rest.next().unwrap_or_default().to_string();
    let test = rest
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect::<String>();
    RunHeader {
        timestamp,
        profile_token,
        test,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// A result block opened. `profile` is `None` for an unrecognised token.
    RunStarted {
        profile: Option<Profile>,
        profile_token: String,
        test: String,
        timestamp: String,
        line: usize,
    },
    /// An assertion result routed to the profile whose map it updates.
    Outcome {
        profile: Profile,
        assertion_id: String,
        outcome: Outcome,
        line: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The id is in neither the block's profile nor its counterpart.
    UnknownAssertion,
    UnknownProfile,
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardedLine {
    pub line: usize,
    pub text: String,
    pub reason: DiscardReason,
}

/// Everything the correlator extracted from one log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelatedLog {
    pub events: Vec<LogEvent>,
    pub discarded: Vec<DiscardedLine>,
}

impl CorrelatedLog {
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, LogEvent::RunStarted { .. }))
            .count()
    }

    #[must_use]
    pub fn outcome_count(&self) -> usize {
        self.events.len() - self.run_count()
    }
}

#[derive(Debug)]
enum State {
    ScanningForBlock,
    ConsumingAssertionLines { header: RunHeader, line: usize },
}

/// Correlates log lines with a complete assertion universe.
pub struct LogCorrelator<'u> {
    universe: &'u AssertionUniverse,
}

impl<'u> LogCorrelator<'u> {
    #[must_use]
    pub fn new(universe: &'u AssertionUniverse) -> Self {
        Self { universe }
    }

    /// Profiles an outcome for `id` logged under `profile` is recorded in.
    ///
    /// An id known to the block's profile goes there, and also to the
    /// counterpart when it is a shared monitor id present in both. An id only
    /// known to the counterpart is rerouted there. Otherwise nothing matches.
    #[must_use]
    pub fn route(&self, profile: Profile, id: &str) -> Vec<Profile> {
        let counterpart = profile
            .counterpart()
            .filter(|other| self.universe.contains(*other, id));
        match (self.universe.contains(profile, id), counterpart) {
            (true, Some(other)) => vec![profile, other],
            (true, None) => vec![profile],
            (false, Some(other)) => vec![other],
            (false, None) => Vec::new(),
        }
    }

    /// Parses the whole log in one pass.
    ///
    /// Fails when a block is still open at end of input or is interrupted by
    /// the next summary header.
    pub fn correlate(&self, text: &str) -> Result<CorrelatedLog> {
        let mut log = CorrelatedLog::default();
        let mut state = State::ScanningForBlock;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            state = match (state, classify_line(raw)) {
                (State::ScanningForBlock, LogLine::Header(header)) => {
                    debug!(profile = %header.profile_token, test = %header.test, line = line_no, "result block");
                    log.events.push(LogEvent::RunStarted {
                        profile: header.profile(),
                        profile_token: header.profile_token.clone(),
                        test: header.test.clone(),
                        timestamp: header.timestamp.clone(),
                        line: line_no,
                    });
                    State::ConsumingAssertionLines {
                        header,
                        line: line_no,
                    }
                }
                (State::ScanningForBlock, _) => State::ScanningForBlock,
                (State::ConsumingAssertionLines { .. }, LogLine::Terminator) => {
                    State::ScanningForBlock
                }
                (State::ConsumingAssertionLines { header, line }, LogLine::Header(_)) => {
                    return Err(ReportError::InterruptedBlock {
                        profile: header.profile_token,
                        test: header.test,
                        line,
                        next_line: line_no,
                    });
                }
                (
                    State::ConsumingAssertionLines { header, line },
                    LogLine::AssertionResult { raw_id, result },
                ) => {
                    self.record(&mut log, &header, line_no, raw, &raw_id, result);
                    State::ConsumingAssertionLines { header, line }
                }
                (State::ConsumingAssertionLines { header, line }, LogLine::Other) => {
                    if !raw.trim().is_empty() {
                        warn!(
                            line = line_no,
                            text = raw.trim(),
                            "unparseable line inside result block"
                        );
                        log.discarded.push(DiscardedLine {
                            line: line_no,
                            text: raw.trim().to_string(),
                            reason: DiscardReason::Malformed,
                        });
                    }
                    State::ConsumingAssertionLines { header, line }
                }
            };
        }

        if let State::ConsumingAssertionLines { header, line } = state {
            return Err(ReportError::UnterminatedBlock {
                profile: header.profile_token,
                test: header.test,
                line,
            });
        }

        info!(
            runs = log.run_count(),
            outcomes = log.outcome_count(),
            discarded = log.discarded.len(),
            "execution log correlated"
        );
        Ok(log)
    }

    fn record(
        &self,
        log: &mut CorrelatedLog,
        header: &RunHeader,
        line_no: usize,
        raw: &str,
        raw_id: &str,
        result: String,
    ) {
        let Some(profile) = header.profile() else {
            warn!(profile = %header.profile_token, test = %header.test, line = line_no, "result for unknown profile discarded");
            log.discarded.push(DiscardedLine {
                line: line_no,
                text: raw.trim().to_string(),
                reason: DiscardReason::UnknownProfile,
            });
            return;
        };

        let assertion_id = canonical_assertion_id(raw_id);
        let targets = self.route(profile, &assertion_id);
        if targets.is_empty() {
            warn!(
                assertion = %assertion_id,
                profile = %profile,
                test = %header.test,
                line = line_no,
                "assertion not found in any profile, probably a monitor check"
            );
            log.discarded.push(DiscardedLine {
                line: line_no,
                text: raw.trim().to_string(),
                reason: DiscardReason::UnknownAssertion,
            });
            return;
        }

        trace!(assertion = %assertion_id, profile = %profile, test = %header.test, result = %result, "assertion result");
        let outcome = Outcome::new(header.test.clone(), header.timestamp.clone(), result);
        for target in targets {
            log.events.push(LogEvent::Outcome {
                profile: target,
                assertion_id: assertion_id.clone(),
                outcome: outcome.clone(),
                line: line_no,
            });
        }
    }
}
