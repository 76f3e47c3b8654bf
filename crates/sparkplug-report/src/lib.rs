//! Sparkplug TCK compliance report generator.
//!
//! Reads the assertion ids each TCK test module declares, resolves their
//! normative level from the requirements module, correlates them with the
//! results recorded in a TCK execution log and renders a per-profile
//! conformance summary.
//!
//! The [`pipeline`] module drives the stages in order; each stage is usable
//! on its own:
//!
//! - [`extractor`] and [`discovery`] find the declared assertion ids
//! - [`requirements`] parses descriptions into a [`RequirementCatalog`]
//! - [`classifier`] places cross-cutting ids and optional feature groups
//! - [`correlator`] parses the log into run and outcome events
//! - [`aggregator`] folds events with the sticky-failure rule
//! - [`report`] renders HTML, JSON and text

#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod correlator;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod report;
pub mod requirements;
pub mod types;
pub mod universe;

pub use aggregator::{AggregatedResults, MergeDecision, ResultAggregator};
pub use config::ReportConfig;
pub use correlator::{CorrelatedLog, LogCorrelator, LogEvent};
pub use error::{ReportError, Result};
pub use pipeline::ReportGenerator;
pub use report::{ConformanceReport, GroupStats};
pub use requirements::{NormativeLevel, Requirement, RequirementCatalog};
pub use types::{canonical_assertion_id, Outcome, Profile, Verdict};
pub use universe::AssertionUniverse;
