//! Conformance report model and its HTML, JSON and text renditions.
//!
//! Each profile's assertions are split into the main collection and the
//! optional feature groups, with pass statistics per group. Optional
//! assertions are excluded from the "without optional" pass rate.

use crate::aggregator::AggregatedResults;
use crate::classifier::optional_group;
use crate::error::{ReportError, Result};
use crate::requirements::NormativeLevel;
use crate::types::{Outcome, Profile, Verdict};
use crate::universe::AssertionUniverse;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Label of the residual collection of mandatory, ungrouped assertions.
pub const MAIN_GROUP: &str = "Main";

const STYLE: &str = "table, th, td {
        border-width: 1px;
        border-color: darkgray;
        border-collapse: collapse;
        border-style: solid;
        padding: 5px;
        text-align: left;
    }";
const STATS_HEADER: &str = "<tr><th>Assertion count</th><th>Number passed</th><th>Number failed</th><th>Percent passed</th></tr>";
const OPTIONAL_STATS_HEADER: &str = "<tr><th>Optional assertion count</th><th>Optional number passed</th><th> </th><th>Percent passed without optional</th></tr>";
const ASSERTION_HEADER: &str = "<tr><th>Assertion ID</th><th>Assertion Type</th><th>Test</th><th>Time</th><th>Result</th></tr>";

/// Normative level as shown in the report, flagged optional when the
/// assertion sits in a feature group or is not a `MUST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssertionType {
    pub level: NormativeLevel,
    pub optional: bool,
}

impl AssertionType {
    #[must_use]
    pub fn new(level: NormativeLevel, grouped: bool) -> Self {
        Self {
            level,
            optional: grouped || level != NormativeLevel::Must,
        }
    }
}

impl fmt::Display for AssertionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{} optional", self.level)
        } else {
            write!(f, "{}", self.level)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionRow {
    pub id: String,
    pub assertion_type: AssertionType,
    /// `None` when the log never mentioned the assertion.
    pub outcome: Option<Outcome>,
}

impl AssertionRow {
    fn verdict(&self) -> Option<Verdict> {
        self.outcome.as_ref().map(Outcome::verdict)
    }
}

/// `floor(part / whole * 100)`, or 0 for an empty denominator.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> usize {
    if whole == 0 {
        0
    } else {
        part * 100 / whole
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub count: usize,
    pub passed: usize,
    pub failed: usize,
    pub percent_passed: usize,
    pub optional_count: usize,
    pub optional_passed: usize,
    pub percent_passed_without_optional: usize,
}

impl GroupStats {
    #[must_use]
    pub fn from_rows(rows: &[AssertionRow]) -> Self {
        let mut stats = Self {
            count: rows.len(),
            ..Self::default()
        };
        for row in rows {
            let optional = row.assertion_type.optional;
            if optional {
                stats.optional_count += 1;
            }
            match row.verdict() {
                Some(Verdict::Pass) => {
                    stats.passed += 1;
                    if optional {
                        stats.optional_passed += 1;
                    }
                }
                Some(Verdict::Fail) => stats.failed += 1,
                Some(Verdict::Other) | None => {}
            }
        }
        stats.finalize()
    }

    fn finalize(mut self) -> Self {
        self.percent_passed = percentage(self.passed, self.count);
        self.percent_passed_without_optional = percentage(
            self.passed - self.optional_passed,
            self.count - self.optional_count,
        );
        self
    }

    fn absorb(mut self, other: &Self) -> Self {
        self.count += other.count;
        self.passed += other.passed;
        self.failed += other.failed;
        self.optional_count += other.optional_count;
        self.optional_passed += other.optional_passed;
        self.finalize()
    }

    #[must_use]
    pub fn has_optional(&self) -> bool {
        self.optional_count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSection {
    pub label: String,
    pub stats: GroupStats,
    pub rows: Vec<AssertionRow>,
}

impl GroupSection {
    fn new(label: &str, rows: Vec<AssertionRow>) -> Self {
        Self {
            label: label.to_string(),
            stats: GroupStats::from_rows(&rows),
            rows,
        }
    }

    #[must_use]
    pub fn row(&self, id: &str) -> Option<&AssertionRow> {
        self.rows.iter().find(|r| r.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSection {
    pub profile: Profile,
    /// Main collection first, then the non-empty feature groups by label.
    pub groups: Vec<GroupSection>,
}

impl ProfileSection {
    #[must_use]
    pub fn group(&self, label: &str) -> Option<&GroupSection> {
        self.groups.iter().find(|g| g.label == label)
    }

    /// Statistics over every group of the profile.
    #[must_use]
    pub fn totals(&self) -> GroupStats {
        self.groups
            .iter()
            .fold(GroupStats::default().finalize(), |acc, g| acc.absorb(&g.stats))
    }

    #[must_use]
    pub fn row(&self, id: &str) -> Option<&AssertionRow> {
        self.groups.iter().find_map(|g| g.row(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformanceReport {
    pub title: String,
    pub generated_at: String,
    /// Duplicate-run warnings, surfaced in the report header.
    pub warnings: Vec<String>,
    pub profiles: Vec<ProfileSection>,
    pub assertion_count: usize,
}

impl ConformanceReport {
    /// Groups every profile's assertions and attaches their final outcomes.
    #[must_use]
    pub fn build(
        universe: &AssertionUniverse,
        results: &AggregatedResults,
        title: &str,
        generated_at: &str,
    ) -> Self {
        let profiles: Vec<ProfileSection> = Profile::ALL
            .into_iter()
            .map(|profile| build_profile(universe, results, profile))
            .collect();
        let assertion_count = profiles
            .iter()
            .flat_map(|p| &p.groups)
            .map(|g| g.rows.len())
            .sum();

        Self {
            title: title.to_string(),
            generated_at: generated_at.to_string(),
            warnings: results.warnings.clone(),
            profiles,
            assertion_count,
        }
    }

    #[must_use]
    pub fn profile(&self, profile: Profile) -> Option<&ProfileSection> {
        self.profiles.iter().find(|p| p.profile == profile)
    }

    /// Renders the self-contained HTML summary document.
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        let title = escape_html(&self.title);
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        let _ = writeln!(out, "<title>{title}</title>");
        let _ = writeln!(out, "<style>\n    {STYLE}\n</style>");
        out.push_str("</head>\n<body>\n");
        let _ = writeln!(out, "<h1>{title}</h1>");
        let _ = writeln!(out, "<p>Date: {}</p>", escape_html(&self.generated_at));

        for warning in &self.warnings {
            let _ = writeln!(out, "<h3 class=\"warning\">{}</h3>", escape_html(warning));
        }

        for section in &self.profiles {
            let _ = writeln!(out, "<h2>Sparkplug Profile: {}</h2>", section.profile);
            for group in &section.groups {
                render_group_html(&mut out, group);
            }
        }

        let _ = writeln!(out, "<h3>Overall count: {}</h3>", self.assertion_count);
        out.push_str("</body>\n</html>\n");
        out
    }

    pub fn generate_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Serialization(e.to_string()))
    }

    /// Plain-text summary with a status marker for every assertion.
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"=".repeat(60));
        out.push('\n');
        for warning in &self.warnings {
            let _ = writeln!(out, "{warning}");
        }

        for section in &self.profiles {
            let totals = section.totals();
            let _ = writeln!(
                out,
                "\n{}: {}/{} passed, {} failed ({}%)",
                section.profile, totals.passed, totals.count, totals.failed, totals.percent_passed
            );
            for group in &section.groups {
                let stats = &group.stats;
                let _ = writeln!(
                    out,
                    "  {} Group: {}/{} passed, {} failed ({}%, {}% without optional)",
                    group.label,
                    stats.passed,
                    stats.count,
                    stats.failed,
                    stats.percent_passed,
                    stats.percent_passed_without_optional
                );
                for row in &group.rows {
                    let marker = match row.verdict() {
                        Some(Verdict::Pass) => "[PASS]",
                        Some(Verdict::Fail) => "[FAIL]",
                        Some(Verdict::Other) => "[ ?? ]",
                        None => "[    ]",
                    };
                    let _ = writeln!(out, "    {marker} {} ({})", row.id, row.assertion_type);
                }
            }
        }
        let _ = writeln!(out, "\nOverall count: {}", self.assertion_count);
        out
    }
}

fn build_profile(
    universe: &AssertionUniverse,
    results: &AggregatedResults,
    profile: Profile,
) -> ProfileSection {
    let mut main = Vec::new();
    let mut grouped: BTreeMap<&'static str, Vec<AssertionRow>> = BTreeMap::new();

    for id in universe.ids(profile) {
        let group = optional_group(id);
        let row = AssertionRow {
            id: id.to_string(),
            assertion_type: AssertionType::new(universe.level_of(id), group.is_some()),
            outcome: results.outcome(profile, id).cloned(),
        };
        match group {
            Some(label) => grouped.entry(label).or_default().push(row),
            None => main.push(row),
        }
    }

    let mut groups = vec![GroupSection::new(MAIN_GROUP, main)];
    groups.extend(
        grouped
            .into_iter()
            .map(|(label, rows)| GroupSection::new(label, rows)),
    );
    ProfileSection { profile, groups }
}

fn render_group_html(out: &mut String, group: &GroupSection) {
    let stats = &group.stats;
    let _ = writeln!(out, "<h3>{} Group</h3>", escape_html(&group.label));

    out.push_str("<table>\n");
    out.push_str(STATS_HEADER);
    let _ = writeln!(
        out,
        "\n<tr><td>{}</td><td>{}</td><td>{}</td><td>{}%</td></tr>",
        stats.count, stats.passed, stats.failed, stats.percent_passed
    );
    if stats.has_optional() {
        out.push_str(OPTIONAL_STATS_HEADER);
        let _ = writeln!(
            out,
            "\n<tr><td>{}</td><td>{}</td><td>-</td><td>{}%</td></tr>",
            stats.optional_count, stats.optional_passed, stats.percent_passed_without_optional
        );
    }
    out.push_str("</table>\n<br/>\n");

    out.push_str("<table>\n");
    out.push_str(ASSERTION_HEADER);
    out.push('\n');
    for row in &group.rows {
        let (test, time, result) = row
            .outcome
            .as_ref()
            .map_or(("", "", ""), |o| (o.test.as_str(), o.timestamp.as_str(), o.result.as_str()));
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.id),
            row.assertion_type,
            escape_html(test),
            escape_html(time),
            escape_html(result)
        );
    }
    out.push_str("</table>\n");
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
