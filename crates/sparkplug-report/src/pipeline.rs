//! End-to-end report generation: universe, log, aggregation, rendering.

use crate::aggregator::ResultAggregator;
use crate::config::ReportConfig;
use crate::correlator::LogCorrelator;
use crate::error::{ReportError, Result};
use crate::report::ConformanceReport;
use crate::universe::AssertionUniverse;
use std::fs;
use std::path::Path;
use tracing::info;

/// Owns the configuration and drives every stage for one report run.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    #[must_use]
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn build_universe(&self) -> Result<AssertionUniverse> {
        let universe = AssertionUniverse::discover(&self.config)?;
        universe.warn_undescribed();
        Ok(universe)
    }

    /// Correlates the log against the universe and builds the report model.
    pub fn generate(
        &self,
        universe: &AssertionUniverse,
        log_text: &str,
        generated_at: &str,
    ) -> Result<ConformanceReport> {
        let log = LogCorrelator::new(universe).correlate(log_text)?;

        let mut aggregator = ResultAggregator::new();
        aggregator.apply_log(log);
        let results = aggregator.finish();

        Ok(ConformanceReport::build(
            universe,
            &results,
            &self.config.title,
            generated_at,
        ))
    }

    /// Runs the whole pipeline and writes the HTML report, plus the JSON
    /// rendition when configured.
    ///
    /// Nothing is written unless every stage succeeds.
    pub fn run(&self, log_path: &Path, generated_at: &str) -> Result<ConformanceReport> {
        self.config.validate()?;

        let log_text = fs::read_to_string(log_path).map_err(|e| ReportError::read(log_path, e))?;
        let universe = self.build_universe()?;
        let report = self.generate(&universe, &log_text, generated_at)?;

        let html = report.render_html();
        let json = match &self.config.json_output {
            Some(path) => Some((path, report.generate_json()?)),
            None => None,
        };

        write_output(&self.config.output_path, &html)?;
        info!(path = %self.config.output_path.display(), assertions = report.assertion_count, "report written");

        if let Some((path, json)) = json {
            write_output(path, &json)?;
            info!(path = %path.display(), "json report written");
        }

        Ok(report)
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::write(parent, e))?;
    }
    fs::write(path, content).map_err(|e| ReportError::write(path, e))
}
