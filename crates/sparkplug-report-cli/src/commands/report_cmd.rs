use anyhow::{Context, Result};
use clap::Args;
use sparkplug_report::{ReportConfig, ReportGenerator};
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_ENV: &str = "SPARKPLUG_REPORT_CONFIG";

#[derive(Args)]
pub struct ReportCommand {
    #[arg(help = "TCK execution log to summarize")]
    pub log_file: PathBuf,
}

pub fn execute(cmd: ReportCommand) -> Result<()> {
    let config = load_config(std::env::var_os(CONFIG_ENV).map(PathBuf::from).as_deref())?;
    let output_path = config.output_path.clone();

    let generator = ReportGenerator::new(config);
    let report = generator
        .run(&cmd.log_file, &generated_at())
        .with_context(|| format!("Failed to generate report from {}", cmd.log_file.display()))?;

    for section in &report.profiles {
        let totals = section.totals();
        info!(
            profile = %section.profile,
            assertions = totals.count,
            passed = totals.passed,
            failed = totals.failed,
            percent = totals.percent_passed,
            "profile summary"
        );
    }

    println!("Report written to {}", output_path.display());
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };
    debug!(path = %path.display(), "loading configuration");
    ReportConfig::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn generated_at() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| now.unix_timestamp().to_string())
}
