use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_FILTER: &str = "sparkplug_report=info,sparkplug_report_cli=info";

#[derive(Parser)]
#[command(name = "sparkplug-report")]
#[command(about = "Generate the Sparkplug TCK conformance summary from an execution log")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    report: commands::report_cmd::ReportCommand,
}

fn init_basic_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_basic_tracing();

    match commands::report_cmd::execute(cli.report) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
