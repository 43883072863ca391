//! techlag - technical lag calculator for npm packages
//!
//! For every dependency of one kind declared by a package, reports the
//! version its constraint resolves to, the latest published version and the
//! number of releases in between.

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use techlag::analyzer::LagAnalyzer;
use techlag::cli::CliArgs;
use techlag::logging::init_logging;
use techlag::output::create_formatter;

/// Exit code when the report was produced but some dependencies were skipped
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Handle version flag
    if args.print_version {
        println!("techlag {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    init_logging(args.log_level());

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let request = args.request()?;
    let config = args.analyzer_config()?;

    tracing::debug!(
        target_package = %request.target,
        kind = %request.kind,
        registry = %config.registry_url,
        "starting analysis"
    );

    let analyzer = LagAnalyzer::new(request, &config)?.with_progress(args.show_progress());
    let report = analyzer.analyze().await?;

    let formatter = create_formatter(args.output_config());
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if report.has_skipped() {
        Ok(ExitCode::from(EXIT_PARTIAL))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
