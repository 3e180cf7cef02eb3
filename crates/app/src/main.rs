//! Probe command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use probe::{Cli, EXIT_CONFIG_ERROR, build_cases, execute, exit_status, init_logging, render_summary, resolve_config};
use probe_infrastructure::StreamReporter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Configuration error: {error}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    if cli.list {
        for case in build_cases(&config, cli.filter.as_deref()) {
            println!("{}\t{} {}", case.name, case.method, case.path);
        }
        return ExitCode::SUCCESS;
    }

    let mut reporter = StreamReporter::stderr();
    match execute(&config, cli.filter.as_deref(), &mut reporter).await {
        Ok(summary) => {
            println!("{}", render_summary(&summary));
            ExitCode::from(exit_status(&summary))
        }
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
