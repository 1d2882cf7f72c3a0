//! Metrics Query inspection binary entry point.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use metrics_query::cli::{self, CliArgs};
use metrics_query::{MetricsRequestParser, ParserMetrics};

fn main() -> ExitCode {
    // Initialize tracing on stderr so stdout carries only descriptors
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();

    let inputs = match cli::inputs(&args, io::stdin().lock()) {
        Ok(inputs) => inputs,
        Err(e) => {
            tracing::error!("Failed to read input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let parser = MetricsRequestParser::new(Arc::new(ParserMetrics::new()));
    let summary = match cli::run(
        inputs,
        args.output,
        &parser,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    ) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Failed to write output: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.print_metrics {
        print!("{}", parser.metrics().encode());
    }

    tracing::info!(
        "Parsed {} request(s), {} failed",
        summary.parsed,
        summary.failed
    );

    if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
