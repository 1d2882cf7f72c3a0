//! Command line front end for inspecting how query URIs are parsed.

use std::io::{BufRead, Write};

use clap::{Parser, ValueEnum};

use crate::parser::MetricsRequestParser;

/// CLI arguments for the `metrics-query` binary.
#[derive(Parser, Debug)]
#[command(name = "metrics-query")]
#[command(about = "Parse metrics query URIs and print the resulting request descriptors")]
pub struct CliArgs {
    /// URIs to parse. Reads one URI per line from stdin when none are given.
    pub uris: Vec<String>,

    /// Output format for parsed requests
    #[arg(short, long, value_enum, default_value = "pretty", env = "METRICS_QUERY_OUTPUT")]
    pub output: OutputFormat,

    /// Print parser metrics in Prometheus text format after all inputs
    #[arg(long)]
    pub print_metrics: bool,
}

/// JSON layout of each printed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented, multi-line JSON.
    Pretty,
    /// One JSON object per line.
    Compact,
}

/// Outcome of a CLI run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub parsed: usize,
    pub failed: usize,
}

/// Parse every input and write descriptors to `out`, errors to `err`.
///
/// Blank input lines are skipped.
pub fn run<I, O, E>(
    inputs: I,
    format: OutputFormat,
    parser: &MetricsRequestParser,
    out: &mut O,
    err: &mut E,
) -> std::io::Result<RunSummary>
where
    I: IntoIterator<Item = String>,
    O: Write,
    E: Write,
{
    let mut summary = RunSummary {
        parsed: 0,
        failed: 0,
    };

    for uri in inputs {
        let uri = uri.trim();
        if uri.is_empty() {
            continue;
        }
        match parser.parse(uri) {
            Ok(request) => {
                let json = match format {
                    OutputFormat::Pretty => serde_json::to_string_pretty(&request),
                    OutputFormat::Compact => serde_json::to_string(&request),
                }
                .map_err(std::io::Error::other)?;
                writeln!(out, "{}", json)?;
                summary.parsed += 1;
            }
            Err(e) => {
                writeln!(err, "error: {}: {}", uri, e)?;
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Collect the inputs named by `args`, falling back to the lines of `stdin`.
pub fn inputs<R: BufRead>(args: &CliArgs, stdin: R) -> std::io::Result<Vec<String>> {
    if !args.uris.is_empty() {
        return Ok(args.uris.clone());
    }
    stdin.lines().collect()
}
