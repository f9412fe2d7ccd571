//! Reads HTML from a file or stdin and prints its Knockout comment bindings
//! as JSON on stdout.
//!
//! Usage: `ko-spans [FILE] [--range START END] [--format]`
//!
//! Logging goes to stderr, filtered by `RUST_LOG`.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use ko_spans::classifier::KNOCKOUT_FORMAT;
use ko_spans::{encoding, knockout_comments, KnockoutComment};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: ko-spans [FILE] [--range START END] [--format]";

#[derive(Debug, Default)]
struct Args {
    path: Option<String>,
    range: Option<(usize, usize)>,
    format: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--range" => {
                let mut bound = || -> Result<usize, String> {
                    args.next()
                        .ok_or_else(|| "--range needs START and END".to_string())?
                        .parse::<usize>()
                        .map_err(|e| format!("invalid --range bound: {e}"))
                };
                let start = bound()?;
                let end = bound()?;
                parsed.range = Some((start, end));
            }
            "--format" => parsed.format = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if parsed.path.is_none() && !arg.starts_with("--") => parsed.path = Some(arg),
            _ => return Err(format!("unexpected argument: {arg}\n{USAGE}")),
        }
    }

    Ok(parsed)
}

fn read_input(path: Option<&str>) -> ko_spans::Result<Vec<u8>> {
    match path {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}

#[derive(Serialize)]
struct Output<'a> {
    bindings: Vec<KnockoutComment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a ko_spans::classifier::ClassificationFormat>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let bytes = match read_input(args.path.as_deref()) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, path = ?args.path, "failed to read input");
            return ExitCode::FAILURE;
        }
    };

    let text = encoding::transcode_to_utf8(&bytes);
    let mut bindings = knockout_comments(&text);
    if let Some((start, end)) = args.range {
        bindings.retain(|b| start < end && b.span.start >= start && b.span.start < end);
    }
    tracing::debug!(bytes = bytes.len(), bindings = bindings.len(), "scanned document");

    let output = Output {
        bindings,
        format: args.format.then_some(&KNOCKOUT_FORMAT),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize output");
            ExitCode::FAILURE
        }
    }
}
