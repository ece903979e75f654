//! `jsonbind` CLI: inspect and normalize JSON text from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Re-emit JSON in the jsonbind house style (stdin → stdout)
//! echo '{"name":"Alice","tags":["a","b"]}' | jsonbind normalize
//!
//! # Same, file to file, pretty-printed
//! jsonbind normalize -i data.json -o data.out.json --pretty
//!
//! # Print one top-level element, raw or normalized
//! jsonbind get Price --raw -i order.json
//!
//! # List the top-level elements of an object as a JSON report
//! jsonbind elements -i order.json
//!
//! # Exit 0 if the input is a JSON object, 1 otherwise
//! jsonbind check -i order.json
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jsonbind_core::decoder::unquote;
use jsonbind_core::fragment::{Fragment, FragmentKind};
use jsonbind_core::splitter::{split_elements, split_key_value};
use jsonbind_core::{encode_value, get_element_raw_value, is_json_object, parse};
use serde::Serialize;
use std::io::{self, Read};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsonbind",
    version,
    about = "Inspect and normalize JSON with jsonbind"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse JSON without a schema and re-emit it in the house style
    Normalize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Reformat the result as indented JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print one top-level element of a JSON object
    Get {
        /// Element key (exact, case-sensitive)
        key: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the element text as found instead of re-encoding it
        #[arg(long)]
        raw: bool,
    },
    /// Report the top-level elements of a JSON object
    Elements {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Exit 0 when the input is a JSON object, 1 otherwise
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// One row of the `elements` report.
#[derive(Debug, Serialize)]
struct ElementReport<'a> {
    key: &'a str,
    kind: &'static str,
    raw: &'a str,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            input,
            output,
            pretty,
        } => {
            let text = read_json(input.as_deref())?;
            let normalized = encode_value(&parse(&text));
            let rendered = if pretty {
                let value: serde_json::Value = serde_json::from_str(&normalized)
                    .context("Normalized text is not strict JSON and cannot be pretty-printed")?;
                serde_json::to_string_pretty(&value)?
            } else {
                normalized
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Get { key, input, raw } => {
            let text = read_json(input.as_deref())?;
            let element = get_element_raw_value(&key, &text)
                .with_context(|| format!("Failed to look up element {key:?}"))?;
            let Some(element) = element else {
                bail!("No element named {key:?}");
            };
            if raw {
                println!("{element}");
            } else {
                println!("{}", encode_value(&parse(element)));
            }
        }
        Commands::Elements { input } => {
            let text = read_json(input.as_deref())?;
            let fragment = Fragment::new(&text);
            if fragment.kind() != FragmentKind::Object {
                bail!("Input is not a JSON object (found {})", fragment.kind());
            }
            let reports: Vec<ElementReport> = split_elements(fragment.inner())
                .into_iter()
                .filter_map(split_key_value)
                .map(|(key, raw)| ElementReport {
                    key: unquote(key),
                    kind: Fragment::new(raw).kind().as_str(),
                    raw,
                })
                .collect();
            tracing::debug!(elements = reports.len(), "collected element report");
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            if is_json_object(&text) {
                println!("ok: JSON object");
            } else {
                eprintln!("not a JSON object");
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Read input, rejecting blank text.
fn read_json(path: Option<&str>) -> Result<String> {
    let text = read_input(path)?;
    if text.trim().is_empty() {
        bail!("Input is empty");
    }
    tracing::debug!(bytes = text.len(), "read input");
    Ok(text)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
