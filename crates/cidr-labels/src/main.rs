mod cli;

use std::io::{self, Write};

use clap::Parser;
use eyre::WrapErr;
use serde::Serialize;

use cidr_labels_core::option::config;
use cidr_labels_core::{cidr_labels, label_for_prefix, Label, Labels, Prefix};

use cli::OutputFormat;

#[derive(Serialize)]
#[serde(untagged)]
enum Expansion {
    Parsed(Label),
    Expanded(Labels),
}

#[derive(Serialize)]
struct Report<'a> {
    input: &'a str,
    labels: Expansion,
}

fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so stdout carries only labels.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    config().set_enable_ipv4(args.enable_ipv4);
    config().set_enable_ipv6(args.enable_ipv6);
    tracing::debug!(
        enable_ipv4 = args.enable_ipv4,
        enable_ipv6 = args.enable_ipv6,
        "address families configured"
    );

    // Parse everything up front so a bad input fails before any output.
    let prefixes = args
        .prefixes
        .iter()
        .map(|text| {
            text.parse::<Prefix>()
                .wrap_err_with(|| format!("invalid prefix argument {text:?}"))
        })
        .collect::<eyre::Result<Vec<Prefix>>>()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (text, prefix) in args.prefixes.iter().zip(prefixes) {
        let labels = if args.parse_only {
            Expansion::Parsed(label_for_prefix(prefix))
        } else {
            Expansion::Expanded(cidr_labels(prefix))
        };
        tracing::debug!(input = %text, %prefix, "expanded");

        match args.output {
            OutputFormat::Text => write_text(&mut out, &labels)?,
            OutputFormat::Json => {
                let report = Report {
                    input: text,
                    labels,
                };
                serde_json::to_writer(&mut out, &report).wrap_err("encode json report")?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;

    Ok(())
}

fn write_text(out: &mut impl Write, labels: &Expansion) -> io::Result<()> {
    match labels {
        Expansion::Parsed(label) => writeln!(out, "{label}"),
        Expansion::Expanded(labels) => {
            for label in labels.sorted() {
                writeln!(out, "{label}")?;
            }
            Ok(())
        }
    }
}
