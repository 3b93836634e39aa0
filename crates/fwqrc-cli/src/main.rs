mod cli;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Args;
use fwqrc::{CheckOutcome, GeneratorConfig};

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let generator = base.merge(args.overrides()).into_generator();
    tracing::debug!(?generator, "resolved settings");

    if args.stdout {
        let manifest = generator.render()?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(manifest.as_bytes())?;
        stdout.flush()?;
        return Ok(ExitCode::SUCCESS);
    }

    if args.check {
        return Ok(match generator.check()? {
            CheckOutcome::UpToDate => ExitCode::SUCCESS,
            CheckOutcome::Stale => {
                eprintln!("fwqrc: {} is out of date", generator.output.display());
                ExitCode::FAILURE
            }
            CheckOutcome::Missing => {
                eprintln!("fwqrc: {} does not exist", generator.output.display());
                ExitCode::FAILURE
            }
        });
    }

    let report = generator
        .run()
        .with_context(|| format!("generating {}", generator.output.display()))?;
    tracing::info!(entries = report.entries, "done");
    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so `--stdout` output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
