//! Create image and spectral previews for reprocessed FITS products.
//!
//! Usage: `create_previews <input_uri_prefix> <output_uri_prefix> <ipppssoot>`
//!
//! A local input directory is processed in place; an `s3://` input means the
//! data is already staged under `./<ipppssoot>/` and previews are uploaded in
//! one batch at the end.

use anyhow::{Context, Result};
use clap::Parser;
use previews::location::Location;
use previews::renderer::ProcessRunner;
use previews::transfer::S3ObjectStore;
use previews::{telemetry, Orchestrator, PreviewConfig, RunRequest};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Create image and spectral previews")]
struct Args {
    #[arg(help = "s3 or local directory containing FITS images")]
    input_uri_prefix: String,

    #[arg(help = "S3 URI prefix or local directory for writing previews")]
    output_uri_prefix: String,

    #[arg(help = "IPPPSSOOT for instrument data")]
    ipppssoot: String,

    #[arg(long, help = "JSON file overriding renderer settings")]
    config: Option<PathBuf>,

    #[arg(
        long,
        env = "CALDP_FITSCUT",
        value_name = "PROGRAM",
        help = "Imaging preview renderer"
    )]
    fitscut: Option<String>,

    #[arg(
        long,
        env = "CALDP_SPEC_PREVIEWS",
        value_name = "PROGRAM",
        help = "Spectral preview renderer"
    )]
    spec_previews: Option<String>,
}

fn load_config(args: &Args) -> Result<PreviewConfig> {
    let mut config = match &args.config {
        Some(path) => PreviewConfig::load_from_file(path)?,
        None => PreviewConfig::default(),
    };
    if let Some(program) = &args.fitscut {
        config.imaging_program = program.clone();
    }
    if let Some(program) = &args.spec_previews {
        config.spectral_program = program.clone();
    }
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let work_root = std::env::current_dir().context("Failed to determine working directory")?;

    let destination = Location::parse(&args.output_uri_prefix)
        .with_context(|| format!("Invalid output location {}", args.output_uri_prefix))?;
    let store = if destination.is_object() {
        Some(S3ObjectStore::from_env().context("Failed to create S3 client")?)
    } else {
        None
    };

    let runner = ProcessRunner::new();
    let mut orchestrator = Orchestrator::new(&config, &runner);
    if let Some(store) = &store {
        orchestrator = orchestrator.with_object_store(store);
    }

    info!(
        "Creating previews from {} to {} for {}",
        args.input_uri_prefix, args.output_uri_prefix, args.ipppssoot
    );
    let request = RunRequest {
        input: args.input_uri_prefix,
        destination: args.output_uri_prefix,
        ipppssoot: args.ipppssoot,
        work_root,
    };
    orchestrator
        .run(&request)
        .context("Preview generation failed")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let dispatch = telemetry::dispatch();
    tracing::dispatcher::with_default(&dispatch, || run(args))
}
