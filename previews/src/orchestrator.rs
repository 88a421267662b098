//! Run orchestration: discover inputs, classify, render, stage.
//!
//! Two modes, chosen by the input location:
//!
//! - **Local**: every `*.fits` directly under the input directory is rendered
//!   next to itself, and each input's previews are staged before the next
//!   input starts.
//! - **Object storage**: inputs already staged under `<work_root>/<ipppssoot>`
//!   are rendered into `<work_root>/<ipppssoot>/previews`; once all inputs are
//!   done the preview directory is collected and staged in one batch.
//!
//! Processing is sequential. Render failures are recorded in the summary and
//! the run continues; header-open and transfer errors end the run.

use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

use crate::classify::{classify_input, Classification};
use crate::collector::{collect, glob_in};
use crate::config::PreviewConfig;
use crate::error::{PreviewError, Result};
use crate::input::FitsInput;
use crate::location::{absolutize, Location};
use crate::renderer::{render_imaging, render_spectral, CommandRunner, RenderReport};
use crate::transfer::{transfer, ObjectStore, Transferred};

/// Name of the preview subdirectory in object-storage mode.
pub const PREVIEW_SUBDIR: &str = "previews";

/// Number of identifier characters that prefix staged input file names.
pub const INPUT_PREFIX_LEN: usize = 5;

/// The three command-line arguments plus the directory relative paths
/// resolve against.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input: String,
    pub destination: String,
    pub ipppssoot: String,
    pub work_root: PathBuf,
}

/// What happened to one input.
#[derive(Debug, Clone)]
pub struct InputOutcome {
    pub input: FitsInput,
    pub classification: Classification,
    pub report: RenderReport,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub inputs: Vec<InputOutcome>,
    pub transferred: Vec<Transferred>,
}

impl RunSummary {
    pub fn count(&self, classification: Classification) -> usize {
        self.inputs
            .iter()
            .filter(|o| o.classification == classification)
            .count()
    }

    pub fn artifact_count(&self) -> usize {
        self.inputs.iter().map(|o| o.report.artifacts.len()).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.inputs.iter().map(|o| o.report.failures.len()).sum()
    }

    pub fn log(&self) {
        info!(
            inputs = self.inputs.len(),
            imaging = self.count(Classification::Imaging),
            spectral = self.count(Classification::Spectral),
            unknown = self.count(Classification::Unknown),
            artifacts = self.artifact_count(),
            failures = self.failure_count(),
            transferred = self.transferred.len(),
            "Preview run complete"
        );
    }
}

/// `*.fits` files directly under `dir`, sorted.
pub fn local_inputs(dir: &Path) -> Result<Vec<FitsInput>> {
    let mut paths = glob_in(dir, "*.fits")?;
    paths.sort();
    Ok(paths.into_iter().map(FitsInput::from_local).collect())
}

/// Staged inputs for `ipppssoot`: `*.fits` files in `data_dir` whose names
/// start with the first five lower-cased characters of the identifier.
pub fn staged_inputs(data_dir: &Path, ipppssoot: &str) -> Result<Vec<FitsInput>> {
    let prefix: String = ipppssoot
        .to_lowercase()
        .chars()
        .take(INPUT_PREFIX_LEN)
        .collect();
    let mut paths = glob_in(data_dir, &format!("{}*.fits", Pattern::escape(&prefix)))?;
    paths.sort();
    Ok(paths.into_iter().map(FitsInput::from_staged).collect())
}

/// Data and preview directories for an object-storage run.
pub fn working_dirs(work_root: &Path, ipppssoot: &str) -> (PathBuf, PathBuf) {
    let data_dir = work_root.join(ipppssoot);
    let preview_dir = data_dir.join(PREVIEW_SUBDIR);
    (data_dir, preview_dir)
}

pub struct Orchestrator<'a> {
    config: &'a PreviewConfig,
    runner: &'a dyn CommandRunner,
    store: Option<&'a dyn ObjectStore>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a PreviewConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            store: None,
        }
    }

    /// Object store used when the destination is an object-storage URI.
    pub fn with_object_store(mut self, store: &'a dyn ObjectStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Classify `input` and run the matching renderer into `output_dir`.
    pub fn generate_previews(&self, input: &FitsInput, output_dir: &Path) -> Result<InputOutcome> {
        let classification = classify_input(input)?;

        let report = match classification {
            Classification::Spectral => {
                info!("Generating spectral previews...");
                render_spectral(self.runner, self.config, &input.path, output_dir)
            }
            Classification::Imaging => {
                info!("Generating image previews...");
                render_imaging(
                    self.runner,
                    self.config,
                    &input.path,
                    output_dir,
                    &input.base_name,
                )
            }
            Classification::Unknown => RenderReport::default(),
        };

        Ok(InputOutcome {
            input: input.clone(),
            classification,
            report,
        })
    }

    /// Run in the mode selected by the input location.
    pub fn run(&self, request: &RunRequest) -> Result<RunSummary> {
        let destination = match Location::parse(&request.destination)? {
            Location::Local(dir) => Location::Local(absolutize(&dir, &request.work_root)),
            object => object,
        };

        let summary = match Location::parse(&request.input)? {
            Location::Local(dir) => {
                self.run_local(&absolutize(&dir, &request.work_root), &destination)?
            }
            Location::Object(_) => {
                self.run_object_storage(&request.work_root, &request.ipppssoot, &destination)?
            }
        };

        summary.log();
        Ok(summary)
    }

    /// Render every FITS file in `input_dir` alongside itself and stage each
    /// input's previews as soon as they exist.
    pub fn run_local(&self, input_dir: &Path, destination: &Location) -> Result<RunSummary> {
        let inputs = local_inputs(input_dir)?;
        info!(
            "Processing {} FITS files from {}",
            inputs.len(),
            input_dir.display()
        );

        let mut summary = RunSummary::default();
        for input in inputs {
            let _span = info_span!("input", path = %input.path.display()).entered();
            info!("Generating previews for {}", input.path.display());

            let outcome = self.generate_previews(&input, &input.parent_dir())?;
            let produced = outcome.report.artifact_paths();
            info!("Generated {} output files", produced.len());

            summary
                .transferred
                .extend(transfer(&produced, destination, self.store)?);
            summary.inputs.push(outcome);
        }
        Ok(summary)
    }

    /// Render the inputs staged for `ipppssoot` into its preview directory,
    /// then stage everything collected from that directory.
    pub fn run_object_storage(
        &self,
        work_root: &Path,
        ipppssoot: &str,
        destination: &Location,
    ) -> Result<RunSummary> {
        let (data_dir, preview_dir) = working_dirs(work_root, ipppssoot);
        std::fs::create_dir_all(&preview_dir).map_err(|source| PreviewError::Io {
            path: preview_dir.display().to_string(),
            source,
        })?;

        let inputs = staged_inputs(&data_dir, ipppssoot)?;
        info!(
            "Processing {} FITS files from {}",
            inputs.len(),
            data_dir.display()
        );

        let mut summary = RunSummary::default();
        for input in inputs {
            let _span = info_span!("input", path = %input.path.display()).entered();
            info!("Generating previews for {}", input.path.display());
            summary
                .inputs
                .push(self.generate_previews(&input, &preview_dir)?);
        }

        let previews = collect(&preview_dir)?;
        info!("Generated {} preview files", previews.len());
        summary.transferred = transfer(&previews, destination, self.store)?;
        Ok(summary)
    }
}
