//! Spectral previews through `make_hst_spec_previews`.
//!
//! The renderer writes PNG files into the output directory under names of its
//! own choosing, so produced files are found by listing that directory.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{error, info};

use super::{
    describe_status, path_arg, ArtifactRole, CommandRunner, PreviewArtifact, RenderFailure,
    RenderReport, RendererCommand,
};
use crate::config::{PreviewConfig, SpectralListing};

pub fn spectral_command(
    config: &PreviewConfig,
    input: &Path,
    output_dir: &Path,
) -> RendererCommand {
    RendererCommand::new(
        &config.spectral_program,
        vec![
            "-v".to_string(),
            "-t".to_string(),
            "png".to_string(),
            "fits".to_string(),
            "-o".to_string(),
            path_arg(output_dir),
            path_arg(input),
        ],
    )
}

type Snapshot = BTreeMap<PathBuf, Option<SystemTime>>;

/// Regular files in `dir` with their modification times. A missing directory
/// is empty.
fn snapshot(dir: &Path) -> io::Result<Snapshot> {
    let mut files = Snapshot::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(files),
        Err(e) => return Err(e),
    };
    for entry in entries {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            files.insert(entry.path(), metadata.modified().ok());
        }
    }
    Ok(files)
}

/// Files of `after` that are absent from `before` or were modified since.
fn changed_files(before: &Snapshot, after: Snapshot) -> Vec<PathBuf> {
    after
        .into_iter()
        .filter(|(path, modified)| before.get(path) != Some(modified))
        .map(|(path, _)| path)
        .collect()
}

/// Render spectral previews of `input` into `output_dir`.
///
/// On success the report lists the produced files according to
/// `config.spectral_listing`; on failure it lists none.
pub fn render_spectral(
    runner: &dyn CommandRunner,
    config: &PreviewConfig,
    input: &Path,
    output_dir: &Path,
) -> RenderReport {
    let mut report = RenderReport::default();
    let failure = |status: Option<i32>, diagnostics: String| RenderFailure {
        input: input.to_path_buf(),
        profile: None,
        status,
        diagnostics,
    };

    let before = match config.spectral_listing {
        SpectralListing::NewFiles => match snapshot(output_dir) {
            Ok(before) => before,
            Err(e) => {
                error!(
                    input = %input.display(),
                    dir = %output_dir.display(),
                    "Failed to list preview directory: {e}"
                );
                report.failures.push(failure(None, e.to_string()));
                return report;
            }
        },
        SpectralListing::DirectoryContents => Snapshot::new(),
    };

    let command = spectral_command(config, input, output_dir);
    let output = match runner.run(&command) {
        Ok(output) => output,
        Err(e) => {
            error!(input = %input.display(), "Preview file not generated: {e}");
            report.failures.push(failure(None, e.to_string()));
            return report;
        }
    };

    if !output.is_success() {
        let diagnostics = output.stderr_text();
        error!(
            input = %input.display(),
            status = %describe_status(output.status),
            "Preview file not generated: {diagnostics}"
        );
        report.failures.push(failure(output.status, diagnostics));
        return report;
    }

    let produced = match snapshot(output_dir) {
        Ok(after) => changed_files(&before, after),
        Err(e) => {
            error!(
                input = %input.display(),
                dir = %output_dir.display(),
                "Failed to list preview directory: {e}"
            );
            report.failures.push(failure(output.status, e.to_string()));
            return report;
        }
    };

    info!("{} produced {} files", config.spectral_program, produced.len());
    report.artifacts = produced
        .into_iter()
        .map(|path| PreviewArtifact {
            path,
            role: ArtifactRole::Spectral,
        })
        .collect();
    report
}
