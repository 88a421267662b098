//! Imaging previews through `fitscut`.
//!
//! Each output profile is one renderer run whose stdout is the encoded JPEG.
//! The image is written to `<output_dir>/<base_name><suffix>.jpg`.

use std::path::Path;
use tracing::{error, info};

use super::{
    describe_status, path_arg, ArtifactRole, CommandRunner, PreviewArtifact, RenderFailure,
    RenderReport, RendererCommand,
};
use crate::config::{OutputProfile, PreviewConfig};

/// Build the renderer command for one profile.
pub fn imaging_command(
    config: &PreviewConfig,
    profile: &OutputProfile,
    input: &Path,
) -> RendererCommand {
    RendererCommand::new(
        &config.imaging_program,
        vec![
            "--all".to_string(),
            "--jpg".to_string(),
            format!("--autoscale={}", config.autoscale),
            "--asinh-scale".to_string(),
            format!("--output-size={}", profile.size.as_arg()),
            "--badpix".to_string(),
            path_arg(input),
        ],
    )
}

/// Render every configured profile of `input` into `output_dir`.
///
/// A failed profile is logged and recorded in the report; the remaining
/// profiles still run.
pub fn render_imaging(
    runner: &dyn CommandRunner,
    config: &PreviewConfig,
    input: &Path,
    output_dir: &Path,
    base_name: &str,
) -> RenderReport {
    let mut report = RenderReport::default();

    for profile in &config.profiles {
        let output_path = output_dir.join(format!("{}{}.jpg", base_name, profile.suffix));
        let command = imaging_command(config, profile, input);

        let failure = |status: Option<i32>, diagnostics: String| RenderFailure {
            input: input.to_path_buf(),
            profile: Some(profile.suffix.clone()),
            status,
            diagnostics,
        };

        let output = match runner.run(&command) {
            Ok(output) => output,
            Err(e) => {
                error!(input = %input.display(), size = %profile.size.as_arg(), "{e}");
                report.failures.push(failure(None, e.to_string()));
                continue;
            }
        };

        if !output.is_success() {
            let diagnostics = output.stderr_text();
            error!(
                input = %input.display(),
                status = %describe_status(output.status),
                size = %profile.size.as_arg(),
                "{} failed: {}",
                config.imaging_program,
                diagnostics
            );
            report.failures.push(failure(output.status, diagnostics));
            continue;
        }

        if let Err(e) = std::fs::write(&output_path, &output.stdout) {
            error!(
                input = %input.display(),
                output = %output_path.display(),
                "Failed to write preview: {e}"
            );
            report.failures.push(failure(output.status, e.to_string()));
            continue;
        }

        info!("Wrote {}", output_path.display());
        report.artifacts.push(PreviewArtifact {
            path: output_path,
            role: ArtifactRole::Imaging {
                suffix: profile.suffix.clone(),
            },
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputSize;
    use crate::renderer::mock::MockRunner;
    use crate::renderer::CommandOutput;
    use tempfile::TempDir;
    use test_helpers::LogCapture;
    use tracing::Level;

    fn is_thumbnail(args: &[String]) -> bool {
        args.iter().any(|a| a == "--output-size=128")
    }

    #[test]
    fn test_command_arguments() {
        let config = PreviewConfig::default();
        let cmd = imaging_command(
            &config,
            &OutputProfile::new("_thumb", OutputSize::Fixed(128)),
            Path::new("/data/ia01010_flt.fits"),
        );
        assert_eq!(cmd.program, "fitscut");
        assert_eq!(
            cmd.args,
            vec![
                "--all",
                "--jpg",
                "--autoscale=99.5",
                "--asinh-scale",
                "--output-size=128",
                "--badpix",
                "/data/ia01010_flt.fits",
            ]
        );

        let natural = imaging_command(
            &config,
            &OutputProfile::new("", OutputSize::Natural),
            Path::new("in.fits"),
        );
        assert!(natural.args.contains(&"--output-size=-1".to_string()));
    }

    #[test]
    fn test_both_profiles_written() {
        let temp_dir = TempDir::new().unwrap();
        let runner = MockRunner::new().on("fitscut", |args| {
            if is_thumbnail(args) {
                CommandOutput::success(b"thumb".to_vec())
            } else {
                CommandOutput::success(b"full".to_vec())
            }
        });

        let report = render_imaging(
            &runner,
            &PreviewConfig::default(),
            Path::new("/data/ia01010_flt.fits"),
            temp_dir.path(),
            "ia01010_flt",
        );

        assert!(report.failures.is_empty());
        assert_eq!(
            report.artifact_paths(),
            vec![
                temp_dir.path().join("ia01010_flt_thumb.jpg"),
                temp_dir.path().join("ia01010_flt.jpg"),
            ]
        );
        assert_eq!(
            std::fs::read(temp_dir.path().join("ia01010_flt_thumb.jpg")).unwrap(),
            b"thumb"
        );
        assert_eq!(
            std::fs::read(temp_dir.path().join("ia01010_flt.jpg")).unwrap(),
            b"full"
        );
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_failed_thumbnail_does_not_stop_full_size() {
        let temp_dir = TempDir::new().unwrap();
        let runner = MockRunner::new().on("fitscut", |args| {
            if is_thumbnail(args) {
                CommandOutput::failure(1, "bad pixel map")
            } else {
                CommandOutput::success(b"full".to_vec())
            }
        });

        let capture = LogCapture::new();
        let report = tracing::dispatcher::with_default(&capture.dispatch(), || {
            render_imaging(
                &runner,
                &PreviewConfig::default(),
                Path::new("/data/ia01010_flt.fits"),
                temp_dir.path(),
                "ia01010_flt",
            )
        });

        assert_eq!(report.artifact_paths(), vec![temp_dir.path().join("ia01010_flt.jpg")]);
        assert!(!temp_dir.path().join("ia01010_flt_thumb.jpg").exists());

        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.profile.as_deref(), Some("_thumb"));
        assert_eq!(failure.status, Some(1));
        assert_eq!(failure.diagnostics, "bad pixel map");

        assert!(capture.contains(
            Level::ERROR,
            &["bad pixel map", "/data/ia01010_flt.fits", "status=1"]
        ));
    }

    #[test]
    fn test_failed_full_size_keeps_thumbnail() {
        let temp_dir = TempDir::new().unwrap();
        let runner = MockRunner::new().on("fitscut", |args| {
            if is_thumbnail(args) {
                CommandOutput::success(b"thumb".to_vec())
            } else {
                CommandOutput::failure(2, "out of memory")
            }
        });

        let report = render_imaging(
            &runner,
            &PreviewConfig::default(),
            Path::new("in.fits"),
            temp_dir.path(),
            "in",
        );
        assert_eq!(report.artifact_paths(), vec![temp_dir.path().join("in_thumb.jpg")]);
        assert_eq!(report.failures[0].profile.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_renderer_fails_every_profile() {
        let temp_dir = TempDir::new().unwrap();
        let runner = MockRunner::new();

        let report = render_imaging(
            &runner,
            &PreviewConfig::default(),
            Path::new("in.fits"),
            temp_dir.path(),
            "in",
        );
        assert!(report.artifacts.is_empty());
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().all(|f| f.status.is_none()));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let runner = MockRunner::new().on("fitscut", |args| {
            CommandOutput::success(args.join(" ").into_bytes())
        });
        let config = PreviewConfig::default();
        let input = Path::new("/data/ia01010_flt.fits");

        let first = render_imaging(&runner, &config, input, temp_dir.path(), "ia01010_flt");
        let first_bytes: Vec<Vec<u8>> = first
            .artifact_paths()
            .iter()
            .map(|p| std::fs::read(p).unwrap())
            .collect();

        let second = render_imaging(&runner, &config, input, temp_dir.path(), "ia01010_flt");
        let second_bytes: Vec<Vec<u8>> = second
            .artifact_paths()
            .iter()
            .map(|p| std::fs::read(p).unwrap())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first_bytes, second_bytes);
    }
}
