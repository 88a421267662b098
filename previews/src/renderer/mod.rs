//! External preview renderers.
//!
//! Rendering is delegated to command-line tools. The tools are reached only
//! through the [`CommandRunner`] port, so the pipeline can be driven by the
//! real subprocess runner or by the scripted [`mock::MockRunner`].
//!
//! Per-profile outcomes are collected into a [`RenderReport`]: a failed
//! profile is recorded and logged, and never stops its siblings.

pub mod imaging;
pub mod mock;
pub mod process;
pub mod spectral;

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use imaging::render_imaging;
pub use process::ProcessRunner;
pub use spectral::render_spectral;

#[derive(Error, Debug)]
pub enum RendererError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Renderer {program} is not scripted")]
    NotScripted { program: String },
}

/// A renderer invocation: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl RendererCommand {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }
}

impl fmt::Display for RendererCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// What a finished renderer process produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(stdout: Vec<u8>) -> Self {
        Self {
            status: Some(0),
            stdout,
            stderr: Vec::new(),
        }
    }

    pub fn failure(status: i32, stderr: &str) -> Self {
        Self {
            status: Some(status),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Port to the external renderers. Calls block until the process exits.
pub trait CommandRunner {
    fn run(&self, command: &RendererCommand) -> Result<CommandOutput, RendererError>;
}

/// What a preview artifact is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactRole {
    /// Imaging preview for the output profile with this suffix
    /// (`_thumb` for the thumbnail, empty for the full-size image)
    Imaging { suffix: String },
    /// File written by the spectral renderer, named by the renderer
    Spectral,
}

/// A preview file written to local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArtifact {
    pub path: PathBuf,
    pub role: ArtifactRole,
}

impl PreviewArtifact {
    pub fn file_name(&self) -> String {
        crate::input::file_name(&self.path)
    }
}

/// A render attempt that produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub input: PathBuf,
    /// Profile suffix for imaging, `None` for a whole spectral render
    pub profile: Option<String>,
    /// Exit status, `None` if the process never ran or was killed by a signal
    pub status: Option<i32>,
    pub diagnostics: String,
}

/// Outcome of rendering one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub artifacts: Vec<PreviewArtifact>,
    pub failures: Vec<RenderFailure>,
}

impl RenderReport {
    pub fn artifact_paths(&self) -> Vec<PathBuf> {
        self.artifacts.iter().map(|a| a.path.clone()).collect()
    }

    pub fn merge(&mut self, other: RenderReport) {
        self.artifacts.extend(other.artifacts);
        self.failures.extend(other.failures);
    }
}

/// Display helper for failures whose status may be missing.
pub(crate) fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        let cmd = RendererCommand::new("fitscut", vec!["--all".into(), "in.fits".into()]);
        assert_eq!(cmd.to_string(), "fitscut --all in.fits");
    }

    #[test]
    fn test_command_output_status() {
        assert!(CommandOutput::success(vec![1, 2, 3]).is_success());
        let failed = CommandOutput::failure(1, "bad pixel map\n");
        assert!(!failed.is_success());
        assert_eq!(failed.stderr_text(), "bad pixel map");

        let signalled = CommandOutput {
            status: None,
            ..Default::default()
        };
        assert!(!signalled.is_success());
        assert_eq!(describe_status(signalled.status), "none");
    }

    #[test]
    fn test_report_merge() {
        let mut report = RenderReport::default();
        report.merge(RenderReport {
            artifacts: vec![PreviewArtifact {
                path: PathBuf::from("/p/a_thumb.jpg"),
                role: ArtifactRole::Imaging {
                    suffix: "_thumb".into(),
                },
            }],
            failures: vec![],
        });
        assert_eq!(report.artifact_paths(), vec![PathBuf::from("/p/a_thumb.jpg")]);
        assert_eq!(report.artifacts[0].file_name(), "a_thumb.jpg");
    }
}
