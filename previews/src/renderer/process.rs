//! Subprocess-backed renderer runner.
//!
//! Runs the program to completion with stdout and stderr captured. There is
//! no timeout: a renderer that hangs blocks the run.

use std::process::{Command, Stdio};
use tracing::debug;

use super::{CommandOutput, CommandRunner, RendererCommand, RendererError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &RendererCommand) -> Result<CommandOutput, RendererError> {
        debug!("Running {}", command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RendererError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout_and_status() {
        let cmd = RendererCommand::new("sh", vec!["-c".into(), "printf jpegbytes".into()]);
        let output = ProcessRunner::new().run(&cmd).unwrap();
        assert!(output.is_success());
        assert_eq!(output.stdout, b"jpegbytes");
    }

    #[test]
    fn test_captures_failure_and_stderr() {
        let cmd = RendererCommand::new(
            "sh",
            vec!["-c".into(), "echo 'bad pixel map' >&2; exit 3".into()],
        );
        let output = ProcessRunner::new().run(&cmd).unwrap();
        assert_eq!(output.status, Some(3));
        assert_eq!(output.stderr_text(), "bad pixel map");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let cmd = RendererCommand::new("definitely-not-a-renderer-binary", vec![]);
        let err = ProcessRunner::new().run(&cmd).unwrap_err();
        assert!(matches!(err, RendererError::Spawn { .. }));
    }
}
