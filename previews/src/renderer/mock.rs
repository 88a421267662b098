use std::cell::RefCell;
use std::collections::HashMap;

use super::{CommandOutput, CommandRunner, RendererCommand, RendererError};

type Handler = Box<dyn Fn(&[String]) -> CommandOutput>;

/// Scripted stand-in for the external renderers.
///
/// Each program gets a handler that maps the argument list to an output. A
/// handler may also write files, the way the spectral renderer does. Unscripted
/// programs fail as if they could not be started.
#[derive(Default)]
pub struct MockRunner {
    handlers: HashMap<String, Handler>,
    calls: RefCell<Vec<RendererCommand>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, program: &str, handler: F) -> Self
    where
        F: Fn(&[String]) -> CommandOutput + 'static,
    {
        self.handlers.insert(program.to_string(), Box::new(handler));
        self
    }

    /// Every command run so far, in order.
    pub fn calls(&self) -> Vec<RendererCommand> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &RendererCommand) -> Result<CommandOutput, RendererError> {
        self.calls.borrow_mut().push(command.clone());
        match self.handlers.get(&command.program) {
            Some(handler) => Ok(handler(&command.args)),
            None => Err(RendererError::NotScripted {
                program: command.program.clone(),
            }),
        }
    }
}

/// Value following `flag` in `args`.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_and_unscripted_programs() {
        let runner = MockRunner::new().on("fitscut", |_| CommandOutput::success(b"x".to_vec()));

        let ok = runner
            .run(&RendererCommand::new("fitscut", vec!["a".into()]))
            .unwrap();
        assert_eq!(ok.stdout, b"x");

        let err = runner
            .run(&RendererCommand::new("other", vec![]))
            .unwrap_err();
        assert!(matches!(err, RendererError::NotScripted { .. }));
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_flag_value() {
        let args: Vec<String> = ["-v", "-o", "/tmp/out", "in.fits"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(flag_value(&args, "-o"), Some("/tmp/out"));
        assert_eq!(flag_value(&args, "-t"), None);
    }
}
