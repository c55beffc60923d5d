use crate::command::{CommandFactory, ExecutableCommand};
use crate::env::Environment;
use crate::error::Result;
use crate::external::ExternalCommand;
use crate::io_adapters::LineSource;
use crate::parallel;
use crate::parser::{parse_single, split_parallel};
use crate::search_path::SearchPath;
use std::io::Write;

/// Prompt printed before every line is read.
pub const DEFAULT_PROMPT: &str = "rush> ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports the builtins defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub prompt: String,
    /// Search path installed before the first line is read.
    pub initial_path: SearchPath,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            initial_path: SearchPath::default(),
        }
    }
}

/// A line-oriented shell session.
///
/// The interpreter owns the session [`Environment`], the builtin factories and the
/// stream that error messages go to. Each line is split into a parallel batch: a batch
/// of one may be a builtin, larger batches only run external programs.
///
/// Example
/// ```
/// use rush::Interpreter;
/// let mut sh = Interpreter::default();
/// sh.execute_line("path /usr/bin /bin").unwrap();
/// sh.execute_line("exit").unwrap();
/// assert!(sh.should_exit());
/// ```
pub struct Interpreter {
    env: Environment,
    prompt: String,
    builtins: Vec<Box<dyn CommandFactory>>,
    errors: Box<dyn Write>,
}

impl Interpreter {
    /// Create a session that reports errors to standard error.
    pub fn new(config: ShellConfig) -> Self {
        Self {
            env: Environment::new(config.initial_path),
            prompt: config.prompt,
            builtins: crate::builtin::factories(),
            errors: Box::new(std::io::stderr()),
        }
    }

    /// Send error messages somewhere other than standard error.
    pub fn with_error_sink(mut self, errors: impl Write + 'static) -> Self {
        self.errors = Box::new(errors);
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// True once `exit` ran successfully.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Interpret one input line.
    ///
    /// Failures of the line itself are reported on the error stream and do not surface
    /// here; the returned error only means that the report could not be written.
    pub fn execute_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        match split_parallel(line).as_slice() {
            [] => {}
            [single] => {
                if let Err(err) = self.execute_single(single) {
                    err.report(&mut *self.errors)?;
                }
            }
            members => {
                parallel::run_all(members, &self.env.path, &mut *self.errors)?;
            }
        }
        Ok(())
    }

    fn execute_single(&mut self, subcommand: &str) -> Result<()> {
        let parsed = parse_single(subcommand)?;
        let Some(name) = parsed.name() else {
            return Ok(());
        };
        let rest: Vec<&str> = parsed.rest().iter().map(String::as_str).collect();

        let builtin = self.builtins.iter().find_map(|f| f.try_create(name, &rest));
        let cmd: Box<dyn ExecutableCommand> = match builtin {
            Some(builtin) => {
                tracing::debug!(name, "running builtin");
                builtin
            }
            None => Box::new(ExternalCommand::new(parsed.clone())),
        };
        cmd.execute(&mut self.env)
    }

    /// Read and interpret lines until `exit` or end of input.
    pub fn repl(&mut self, lines: &mut dyn LineSource) -> anyhow::Result<()> {
        while !self.env.should_exit {
            let Some(line) = lines.read_line(&self.prompt)? else {
                break;
            };
            if let Err(err) = self.execute_line(&line) {
                tracing::warn!(error = %err, "could not report error");
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    /// Prompt `rush> `, search path `/bin`, errors to standard error.
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}
