use crate::command::{CommandFactory, ExecutableCommand};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::interpreter::Factory;
use argh::{EarlyExit, FromArgs};
use std::env;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process. They only exist for single commands;
/// inside a parallel batch every name is looked up as an external program.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "path".
    fn name() -> &'static str;

    /// Executes the command against the session environment.
    fn execute(self, env: &mut Environment) -> Result<()>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<()> {
        T::execute(*self, env)
    }
}

/// Stand-in produced when `argh` rejects a builtin's arguments, i.e. the wrong number
/// of words.
struct InvalidArgs {
    name: &'static str,
    output: String,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, _env: &mut Environment) -> Result<()> {
        Err(ShellError::builtin(self.name, self.output))
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::name() {
            return None;
        }
        // Every word is positional, even ones that look like flags.
        let positional: Vec<&str> = std::iter::once("--").chain(args.iter().copied()).collect();
        Some(match T::from_args(&[name], &positional) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, .. }) => Box::new(InvalidArgs {
                name: T::name(),
                output,
            }),
        })
    }
}

#[derive(FromArgs)]
/// change the working directory of the shell and of every command it starts later.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _env: &mut Environment) -> Result<()> {
        env::set_current_dir(&self.target)
            .map_err(|e| ShellError::builtin("cd", format!("{}: {e}", self.target)))?;
        tracing::debug!(dir = %self.target, "changed directory");
        Ok(())
    }
}

#[derive(FromArgs)]
/// leave the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// must be empty; exit codes are not supported.
    pub args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, env: &mut Environment) -> Result<()> {
        if !self.args.is_empty() {
            return Err(ShellError::builtin("exit", "takes no arguments"));
        }
        env.should_exit = true;
        Ok(())
    }
}

#[derive(FromArgs)]
/// replace the list of directories searched for commands.
pub struct Path {
    #[argh(positional, greedy)]
    /// directories to search, in order.
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Path {
    fn name() -> &'static str {
        "path"
    }

    /// With no directories, only commands given with a `/` can run afterwards.
    fn execute(self, env: &mut Environment) -> Result<()> {
        env.path.replace(self.dirs);
        Ok(())
    }
}

/// Factories for every builtin, in lookup order.
pub(crate) fn factories() -> Vec<Box<dyn CommandFactory>> {
    vec![
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<Path>::default()),
    ]
}
