use crate::env::Environment;
use crate::error::Result;

/// Object-safe trait for anything the shell can run for a single command line.
///
/// Built-ins get it through a blanket impl; external programs implement it directly.
pub trait ExecutableCommand {
    /// Run the command to completion against the session environment.
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<()>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize `name`, which lets the caller
/// fall through to the next factory and, eventually, to an external program.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
