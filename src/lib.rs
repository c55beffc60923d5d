//! A small line-oriented shell.
//!
//! Each input line is split on `&` into sub-commands. A single sub-command may be one
//! of the builtins `exit`, `cd` and `path`; anything else is looked up in the session's
//! search path and run as a child process, optionally with its standard output sent to
//! a file (`cmd args > file`). Several sub-commands on one line run concurrently and
//! the shell waits for all of them before reading the next line.
//!
//! The main entry point is [`Interpreter`]. Errors of every kind reach the user as the
//! single message in [`error::ERROR_MESSAGE`].

mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod external;
mod interpreter;
pub mod io_adapters;
pub mod logging;
pub mod parallel;
pub mod parser;
pub mod search_path;

#[cfg(test)]
mod testutil;

pub use error::{ParseError, ShellError};
pub use interpreter::{DEFAULT_PROMPT, Interpreter, ShellConfig};
pub use search_path::SearchPath;
