//! Error taxonomy of the shell.
//!
//! Every variant is reported to the user through the same fixed message (see
//! [`ShellError::report`]). The variants and their payloads exist so that callers and
//! tests can tell failures apart, and so that `tracing` output has something to say.

use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// The only text a user ever sees when something goes wrong.
pub const ERROR_MESSAGE: &str = "An error has occurred\n";

/// Malformed redirection syntax in a single sub-command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The redirection marker showed up a second time.
    #[error("redirection marker appears more than once")]
    DuplicateRedirection,
    /// The redirection marker was the first token.
    #[error("no command before redirection marker")]
    MissingCommand,
    /// Nothing followed the redirection marker.
    #[error("no file name after redirection marker")]
    MissingTarget,
    /// A token followed the redirection file name.
    #[error("unexpected token after redirection target: {0}")]
    TrailingToken(String),
}

#[derive(Debug, Error)]
pub enum ShellError {
    /// The shell binary was invoked with arguments.
    #[error("unexpected startup arguments")]
    Startup,

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// No search path directory holds an executable with this name.
    #[error("command not found: {0}")]
    Resolution(String),

    /// The operating system refused to create a child process.
    #[error("failed to create child process for {program}: {source}")]
    ChildCreation {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output file could not be opened for writing.
    #[error("cannot open {target} for output: {source}")]
    Redirection {
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The resolved program could not be loaded into the child.
    #[error("failed to load {program}: {source}")]
    Load {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A built-in was misused or its operation failed.
    #[error("{name}: {reason}")]
    Builtin { name: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ShellError {
    pub(crate) fn builtin(name: &'static str, reason: impl Into<String>) -> Self {
        ShellError::Builtin {
            name,
            reason: reason.into(),
        }
    }

    /// Write the uniform error message, regardless of the variant.
    pub fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        tracing::debug!(error = %self, "reporting error");
        out.write_all(ERROR_MESSAGE.as_bytes())?;
        out.flush()
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = ShellError> = std::result::Result<T, E>;
