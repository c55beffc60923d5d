//! Turns an input line into commands.
//!
//! A line is first split into a parallel batch on [`PARALLEL_SEPARATOR`], then every
//! member is parsed on its own into an argument vector and an optional output file.
//! Parsing keeps no state between calls, so batch members are independent of each other.

use crate::error::ParseError;
use std::path::PathBuf;

/// Separates sub-commands that run concurrently.
pub const PARALLEL_SEPARATOR: char = '&';

/// Standalone token that redirects standard output to the following file name.
pub const REDIRECTION_MARKER: &str = ">";

/// One sub-command: the program name followed by its arguments, plus where its
/// standard output goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    /// `args[0]` is the program name and doubles as the child's `argv[0]`.
    pub args: Vec<String>,
    /// File that replaces standard output, if any.
    pub output: Option<PathBuf>,
}

impl ParsedCommand {
    /// A command without words does nothing when executed.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Arguments after the program name.
    pub fn rest(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }
}

/// Split a line into trimmed, non-empty sub-commands.
///
/// ```
/// use rush::parser::split_parallel;
/// assert_eq!(split_parallel(" ls & & echo hi &"), vec!["ls", "echo hi"]);
/// ```
pub fn split_parallel(line: &str) -> Vec<&str> {
    line.split(PARALLEL_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Parse a single sub-command into words and an optional redirection target.
///
/// The redirection marker may appear at most once, must follow at least one word, must
/// be followed by a file name, and nothing may come after that file name.
pub fn parse_single(subcommand: &str) -> Result<ParsedCommand, ParseError> {
    let parsed = CommandBuilder::from(subcommand).build()?;
    tracing::trace!(?parsed, "parsed sub-command");
    Ok(parsed)
}

struct CommandBuilder<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> CommandBuilder<'a> {
    fn from(input: &'a str) -> Self {
        CommandBuilder {
            tokens: input.split_whitespace().collect(),
            pos: 0,
        }
    }

    fn consume(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn build(mut self) -> Result<ParsedCommand, ParseError> {
        let mut command = ParsedCommand::default();

        while let Some(token) = self.consume() {
            if token == REDIRECTION_MARKER {
                if command.output.is_some() {
                    return Err(ParseError::DuplicateRedirection);
                }
                if command.args.is_empty() {
                    return Err(ParseError::MissingCommand);
                }
                // Whatever comes next is the file name, even another marker.
                let target = self.consume().ok_or(ParseError::MissingTarget)?;
                command.output = Some(PathBuf::from(target));
            } else if command.output.is_some() {
                return Err(ParseError::TrailingToken(token.to_string()));
            } else {
                command.args.push(token.to_string());
            }
        }

        Ok(command)
    }
}
