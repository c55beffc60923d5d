//! Concurrent execution of the members of one input line.
//!
//! All members are launched before any is waited on, so they overlap in time. The
//! parent then waits for each child in launch order.

use crate::error::{Result, ShellError};
use crate::external::{Invocation, reap};
use crate::parser::parse_single;
use crate::search_path::SearchPath;
use std::io::{self, Write};
use std::process::Child;

/// Launch every sub-command, then wait for all launched children.
///
/// Members that parse to nothing are skipped silently. Parse, resolution, redirection
/// and load failures are reported and skip only that member. A failure to create a
/// child at all stops further launches, but children already running are still
/// joined. Built-in names get no special treatment here.
///
/// Returns how many children were launched.
pub fn run_all(
    subcommands: &[&str],
    path: &SearchPath,
    errors: &mut dyn Write,
) -> io::Result<usize> {
    run_all_with(subcommands, path, errors, Invocation::spawn)
}

fn run_all_with<F>(
    subcommands: &[&str],
    path: &SearchPath,
    errors: &mut dyn Write,
    mut spawn: F,
) -> io::Result<usize>
where
    F: FnMut(&Invocation) -> Result<Child>,
{
    let mut launched: Vec<(Invocation, Child)> = Vec::with_capacity(subcommands.len());
    let mut write_failure = None;

    for subcommand in subcommands {
        match launch(subcommand, path, &mut spawn) {
            Ok(Some(entry)) => launched.push(entry),
            Ok(None) => {}
            Err(err) => {
                let stop = matches!(err, ShellError::ChildCreation { .. });
                if let Err(e) = err.report(errors) {
                    write_failure = write_failure.or(Some(e));
                }
                if stop {
                    break;
                }
            }
        }
    }

    let count = launched.len();
    tracing::debug!(count, "joining parallel batch");
    for (invocation, mut child) in launched {
        reap(&invocation.program, &mut child);
    }

    match write_failure {
        Some(e) => Err(e),
        None => Ok(count),
    }
}

fn launch<F>(
    subcommand: &str,
    path: &SearchPath,
    spawn: &mut F,
) -> Result<Option<(Invocation, Child)>>
where
    F: FnMut(&Invocation) -> Result<Child>,
{
    let parsed = parse_single(subcommand)?;
    if parsed.is_empty() {
        return Ok(None);
    }
    let invocation = Invocation::prepare(&parsed, path)?;
    let child = spawn(&invocation)?;
    Ok(Some((invocation, child)))
}
