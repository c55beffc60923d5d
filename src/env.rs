use crate::search_path::SearchPath;

/// Session state that survives from one input line to the next.
///
/// The environment contains:
/// - `path`: the search path consulted for bare command names.
/// - `should_exit`: set by the `exit` built-in; the read loop stops once it is true.
///
/// The working directory is not tracked here: `cd` changes the process
/// working directory and children inherit it from there.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Directories used to resolve bare command names.
    pub path: SearchPath,
    /// When set to true, the interactive loop terminates after the current line.
    pub should_exit: bool,
}

impl Environment {
    /// Start a session with the given search path.
    pub fn new(path: SearchPath) -> Self {
        Self {
            path,
            should_exit: false,
        }
    }
}
