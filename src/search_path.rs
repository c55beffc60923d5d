use nix::unistd::{AccessFlags, access};
use std::path::{Path, PathBuf};

/// Directory searched when the session starts.
pub const DEFAULT_DIR: &str = "/bin";

/// Ordered list of directories used to turn a bare command name into a program path.
///
/// Earlier directories win. Duplicates are allowed and harmless. The list is only ever
/// swapped out as a whole by the `path` built-in, never edited entry by entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<String>,
}

impl SearchPath {
    pub fn new<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    /// An empty search path resolves nothing until it is replaced again.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Discard the current directories and install `dirs` in the given order.
    pub fn replace(&mut self, dirs: Vec<String>) {
        tracing::debug!(old = ?self.dirs, new = ?dirs, "replacing search path");
        self.dirs = dirs;
    }

    /// Find the first `dir/name` that is an executable file.
    ///
    /// The candidate is built by plain concatenation with a `/`, so `name` is expected
    /// to be a bare command name. Returns `None` when no directory matches, including
    /// when the search path is empty.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| PathBuf::from(format!("{dir}/{name}")))
            .find(|candidate| is_executable(candidate))
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::new([DEFAULT_DIR])
    }
}

/// A regular file the current user may execute.
pub(crate) fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}
