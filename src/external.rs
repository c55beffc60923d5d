use crate::command::ExecutableCommand;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::parser::ParsedCommand;
use crate::search_path::{SearchPath, is_executable};
use nix::errno::Errno;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};

/// Permission bits for files created by output redirection (before umask).
const OUTPUT_FILE_MODE: u32 = 0o644;

/// Command that is not a builtin.
pub struct ExternalCommand {
    command: ParsedCommand,
}

impl ExternalCommand {
    pub fn new(command: ParsedCommand) -> Self {
        Self { command }
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<()> {
        let invocation = Invocation::prepare(&self.command, &env.path)?;
        let mut child = invocation.spawn()?;
        reap(&invocation.program, &mut child);
        Ok(())
    }
}

/// Everything needed to start a program, decided before any child exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Resolved location of the program.
    pub program: PathBuf,
    /// Full argument vector; `args[0]` is passed as the child's `argv[0]`.
    pub args: Vec<String>,
    /// File that replaces the child's standard output.
    pub output: Option<PathBuf>,
}

impl Invocation {
    /// Resolve the program for `command` without touching any process state.
    ///
    /// Fails with [`ShellError::Resolution`] when the name cannot be found. An empty
    /// command resolves to nothing and is reported the same way; callers are expected
    /// to skip empty commands before getting here.
    pub fn prepare(command: &ParsedCommand, path: &SearchPath) -> Result<Self> {
        let name = command.name().unwrap_or_default();
        let program = find_command_path(path, name)
            .ok_or_else(|| ShellError::Resolution(name.to_string()))?;
        Ok(Self {
            program,
            args: command.args.clone(),
            output: command.output.clone(),
        })
    }

    /// Open the redirection target, if any, and start the program.
    ///
    /// The target is opened write-only, created when missing and truncated when present.
    /// Standard input and standard error are inherited from the shell.
    pub fn spawn(&self) -> Result<Child> {
        let mut cmd = Command::new(&self.program);
        if let Some((argv0, rest)) = self.args.split_first() {
            cmd.arg0(argv0).args(rest);
        }
        if let Some(target) = &self.output {
            cmd.stdout(open_output(target)?);
        }

        let child = cmd
            .spawn()
            .map_err(|source| classify_spawn_error(&self.program, source))?;
        tracing::debug!(pid = child.id(), program = %self.program.display(), "launched child");
        Ok(child)
    }
}

/// Resolve a command name the way the shell does.
///
/// Behavior:
/// - Empty name: returns `None`.
/// - Name containing a `/` (absolute, `./foo`, `bin/foo`): returns it as given if it is
///   an executable file. The search path is not consulted.
/// - Bare name: the first match in `path`, see [`SearchPath::resolve`].
pub fn find_command_path(path: &SearchPath, name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    if name.contains('/') {
        let direct = Path::new(name);
        return is_executable(direct).then(|| direct.to_path_buf());
    }
    path.resolve(name)
}

fn open_output(target: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(OUTPUT_FILE_MODE)
        .open(target)
        .map_err(|source| ShellError::Redirection {
            target: target.to_path_buf(),
            source,
        })
}

/// Split spawn failures into "the program could not be loaded" and "no child at all".
fn classify_spawn_error(program: &Path, source: io::Error) -> ShellError {
    let program = program.to_path_buf();
    match source.raw_os_error().map(Errno::from_raw) {
        Some(
            Errno::ENOENT
            | Errno::EACCES
            | Errno::ENOEXEC
            | Errno::ENOTDIR
            | Errno::ETXTBSY
            | Errno::ELOOP
            | Errno::E2BIG,
        ) => ShellError::Load { program, source },
        _ => ShellError::ChildCreation { program, source },
    }
}

/// Wait for `child` to finish. The status is logged and otherwise ignored.
pub(crate) fn reap(program: &Path, child: &mut Child) -> Option<ExitStatus> {
    match child.wait() {
        Ok(status) => {
            tracing::debug!(pid = child.id(), program = %program.display(), %status, "child exited");
            Some(status)
        }
        Err(e) => {
            tracing::warn!(pid = child.id(), program = %program.display(), error = %e, "failed to wait for child");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_single;
    use crate::testutil::{write_plain_file, write_script};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn search(dir: &TempDir) -> SearchPath {
        SearchPath::new([dir.path().to_string_lossy().into_owned()])
    }

    #[test]
    fn absolute_existing() {
        let found = find_command_path(&SearchPath::new(Vec::<String>::new()), "/bin/sh");
        assert_eq!(found, Some(PathBuf::from("/bin/sh")));
    }

    #[test]
    fn absolute_nonexisting() {
        assert_eq!(
            find_command_path(&SearchPath::default(), "/bin/nonexisting"),
            None
        );
    }

    #[test]
    fn single_component_found_in_path() {
        let found = find_command_path(&SearchPath::default(), "sh")
            .expect("Expected to find 'sh' in /bin via search path");
        assert!(found.starts_with("/bin"), "Expected path in /bin, got {found:?}");
    }

    #[test]
    fn single_component_not_found_in_path() {
        assert_eq!(find_command_path(&SearchPath::default(), "nonexisting"), None);
    }

    #[test]
    fn empty_name_is_none() {
        assert_eq!(find_command_path(&SearchPath::default(), ""), None);
    }

    #[test]
    fn name_with_slash_ignores_search_path() {
        let dir = TempDir::new().unwrap();
        let script = write_script(dir.path(), "tool", "exit 0");
        let name = script.to_str().unwrap();

        let empty = SearchPath::new(Vec::<String>::new());
        assert_eq!(find_command_path(&empty, name), Some(script.clone()));
    }

    #[test]
    fn non_executable_file_with_slash_is_not_found() {
        let dir = TempDir::new().unwrap();
        let file = write_plain_file(dir.path(), "data");
        assert_eq!(
            find_command_path(&SearchPath::default(), file.to_str().unwrap()),
            None
        );
    }

    #[test]
    fn prepare_fails_when_search_path_is_empty() {
        let command = parse_single("sh -c true").unwrap();
        let empty = SearchPath::new(Vec::<String>::new());
        let err = Invocation::prepare(&command, &empty).unwrap_err();
        assert!(matches!(err, ShellError::Resolution(name) if name == "sh"));
    }

    #[test]
    fn prepare_keeps_arguments_and_target() {
        let command = parse_single("sh -c true > out.txt").unwrap();
        let invocation = Invocation::prepare(&command, &SearchPath::default()).unwrap();
        assert_eq!(invocation.program, PathBuf::from("/bin/sh"));
        assert_eq!(invocation.args, ["sh", "-c", "true"]);
        assert_eq!(invocation.output, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn redirected_output_lands_in_file() {
        let dir = TempDir::new().unwrap();
        write_script(dir.path(), "greet", "echo hello \"$@\"");
        let out = dir.path().join("out.txt");
        fs::write(&out, "old content that must disappear\n").unwrap();

        let command = ParsedCommand {
            args: vec!["greet".into(), "world".into()],
            output: Some(out.clone()),
        };
        let mut env = Environment::new(search(&dir));
        Box::new(ExternalCommand::new(command))
            .execute(&mut env)
            .unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), "hello world\n");
    }

    #[test]
    fn created_output_file_has_conventional_mode() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("fresh.txt");
        let invocation = Invocation {
            program: PathBuf::from("/bin/sh"),
            args: vec!["sh".into(), "-c".into(), "true".into()],
            output: Some(out.clone()),
        };
        let mut child = invocation.spawn().unwrap();
        reap(&invocation.program, &mut child);

        let mode = fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & !0o644, 0, "unexpected mode {mode:o}");
    }

    #[test]
    fn unopenable_target_is_a_redirection_error() {
        let invocation = Invocation {
            program: PathBuf::from("/bin/sh"),
            args: vec!["sh".into(), "-c".into(), "true".into()],
            output: Some(PathBuf::from("/definitely/not/here/out.txt")),
        };
        assert!(matches!(
            invocation.spawn(),
            Err(ShellError::Redirection { .. })
        ));
    }

    #[test]
    fn garbage_executable_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let bogus = dir.path().join("bogus");
        fs::write(&bogus, [0u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();
        fs::set_permissions(&bogus, fs::Permissions::from_mode(0o755)).unwrap();

        let invocation = Invocation {
            program: bogus,
            args: vec!["bogus".into()],
            output: None,
        };
        assert!(matches!(invocation.spawn(), Err(ShellError::Load { .. })));
    }

    #[test]
    fn resource_errors_are_child_creation_failures() {
        for errno in [Errno::EAGAIN, Errno::ENOMEM] {
            let source = io::Error::from_raw_os_error(errno as i32);
            assert!(matches!(
                classify_spawn_error(Path::new("x"), source),
                ShellError::ChildCreation { .. }
            ));
        }
        let no_errno = io::Error::other("no errno");
        assert!(matches!(
            classify_spawn_error(Path::new("x"), no_errno),
            ShellError::ChildCreation { .. }
        ));
    }

    #[test]
    fn image_errors_are_load_failures() {
        for errno in [Errno::ENOENT, Errno::EACCES, Errno::ENOEXEC, Errno::ETXTBSY] {
            let source = io::Error::from_raw_os_error(errno as i32);
            assert!(matches!(
                classify_spawn_error(Path::new("x"), source),
                ShellError::Load { .. }
            ));
        }
    }

    #[test]
    fn parent_waits_for_child() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("marker");
        write_script(
            dir.path(),
            "slow",
            &format!("sleep 0.2\necho done > '{}'", marker.display()),
        );

        let mut env = Environment::new(search(&dir));
        let command = parse_single("slow").unwrap();
        Box::new(ExternalCommand::new(command))
            .execute(&mut env)
            .unwrap();

        assert_eq!(fs::read_to_string(&marker).unwrap(), "done\n");
    }

    #[test]
    fn exit_status_is_not_an_error() {
        let mut env = Environment::default();
        let command = ParsedCommand {
            args: vec!["sh".into(), "-c".into(), "exit 3".into()],
            output: None,
        };
        assert!(Box::new(ExternalCommand::new(command)).execute(&mut env).is_ok());
    }
}
