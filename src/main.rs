use argh::FromArgs;
use rush::io_adapters::EditorLines;
use rush::{Interpreter, ShellError, logging};
use std::process::ExitCode;

#[derive(FromArgs)]
/// a small line-oriented shell. it takes no arguments.
struct Rush {}

fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
    let (program, rest) = argv.split_first().unwrap_or((&"rush", &[]));

    // `--help` counts as an argument too.
    if Rush::from_args(&[*program], rest).is_err() {
        ShellError::Startup.report(&mut std::io::stderr())?;
        return Ok(ExitCode::FAILURE);
    }

    let mut lines = EditorLines::new()?;
    Interpreter::default().repl(&mut lines)?;
    Ok(ExitCode::SUCCESS)
}
