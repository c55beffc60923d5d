use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Result as IoResult, StdinLock, Stdout, Write};
use std::rc::Rc;

/// Where the interactive loop gets its lines from.
pub trait LineSource {
    /// Show `prompt` and read one line without its trailing newline.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;
}

/// Line reader for the shell's standard input.
///
/// A terminal gets a [`rustyline`] editor, which draws the prompt itself. Piped input
/// goes through [`PromptedLines`] so the prompt is still printed before every read.
/// Nothing is added to history.
pub enum EditorLines {
    Terminal(DefaultEditor),
    Piped(PromptedLines<StdinLock<'static>, Stdout>),
}

impl EditorLines {
    pub fn new() -> anyhow::Result<Self> {
        if io::stdin().is_terminal() {
            Ok(EditorLines::Terminal(DefaultEditor::new()?))
        } else {
            Ok(EditorLines::Piped(PromptedLines::new(
                io::stdin().lock(),
                io::stdout(),
            )))
        }
    }
}

impl LineSource for EditorLines {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        let editor = match self {
            EditorLines::Terminal(editor) => editor,
            EditorLines::Piped(lines) => return lines.read_line(prompt),
        };
        match editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => {
                tracing::debug!("interrupted, ending session");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Writes the prompt to `output`, then reads one line from `input`.
pub struct PromptedLines<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptedLines<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the prompt stream, e.g. to inspect it in tests.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> LineSource for PromptedLines<R, W> {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// Memory-backed line source, mostly for tests and scripted sessions.
#[derive(Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
    prompts_shown: usize,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts_shown: 0,
        }
    }

    /// How many times a prompt was requested, including the final end-of-input read.
    pub fn prompts_shown(&self) -> usize {
        self.prompts_shown
    }

    /// Lines not read yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, _prompt: &str) -> anyhow::Result<Option<String>> {
        self.prompts_shown += 1;
        Ok(self.lines.pop_front())
    }
}

/// Memory-backed writer for capturing the error stream.
#[derive(Debug, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Public constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
