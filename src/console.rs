//! Line-oriented console I/O for the numbered menus.
//!
//! [`Prompt`] is generic over its reader and writer so the pickers can be
//! driven from in-memory buffers in tests and from the terminal in `main`.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::error::PickError;

/// A reader/writer pair used to render menus and read selections.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<StdinLock<'static>, Stdout> {
    /// Prompt bound to the process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes a single menu line.
    pub fn line(&mut self, line: &str) -> Result<(), PickError> {
        writeln!(self.output, "{line}").map_err(PickError::Output)
    }

    /// Writes an empty line.
    pub fn blank(&mut self) -> Result<(), PickError> {
        writeln!(self.output).map_err(PickError::Output)
    }

    /// Prints `"\n{label}: "` and reads one line of input, trimmed.
    ///
    /// End of input counts as a read failure.
    pub fn ask(&mut self, label: &str) -> Result<String, PickError> {
        write!(self.output, "\n{label}: ").map_err(PickError::Output)?;
        self.output.flush().map_err(PickError::Output)?;

        let mut buf = String::new();
        let read = self.input.read_line(&mut buf).map_err(PickError::Input)?;
        if read == 0 {
            return Err(PickError::Input(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no input",
            )));
        }
        Ok(buf.trim().to_string())
    }

    /// Asks for a selection and checks it against `len` entries.
    pub fn select(&mut self, label: &str, len: usize) -> Result<usize, PickError> {
        let input = self.ask(label)?;
        parse_selection(&input, len)
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

/// Parses `input` as an index into a menu of `len` entries.
pub fn parse_selection(input: &str, len: usize) -> Result<usize, PickError> {
    let selection: i64 = input.parse().map_err(|source| PickError::NotANumber {
        input: input.to_string(),
        source,
    })?;

    match usize::try_from(selection) {
        Ok(index) if index < len => Ok(index),
        _ => Err(PickError::OutOfRange { selection, len }),
    }
}
