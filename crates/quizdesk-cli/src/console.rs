//! Line-based console I/O for the interactive menus.

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::Result;
use thiserror::Error;

/// Standard input reached end of file.
#[derive(Debug, Error)]
#[error("input closed")]
pub struct InputClosed;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` and read one line, without its line ending.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(InputClosed.into());
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    pub fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_reads_lines_until_eof() {
        let mut out = Vec::new();
        let mut console = Console::new("first\r\n second \n".as_bytes(), &mut out);
        assert_eq!(console.prompt("> ").unwrap(), "first");
        assert_eq!(console.prompt("> ").unwrap(), " second ");
        let err = console.prompt("> ").unwrap_err();
        assert!(err.is::<InputClosed>());
        console.line("bye").unwrap();
        drop(console);
        assert_eq!(String::from_utf8(out).unwrap(), "> > > \nbye\n");
    }
}
