//! Line-oriented reader with one line of look-ahead.

use std::io::BufRead;

use lg_core::{LogGraphError, Result};

pub struct LineCursor<R> {
    reader: R,
    lookahead: Option<Option<String>>,
    line_number: usize,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lookahead: None,
            line_number: 0,
        }
    }

    /// Consume the next line. `Ok(None)` marks the end of the stream.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let line = match self.lookahead.take() {
            Some(buffered) => buffered,
            None => self.read_raw()?,
        };
        if line.is_some() {
            self.line_number += 1;
        }
        Ok(line)
    }

    /// Look at the next line without consuming it.
    pub fn peek(&mut self) -> Result<Option<&str>> {
        if self.lookahead.is_none() {
            let line = self.read_raw()?;
            self.lookahead = Some(line);
        }
        Ok(self.lookahead.as_ref().and_then(|line| line.as_deref()))
    }

    /// Whether the next line begins with `prefix`; false at end of stream.
    pub fn next_starts_with(&mut self, prefix: &str) -> Result<bool> {
        Ok(self.peek()?.is_some_and(|line| line.starts_with(prefix)))
    }

    /// Count of lines consumed so far.
    pub const fn line_number(&self) -> usize {
        self.line_number
    }

    fn read_raw(&mut self) -> Result<Option<String>> {
        let mut buffer = String::new();
        let read = self
            .reader
            .read_line(&mut buffer)
            .map_err(|err| LogGraphError::Io {
                line: self.line_number + 1,
                message: err.to_string(),
            })?;
        if read == 0 {
            return Ok(None);
        }
        if buffer.ends_with('\n') {
            buffer.pop();
            if buffer.ends_with('\r') {
                buffer.pop();
            }
        }
        Ok(Some(buffer))
    }
}
