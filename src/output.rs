//! Destinations for printed values
//!
//! The interpreter always records output in its own terminal buffer. An
//! [`OutputSink`] additionally receives each line as soon as it is printed,
//! which is how the CLI streams to stdout.

use std::io::{self, Write};

/// Receives each printed line, in program order
pub trait OutputSink {
    fn emit(&mut self, line: &str) -> io::Result<()>;
}

impl OutputSink for Vec<String> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes one line per print to any `io::Write`, flushing after each
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}
