//! Line-oriented output sinks
//!
//! The diagram is a sequence of complete lines. A sink only ever receives a
//! whole document: emitters buffer their output and flush it on success.

use std::io::Write;

use super::error::Result;

/// Append-only line writer
pub trait LineSink {
    /// Write one complete line, without its terminator
    fn write_line(&mut self, line: &str) -> Result<()>;
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Sink over any [`std::io::Write`], terminating each line with `\n`
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }
}
