//! Line-oriented progress sinks for the evolution run.
//!
//! The engine never formats for a particular host; it hands finished lines
//! to a sink. A failed write aborts the run.

use std::io::{self, Write};
use std::sync::mpsc;

use crate::error::{ReelsmithError, Result};

pub trait ProgressSink {
    fn line(&mut self, text: &str) -> Result<()>;
}

/// Writes each line to an `io::Write`, typically stdout.
pub struct WriterSink<W: Write> {
    out: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ProgressSink for WriterSink<W> {
    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}

/// Forwards lines to a host over a channel, for UIs that render progress
/// off-thread.
pub struct ChannelSink {
    sender: mpsc::Sender<String>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelSink {
    fn line(&mut self, text: &str) -> Result<()> {
        self.sender
            .send(text.to_string())
            .map_err(|_| ReelsmithError::SinkClosed)
    }
}

/// Swallows all output; used by tests and headless callers.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn line(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}
