//! Ordered activity log.
//!
//! Every state transition and operation boundary becomes one timestamped
//! [`LogLine`]. Lines are appended in execution order and never edited,
//! reordered or deduplicated. Depending on the [`LogTarget`] each line is
//! mirrored to the live monitor as it is recorded, and the whole sequence is
//! written to the log file (after a configuration header) when the run ends.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

use crate::common::SimError;
use crate::config::{Config, LogTarget};
use crate::timer::format_timestamp;

/// Who a log line is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
    /// Scheduler and system-level events.
    Os,
    /// Events of one process.
    Process(usize),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Os => f.write_str("OS:"),
            Self::Process(id) => write!(f, "Process: {id},"),
        }
    }
}

/// One timestamped event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    /// Wall-clock time since system start.
    pub timestamp: Duration,
    /// Subject of the event.
    pub subject: Subject,
    /// Event text.
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  {}, {} {}",
            format_timestamp(self.timestamp),
            self.subject,
            self.message
        )
    }
}

/// Append-only event log with monitor and file sinks.
pub struct EventLog {
    target: LogTarget,
    monitor: Box<dyn Write + Send>,
    lines: Vec<String>,
    events: Vec<LogLine>,
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("target", &self.target)
            .field("lines", &self.lines.len())
            .finish_non_exhaustive()
    }
}

impl EventLog {
    /// Creates a log that mirrors to standard output.
    pub fn new(target: LogTarget) -> Self {
        Self::with_monitor(target, Box::new(io::stdout()))
    }

    /// Creates a log that mirrors to `monitor`.
    pub fn with_monitor(target: LogTarget, monitor: Box<dyn Write + Send>) -> Self {
        Self {
            target,
            monitor,
            lines: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Configured target.
    pub const fn target(&self) -> LogTarget {
        self.target
    }

    /// Appends an event and mirrors it to the monitor when the target includes it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Monitor`] if the monitor write fails.
    pub fn record(
        &mut self,
        timestamp: Duration,
        subject: Subject,
        message: impl Into<String>,
    ) -> Result<(), SimError> {
        let line = LogLine {
            timestamp,
            subject,
            message: message.into(),
        };
        self.push(line.to_string())?;
        self.events.push(line);
        Ok(())
    }

    /// Appends an untimestamped marker line (separators, begin/end markers).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Monitor`] if the monitor write fails.
    pub fn banner(&mut self, text: impl Into<String>) -> Result<(), SimError> {
        self.push(text.into())
    }

    fn push(&mut self, rendered: String) -> Result<(), SimError> {
        if self.target.includes_monitor() {
            writeln!(self.monitor, "{rendered}").map_err(SimError::Monitor)?;
        }
        self.lines.push(rendered);
        Ok(())
    }

    /// Every rendered line, in creation order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Every event, in creation order.
    pub fn events(&self) -> &[LogLine] {
        &self.events
    }

    /// Events of one process, in creation order.
    pub fn events_for(&self, process: usize) -> impl Iterator<Item = &LogLine> {
        self.events
            .iter()
            .filter(move |e| e.subject == Subject::Process(process))
    }

    /// Flushes the monitor and, when the target includes a file, writes the
    /// configuration header followed by every line to `config.log_path`.
    ///
    /// Monitor-only logs never touch the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Monitor`] or [`SimError::LogFile`] on write failure.
    pub fn finalize(&mut self, config: &Config) -> Result<(), SimError> {
        if self.target.includes_monitor() {
            self.monitor.flush().map_err(SimError::Monitor)?;
        }
        if !self.target.includes_file() {
            return Ok(());
        }

        let to_err = |source| SimError::LogFile {
            path: config.log_path.clone(),
            source,
        };
        let file = File::create(&config.log_path).map_err(to_err)?;
        let mut out = BufWriter::new(file);
        for line in config.log_header_lines().iter().chain(&self.lines) {
            writeln!(out, "{line}").map_err(to_err)?;
        }
        out.flush().map_err(to_err)?;
        tracing::info!(
            path = %config.log_path.display(),
            lines = self.lines.len(),
            "log file written"
        );
        Ok(())
    }
}
