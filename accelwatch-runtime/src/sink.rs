//! Report sinks and the runtime clock

use std::io::Write;

use accelwatch_core::{DriverError, ReadError, ReportSink, SampleLine, TimeSource, Timestamp};

/// Writes report lines to any `io::Write`, stdout by default
pub struct WriterSink<W: Write> {
    out: W,
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: std::io::stdout() }
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        // A closed stdout is not worth stopping the sampler for
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.flush()) {
            log::debug!("Report write failed: {}", e);
        }
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn sample(&mut self, line: SampleLine<'_>) {
        self.emit(format_args!("{}\n", line));
    }

    fn read_failed(&mut self, error: &ReadError) {
        self.emit(format_args!("ERROR: Update failed: {}\n", error.code()));
    }

    fn temperature_failed(&mut self, error: &DriverError) {
        self.emit(format_args!("ERROR: Unable to read temperature:{}\n", error.code));
    }
}

/// Uptime clock on tokio's time base, so paused test time is honoured
#[derive(Debug, Clone)]
pub struct TokioClock {
    boot: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self { boot: tokio::time::Instant::now() }
    }

    /// tokio instant of an uptime timestamp
    pub fn instant_at(&self, timestamp: Timestamp) -> tokio::time::Instant {
        self.boot + std::time::Duration::from_millis(timestamp)
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for TokioClock {
    fn now(&self) -> Timestamp {
        self.boot.elapsed().as_millis() as Timestamp
    }
}
