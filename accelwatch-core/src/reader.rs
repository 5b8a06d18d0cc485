//! Sample acquisition and report lines
//!
//! [`SampleReader`] pulls one sample from the driver and numbers it. The
//! driver's "message corrupted" code is not a failure: it means the previous
//! sample was overwritten before it was read, so the record is kept and
//! flagged as an overrun.
//!
//! Report lines are consumed by downstream log tooling; their layout is
//! fixed:
//!
//! ```text
//! #12 @ 40123 ms: [OVERRUN] x 0.153229 , y -0.306458 , z 9.806650, t 24.000000
//! ```
//!
//! The overrun marker appears only when overrun reporting is on, and the
//! temperature suffix only when temperature reporting is on and the read
//! succeeded.

use core::fmt;

use crate::driver::{Channel, ChannelReading, SampleSource};
use crate::errors::{DriverError, ReadError, EBADMSG};
use crate::time::Timestamp;

/// One numbered sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRecord {
    /// Fetch attempt number, starting at 1
    pub sequence: u32,
    /// Uptime when the sample was fetched (ms)
    pub timestamp: Timestamp,
    /// Acceleration x, y, z (m/s²)
    pub accel: [f64; 3],
    /// Die temperature (°C), when requested and readable
    pub temperature: Option<f64>,
    /// Temperature was requested but the read failed
    pub temperature_fault: Option<DriverError>,
    /// Device reported an overrun for this fetch
    pub overrun: bool,
}

impl SampleRecord {
    /// Formatter for the report line
    pub fn line(&self, show_overrun: bool) -> SampleLine<'_> {
        SampleLine { record: self, show_overrun }
    }
}

/// Report line of a [`SampleRecord`]
pub struct SampleLine<'a> {
    record: &'a SampleRecord,
    show_overrun: bool,
}

impl fmt::Display for SampleLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.record;
        let overrun = if r.overrun && self.show_overrun { "[OVERRUN] " } else { "" };
        write!(
            f,
            "#{} @ {} ms: {}x {:.6} , y {:.6} , z {:.6}",
            r.sequence, r.timestamp, overrun, r.accel[0], r.accel[1], r.accel[2]
        )?;
        if let Some(t) = r.temperature {
            write!(f, ", t {:.6}", t)?;
        }
        Ok(())
    }
}

/// Destination of report lines
pub trait ReportSink {
    /// A sample was read
    fn sample(&mut self, line: SampleLine<'_>);

    /// The read failed; the sampler carries on
    fn read_failed(&mut self, error: &ReadError);

    /// Acceleration was read but the temperature was not
    fn temperature_failed(&mut self, error: &DriverError);
}

/// Fetches and numbers samples
#[derive(Debug, Clone)]
pub struct SampleReader {
    sequence: u32,
    measure_temperature: bool,
    report_overrun: bool,
}

impl SampleReader {
    /// Reader starting at sequence 0; the first fetch is numbered 1
    pub fn new(measure_temperature: bool, report_overrun: bool) -> Self {
        Self {
            sequence: 0,
            measure_temperature,
            report_overrun,
        }
    }

    /// Number of fetch attempts so far
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Overrun markers appear in report lines
    pub fn reports_overrun(&self) -> bool {
        self.report_overrun
    }

    /// Fetch one sample
    ///
    /// Every call consumes a sequence number, including failed ones.
    pub fn fetch<S>(&mut self, sensor: &mut S, now: Timestamp) -> Result<SampleRecord, ReadError>
    where
        S: SampleSource + ?Sized,
    {
        self.sequence = self.sequence.wrapping_add(1);
        let sequence = self.sequence;
        let device = sensor.name();

        let overrun = match sensor.sample_fetch() {
            Ok(()) => false,
            Err(code) if code == -EBADMSG => true,
            Err(code) => return Err(ReadError::Fetch(DriverError::new(code, device))),
        };

        let accel = match sensor.channel_get(Channel::AccelXyz) {
            Ok(ChannelReading::Xyz(v)) => [v[0].to_f64(), v[1].to_f64(), v[2].to_f64()],
            Ok(ChannelReading::Scalar(v)) => [v.to_f64(), 0.0, 0.0],
            Err(code) => return Err(ReadError::Channel(DriverError::new(code, device))),
        };

        let mut record = SampleRecord {
            sequence,
            timestamp: now,
            accel,
            temperature: None,
            temperature_fault: None,
            overrun,
        };

        if self.measure_temperature {
            match sensor.channel_get(Channel::DieTemp) {
                Ok(ChannelReading::Scalar(v)) => record.temperature = Some(v.to_f64()),
                Ok(ChannelReading::Xyz(v)) => record.temperature = Some(v[0].to_f64()),
                Err(code) => record.temperature_fault = Some(DriverError::new(code, device)),
            }
        }

        Ok(record)
    }

    /// Fetch one sample and hand the outcome to `sink`
    pub fn fetch_and_report<S, R>(
        &mut self,
        sensor: &mut S,
        now: Timestamp,
        sink: &mut R,
    ) -> Result<SampleRecord, ReadError>
    where
        S: SampleSource + ?Sized,
        R: ReportSink + ?Sized,
    {
        match self.fetch(sensor, now) {
            Ok(record) => {
                sink.sample(record.line(self.report_overrun));
                if let Some(fault) = &record.temperature_fault {
                    log_error!("Unable to read temperature: {}", fault.code);
                    sink.temperature_failed(fault);
                }
                Ok(record)
            }
            Err(err) => {
                log_error!("Update failed: {}", err);
                sink.read_failed(&err);
                Err(err)
            }
        }
    }
}
