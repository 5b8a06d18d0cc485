//! Trigger lifecycle
//!
//! The arbiter owns the hardware trigger registration. It is the only code
//! that calls `trigger_set`, and it obeys one rule: a trigger is never
//! re-registered from inside the fired handler. The driver forbids it, so the
//! motion (delta) trigger goes through a cycle:
//!
//! ```text
//!            arm()
//!   Idle ──────────→ Armed ←──────────────────────┐
//!                      │ on_fired()                │ rearm() ok
//!                      ↓                           │
//!                    Fired ── clear, start timer ─→ RearmScheduled
//!                                                  │ rearm() err: stays here
//! ```
//!
//! `on_fired` reports the sample, clears the trigger and starts the
//! [`RearmTimer`] for one ODR period. Timer expiry only *submits* a rearm to
//! the [`WorkQueue`]; the worker context executes it with [`TriggerArbiter::run_deferred`].
//!
//! A data-ready trigger re-arms itself in hardware, so firing goes straight
//! back to `Armed`.
//!
//! A failed rearm is not retried. The arbiter stays in `RearmScheduled`, is
//! marked stuck, and the error is handed to the caller, which treats it as
//! fatal.

use crate::config::OdrTier;
use crate::driver::{FiredNotifier, SensorDriver, TriggerConfig, TriggerKind};
use crate::errors::{ArbiterError, DriverError, ReadError};
use crate::reader::{ReportSink, SampleReader, SampleRecord};
use crate::time::Timestamp;
use crate::work::{RearmTimer, WorkItem, WorkQueue};

/// Trigger lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbiterState {
    /// Nothing registered yet
    Idle,
    /// Trigger registered, waiting for an event
    Armed,
    /// Inside the fired handler
    Fired,
    /// Trigger cleared, rearm pending
    RearmScheduled,
}

/// Lifetime counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArbiterStats {
    /// Fired events handled
    pub fired: u32,
    /// Events that arrived while not armed
    pub ignored: u32,
    /// Successful rearms
    pub rearmed: u32,
    /// Failed trigger clears in the fired handler
    pub clear_failures: u32,
    /// Failed rearms
    pub rearm_failures: u32,
}

/// Outcome of a handled fired event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredReport {
    /// The sample read for this event
    pub sample: Result<SampleRecord, ReadError>,
    /// When the rearm becomes due, for delta triggers
    pub rearm_deadline: Option<Timestamp>,
}

/// Owns one hardware trigger registration
pub struct TriggerArbiter<N> {
    trigger: TriggerConfig,
    notifier: N,
    state: ArbiterState,
    timer: RearmTimer,
    work: WorkQueue,
    stuck: Option<DriverError>,
    stats: ArbiterStats,
}

impl<N: FiredNotifier + Clone> TriggerArbiter<N> {
    /// Arbiter for `trigger`, rearming one `odr` period after each event
    pub fn new(trigger: TriggerConfig, odr: OdrTier, notifier: N) -> Self {
        Self {
            trigger,
            notifier,
            state: ArbiterState::Idle,
            timer: RearmTimer::new(odr.period_ms()),
            work: WorkQueue::new(),
            stuck: None,
            stats: ArbiterStats::default(),
        }
    }

    /// Trigger this arbiter registers
    pub fn trigger(&self) -> &TriggerConfig {
        &self.trigger
    }

    /// Current lifecycle state
    pub fn state(&self) -> ArbiterState {
        self.state
    }

    /// Counters since construction
    pub fn stats(&self) -> &ArbiterStats {
        &self.stats
    }

    /// Driver error that left the arbiter stuck, if any
    pub fn stuck(&self) -> Option<DriverError> {
        self.stuck
    }

    /// Deadline of the running rearm timer
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timer.deadline()
    }

    /// Deferred work is waiting for the worker context
    pub fn has_pending_work(&self) -> bool {
        !self.work.is_empty()
    }

    /// Register the trigger
    ///
    /// Driver errors are returned unchanged. Arming again while armed simply
    /// refreshes the registration.
    pub fn arm<D>(&mut self, driver: &mut D) -> Result<(), DriverError>
    where
        D: SensorDriver<Notifier = N>,
    {
        self.register(driver)?;
        self.state = ArbiterState::Armed;
        log_info!("Armed {:?} trigger on {}", self.trigger.kind, driver.name());
        Ok(())
    }

    /// Fired handler
    ///
    /// Runs in the driver's restricted context. Reads and reports the sample
    /// first; for a delta trigger it then clears the registration and starts
    /// the rearm timer. Events arriving while not armed are ignored and
    /// return `None`.
    pub fn on_fired<D, R>(
        &mut self,
        driver: &mut D,
        reader: &mut SampleReader,
        sink: &mut R,
        now: Timestamp,
    ) -> Option<FiredReport>
    where
        D: SensorDriver<Notifier = N>,
        R: ReportSink + ?Sized,
    {
        if self.state != ArbiterState::Armed {
            log_debug!("Ignoring {:?} event in state {:?}", self.trigger.kind, self.state);
            self.stats.ignored += 1;
            return None;
        }

        self.state = ArbiterState::Fired;
        self.stats.fired += 1;

        let sample = reader.fetch_and_report(driver, now, sink);

        if self.trigger.kind == TriggerKind::DataReady {
            self.state = ArbiterState::Armed;
            return Some(FiredReport { sample, rearm_deadline: None });
        }

        // A failed clear still starts the timer; the rearm replaces any
        // registration that survived it
        if let Err(code) = driver.trigger_set(&self.trigger, None) {
            self.stats.clear_failures += 1;
            log_error!("Failed to clear trigger: {}", code);
        }

        let deadline = self.timer.start(now);
        self.state = ArbiterState::RearmScheduled;
        log_debug!("Rearm due at {} ms", deadline);

        Some(FiredReport { sample, rearm_deadline: Some(deadline) })
    }

    /// Timer expiry
    ///
    /// Submits the rearm to the work queue when the timer has run out. Safe
    /// to call from any context; it never touches the device.
    pub fn on_timer(&mut self, now: Timestamp) -> bool {
        if self.timer.expired(now) {
            self.work.submit(WorkItem::Rearm)
        } else {
            false
        }
    }

    /// Worker context: run all pending work
    ///
    /// Returns the number of items executed. Stops at the first failure.
    pub fn run_deferred<D>(&mut self, driver: &mut D) -> Result<usize, ArbiterError>
    where
        D: SensorDriver<Notifier = N>,
    {
        let mut ran = 0;
        while let Some(item) = self.work.take() {
            match item {
                WorkItem::Rearm => self.rearm(driver)?,
            }
            ran += 1;
        }
        Ok(ran)
    }

    /// Worker context: re-register the trigger
    pub fn rearm<D>(&mut self, driver: &mut D) -> Result<(), ArbiterError>
    where
        D: SensorDriver<Notifier = N>,
    {
        if self.state != ArbiterState::RearmScheduled {
            return Err(ArbiterError::NotScheduled);
        }

        match self.register(driver) {
            Ok(()) => {
                self.state = ArbiterState::Armed;
                self.stuck = None;
                self.stats.rearmed += 1;
                Ok(())
            }
            Err(err) => {
                self.stuck = Some(err);
                self.stats.rearm_failures += 1;
                log_error!("Failed to reset trigger: {}", err.code);
                Err(ArbiterError::RearmFailed(err))
            }
        }
    }

    fn register<D>(&mut self, driver: &mut D) -> Result<(), DriverError>
    where
        D: SensorDriver<Notifier = N>,
    {
        driver
            .trigger_set(&self.trigger, Some(self.notifier.clone()))
            .map_err(|code| DriverError::new(code, driver.name()))
    }
}
