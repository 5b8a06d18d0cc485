//! Sampling orchestrator
//!
//! Picks the operating mode once, configures the device for it and then
//! runs until shutdown:
//!
//! - **Polling**: fetch and report every `poll_interval_ms`; no trigger.
//! - **Runtime ODR**: write the sampling frequency, arm the data-ready
//!   trigger, report on every event.
//! - **Fixed duration**: write slope threshold and duration, arm the delta
//!   trigger, report on every event and rearm one ODR period later.
//!
//! In the interrupt modes one task owns the driver and the arbiter and
//! selects over three sources:
//!
//! ```text
//!   fired channel ──→ on_fired        (driver's restricted context)
//!   rearm deadline ─→ on_timer + run_deferred   (worker context)
//!   idle tick ──────→ nothing         (coarse wake-up)
//! ```
//!
//! Because a single task owns everything, the fired handler and the rearm
//! never overlap and no lock is needed.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use accelwatch_core::{
    convert::write_attribute, ArbiterError, ArbiterStats, AttributeConverter, AttributeKind,
    ConfigError, DriverError, ReportSink, SampleReader, SamplerConfig, SamplingMode, SensorDriver,
    SensorValue, TimeSource, TriggerArbiter, TriggerConfig,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Fatal orchestrator failures
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Device {0} is not ready")]
    NotReady(&'static str),

    #[error("Failed to configure device: {0}")]
    Configure(#[from] ConfigError),

    #[error("Failed to set trigger: {0}")]
    Arm(DriverError),

    #[error("Trigger could not be re-armed: {0}")]
    Rearm(ArbiterError),

    #[error("Fired event channel closed")]
    EventsClosed,
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Samples reported
    pub samples: u32,
    /// Failed reads
    pub read_errors: u32,
    /// Arbiter counters, for interrupt modes
    pub arbiter: Option<ArbiterStats>,
}

impl RunSummary {
    fn record<T, E>(&mut self, result: &Result<T, E>) {
        match result {
            Ok(_) => self.samples += 1,
            Err(_) => self.read_errors += 1,
        }
    }

    fn attempts(&self) -> u32 {
        self.samples + self.read_errors
    }
}

/// Drives a sensor in the configured sampling mode
pub struct SamplingOrchestrator<D, C, R> {
    driver: D,
    clock: C,
    sink: R,
    config: SamplerConfig,
    mode: SamplingMode,
    reader: SampleReader,
    sample_limit: Option<u32>,
}

impl<D, C, R> SamplingOrchestrator<D, C, R>
where
    D: SensorDriver,
    D::Notifier: Clone,
    C: TimeSource,
    R: ReportSink,
{
    pub fn new(driver: D, clock: C, sink: R, config: SamplerConfig) -> Self {
        Self {
            driver,
            clock,
            sink,
            mode: config.sampling_mode(),
            reader: SampleReader::new(config.measure_temperature, config.report_overrun()),
            config,
            sample_limit: None,
        }
    }

    /// Stop after `limit` fetch attempts
    pub fn with_sample_limit(mut self, limit: u32) -> Self {
        self.sample_limit = Some(limit);
        self
    }

    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Sequence number of the last fetch attempt, 0 before the first
    pub fn sequence(&self) -> u32 {
        self.reader.sequence()
    }

    /// Write the attributes the mode needs
    ///
    /// Returns the trigger to arm, or `None` when polling.
    pub fn configure(&mut self) -> Result<Option<TriggerConfig>, OrchestratorError> {
        if !self.driver.is_ready() {
            log::error!("Device {} is not ready", self.driver.name());
            return Err(OrchestratorError::NotReady(self.driver.name()));
        }

        match self.mode {
            SamplingMode::Polling { interval_ms } => {
                log::info!("Polling at {} Hz", 1000.0 / interval_ms.max(1) as f64);
                Ok(None)
            }
            SamplingMode::RuntimeOdr { sampling_hz } => {
                let hz = i32::try_from(sampling_hz).map_err(|_| {
                    log::error!("Sampling frequency {} Hz out of range", sampling_hz);
                    ConfigError::SamplingFrequency(sampling_hz)
                })?;
                let odr = SensorValue::from_integer(hz);
                write_attribute(&mut self.driver, AttributeKind::SamplingFrequency, &odr)
                    .map_err(|e| OrchestratorError::Configure(e.into()))?;
                log::info!("Sampling at {} Hz", sampling_hz);
                Ok(Some(TriggerConfig::data_ready()))
            }
            SamplingMode::FixedDuration { threshold_m_s2, duration_s } => {
                let converter = AttributeConverter::new(self.config.range, self.config.odr);
                converter
                    .write_threshold(&mut self.driver, threshold_m_s2)
                    .map_err(|e| OrchestratorError::Configure(e.into()))?;
                converter.write_duration(&mut self.driver, duration_s)?;
                Ok(Some(TriggerConfig::delta()))
            }
        }
    }

    /// Configure, then sample until `shutdown` completes or the sample
    /// limit is reached
    ///
    /// `notifier` is installed with the trigger; its events must arrive on
    /// `events`. Both are unused when polling.
    pub async fn run<F>(
        &mut self,
        notifier: D::Notifier,
        mut events: mpsc::UnboundedReceiver<TriggerConfig>,
        shutdown: F,
    ) -> Result<RunSummary, OrchestratorError>
    where
        F: Future<Output = ()>,
    {
        let trigger = self.configure()?;
        tokio::pin!(shutdown);

        match trigger {
            None => self.poll_loop(&mut shutdown).await,
            Some(trigger) => {
                self.interrupt_loop(trigger, notifier, &mut events, &mut shutdown)
                    .await
            }
        }
    }

    fn limit_reached(&self, summary: &RunSummary) -> bool {
        self.sample_limit.is_some_and(|limit| summary.attempts() >= limit)
    }

    async fn poll_loop<F>(
        &mut self,
        shutdown: &mut Pin<&mut F>,
    ) -> Result<RunSummary, OrchestratorError>
    where
        F: Future<Output = ()>,
    {
        let mut summary = RunSummary::default();
        let mut ticker = tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.limit_reached(&summary) {
            tokio::select! {
                _ = shutdown.as_mut() => break,
                _ = ticker.tick() => {
                    let now = self.clock.now();
                    let result = self.reader.fetch_and_report(&mut self.driver, now, &mut self.sink);
                    summary.record(&result);
                }
            }
        }

        Ok(summary)
    }

    async fn interrupt_loop<F>(
        &mut self,
        trigger: TriggerConfig,
        notifier: D::Notifier,
        events: &mut mpsc::UnboundedReceiver<TriggerConfig>,
        shutdown: &mut Pin<&mut F>,
    ) -> Result<RunSummary, OrchestratorError>
    where
        F: Future<Output = ()>,
    {
        let mut arbiter = TriggerArbiter::new(trigger, self.config.odr, notifier);
        arbiter.arm(&mut self.driver).map_err(|e| {
            log::error!("Failed to set trigger: {}", e.code);
            OrchestratorError::Arm(e)
        })?;
        log::info!("Waiting for triggers");

        let mut summary = RunSummary::default();
        let mut idle = tokio::time::interval(Duration::from_millis(self.config.idle_interval_ms.max(1)));
        idle.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let result = loop {
            if self.limit_reached(&summary) {
                break Ok(());
            }

            let deadline = arbiter.next_deadline();
            let rearm_due = tokio::time::sleep(self.until(deadline));

            tokio::select! {
                biased;

                _ = shutdown.as_mut() => break Ok(()),

                event = events.recv() => match event {
                    Some(fired) if fired == trigger => {
                        let now = self.clock.now();
                        let report =
                            arbiter.on_fired(&mut self.driver, &mut self.reader, &mut self.sink, now);
                        if let Some(report) = report {
                            summary.record(&report.sample);
                        }
                    }
                    Some(other) => log::debug!("Ignoring event for {:?}", other),
                    None => break Err(OrchestratorError::EventsClosed),
                },

                _ = rearm_due, if deadline.is_some() => {
                    if arbiter.on_timer(self.clock.now()) {
                        if let Err(e) = arbiter.run_deferred(&mut self.driver) {
                            break Err(OrchestratorError::Rearm(e));
                        }
                    }
                }

                _ = idle.tick() => {}
            }
        };

        summary.arbiter = Some(*arbiter.stats());
        result.map(|()| summary)
    }

    fn until(&self, deadline: Option<u64>) -> Duration {
        let now = self.clock.now();
        Duration::from_millis(deadline.map_or(0, |d| d.saturating_sub(now)))
    }
}
