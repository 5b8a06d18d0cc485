//! Common test doubles for integration tests
//!
//! This module provides:
//! - A scripted sensor driver that records every call it receives
//! - A report sink writing into the same call log
//! - A notifier counting fired notifications
//!
//! Driver and sink share one log so tests can assert on the relative order of
//! reports and trigger registrations.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use accelwatch_core::{
    errors::DriverResult, AttributeKind, Channel, ChannelReading, DriverError, FiredNotifier,
    ReadError, ReportSink, SampleLine, SampleSource, SensorDriver, SensorValue, TriggerConfig,
    TriggerKind,
};

/// Everything observable the code under test did
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch,
    ChannelGet(Channel),
    AttrSet(AttributeKind, SensorValue),
    /// Trigger kind and whether a handler was installed
    TriggerSet(TriggerKind, bool),
    Report(String),
    ReadFailed(i32),
    TemperatureFailed(i32),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Counts notifications; shared between clones
#[derive(Clone, Default)]
pub struct CountingNotifier {
    pub count: Rc<Cell<u32>>,
}

impl FiredNotifier for CountingNotifier {
    fn notify(&self, _trigger: TriggerConfig) -> bool {
        self.count.set(self.count.get() + 1);
        true
    }
}

/// Scripted accelerometer
pub struct MockDriver {
    pub log: CallLog,
    /// Results returned by successive fetches; `Ok(())` once exhausted
    pub fetch_script: VecDeque<DriverResult<()>>,
    pub accel: [SensorValue; 3],
    /// Error returned by every acceleration channel read
    pub accel_fail: Option<i32>,
    pub temperature: DriverResult<SensorValue>,
    pub fail_attr: Option<i32>,
    pub fail_register: Option<i32>,
    pub fail_clear: Option<i32>,
    pub ready: bool,
    pub registered: Option<(TriggerConfig, CountingNotifier)>,
}

impl MockDriver {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fetch_script: VecDeque::new(),
            accel: [
                SensorValue::new(0, 153229),
                SensorValue::new(0, -306458),
                SensorValue::new(9, 806650),
            ],
            accel_fail: None,
            temperature: Ok(SensorValue::from_integer(24)),
            fail_attr: None,
            fail_register: None,
            fail_clear: None,
            ready: true,
            registered: None,
        }
    }

    /// Simulate the interrupt line: notify the registered handler
    pub fn fire(&self) -> bool {
        match &self.registered {
            Some((trigger, notifier)) => notifier.notify(*trigger),
            None => false,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl SampleSource for MockDriver {
    fn name(&self) -> &'static str {
        "lis2dh@19"
    }

    fn sample_fetch(&mut self) -> DriverResult<()> {
        self.record(Call::Fetch);
        self.fetch_script.pop_front().unwrap_or(Ok(()))
    }

    fn channel_get(&mut self, channel: Channel) -> DriverResult<ChannelReading> {
        self.record(Call::ChannelGet(channel));
        match channel {
            Channel::AccelXyz => match self.accel_fail {
                Some(code) => Err(code),
                None => Ok(ChannelReading::Xyz(self.accel)),
            },
            Channel::DieTemp => self.temperature.map(ChannelReading::Scalar),
        }
    }
}

impl SensorDriver for MockDriver {
    type Notifier = CountingNotifier;

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn attr_set(
        &mut self,
        _channel: Channel,
        attribute: AttributeKind,
        value: &SensorValue,
    ) -> DriverResult<()> {
        self.record(Call::AttrSet(attribute, *value));
        match self.fail_attr {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }

    fn trigger_set(
        &mut self,
        trigger: &TriggerConfig,
        handler: Option<CountingNotifier>,
    ) -> DriverResult<()> {
        self.record(Call::TriggerSet(trigger.kind, handler.is_some()));
        let failure = if handler.is_some() { self.fail_register } else { self.fail_clear };
        if let Some(code) = failure {
            return Err(code);
        }
        self.registered = handler.map(|h| (*trigger, h));
        Ok(())
    }
}

/// Sink appending to the call log
pub struct RecordingSink {
    pub log: CallLog,
}

impl ReportSink for RecordingSink {
    fn sample(&mut self, line: SampleLine<'_>) {
        self.log.borrow_mut().push(Call::Report(line.to_string()));
    }

    fn read_failed(&mut self, error: &ReadError) {
        self.log.borrow_mut().push(Call::ReadFailed(error.code()));
    }

    fn temperature_failed(&mut self, error: &DriverError) {
        self.log.borrow_mut().push(Call::TemperatureFailed(error.code));
    }
}

/// Position of the first call matching `pred`
pub fn position(calls: &[Call], pred: impl Fn(&Call) -> bool) -> Option<usize> {
    calls.iter().position(pred)
}
