//! Simulated LIS2DH accelerometer
//!
//! Stands in for the hardware driver so the sampler runs end to end on a
//! host. It keeps the attribute writes it receives, produces gravity plus a
//! little noise on every fetch, and exposes the interrupt line through
//! [`InterruptLine`], which a periodic task (or a test) raises.
//!
//! Fired notifications travel over a tokio channel: the driver's restricted
//! context only sends, the orchestrator's loop receives.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use accelwatch_core::constants::sensors::STANDARD_GRAVITY_M_S2;
use accelwatch_core::errors::{DriverResult, EBADMSG, EBUSY, EIO};
use accelwatch_core::{
    AttributeKind, Channel, ChannelReading, FiredNotifier, SampleSource, SensorDriver,
    SensorValue, TriggerConfig, TriggerKind,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sends fired notifications to the orchestrator
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<TriggerConfig>,
}

impl FiredNotifier for ChannelNotifier {
    fn notify(&self, trigger: TriggerConfig) -> bool {
        self.tx.send(trigger).is_ok()
    }
}

/// Notifier and the receiving end the orchestrator listens on
pub fn fired_channel() -> (ChannelNotifier, mpsc::UnboundedReceiver<TriggerConfig>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelNotifier { tx }, rx)
}

type Registration = Arc<Mutex<Option<(TriggerConfig, ChannelNotifier)>>>;

/// Attribute values last written to the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimAttributes {
    pub slope_threshold: Option<SensorValue>,
    pub slope_duration: Option<SensorValue>,
    pub sampling_frequency: Option<SensorValue>,
}

/// Host-side LIS2DH stand-in
pub struct SimulatedLis2dh {
    name: &'static str,
    registration: Registration,
    attributes: SimAttributes,
    rng: u32,
    fetches: u32,
    overrun_every: Option<u32>,
    ready: bool,
    busy_attributes: bool,
    registrations_left: Option<u32>,
}

impl SimulatedLis2dh {
    pub fn new(name: &'static str, seed: u32) -> Self {
        Self {
            name,
            registration: Arc::new(Mutex::new(None)),
            attributes: SimAttributes::default(),
            // xorshift state must be non-zero
            rng: seed.max(1),
            fetches: 0,
            overrun_every: None,
            ready: true,
            busy_attributes: false,
            registrations_left: None,
        }
    }

    /// Report an overrun on every `n`th fetch
    pub fn with_overrun_every(mut self, n: u32) -> Self {
        self.overrun_every = Some(n.max(1));
        self
    }

    /// Pretend the device never finished initialising
    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    /// Reject every attribute write with `-EBUSY`
    pub fn rejecting_attributes(mut self) -> Self {
        self.busy_attributes = true;
        self
    }

    /// Accept `n` trigger registrations, then fail every later one with
    /// `-EIO`. Clearing always succeeds.
    pub fn refusing_triggers_after(mut self, n: u32) -> Self {
        self.registrations_left = Some(n);
        self
    }

    pub fn attributes(&self) -> SimAttributes {
        self.attributes
    }

    /// Handle to the interrupt line
    pub fn interrupt_line(&self) -> InterruptLine {
        InterruptLine { registration: Arc::clone(&self.registration) }
    }

    fn next_noise(&mut self) -> f64 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        // roughly ±0.05 m/s²
        (x % 1000) as f64 / 10_000.0 - 0.05
    }
}

impl SampleSource for SimulatedLis2dh {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sample_fetch(&mut self) -> DriverResult<()> {
        self.fetches += 1;
        match self.overrun_every {
            Some(n) if self.fetches % n == 0 => Err(-EBADMSG),
            _ => Ok(()),
        }
    }

    fn channel_get(&mut self, channel: Channel) -> DriverResult<ChannelReading> {
        match channel {
            Channel::AccelXyz => {
                let x = self.next_noise();
                let y = self.next_noise();
                let z = STANDARD_GRAVITY_M_S2 + self.next_noise();
                Ok(ChannelReading::Xyz([
                    SensorValue::from_f64(x),
                    SensorValue::from_f64(y),
                    SensorValue::from_f64(z),
                ]))
            }
            Channel::DieTemp => {
                let t = 24.0 + self.next_noise() * 10.0;
                Ok(ChannelReading::Scalar(SensorValue::from_f64(t)))
            }
        }
    }
}

impl SensorDriver for SimulatedLis2dh {
    type Notifier = ChannelNotifier;

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn attr_set(
        &mut self,
        _channel: Channel,
        attribute: AttributeKind,
        value: &SensorValue,
    ) -> DriverResult<()> {
        if self.busy_attributes {
            return Err(-EBUSY);
        }
        let slot = match attribute {
            AttributeKind::SlopeThreshold => &mut self.attributes.slope_threshold,
            AttributeKind::SlopeDuration => &mut self.attributes.slope_duration,
            AttributeKind::SamplingFrequency => &mut self.attributes.sampling_frequency,
        };
        *slot = Some(*value);
        Ok(())
    }

    fn trigger_set(
        &mut self,
        trigger: &TriggerConfig,
        handler: Option<ChannelNotifier>,
    ) -> DriverResult<()> {
        if handler.is_some() {
            match self.registrations_left.as_mut() {
                Some(0) => return Err(-EIO),
                Some(left) => *left -= 1,
                None => {}
            }
        }
        let mut registration = self.registration.lock().unwrap_or_else(PoisonError::into_inner);
        *registration = handler.map(|h| (*trigger, h));
        Ok(())
    }
}

/// The sensor's interrupt output
#[derive(Clone)]
pub struct InterruptLine {
    registration: Registration,
}

impl InterruptLine {
    /// Raise the line for `kind`. Returns `true` if a handler was notified.
    pub fn raise(&self, kind: TriggerKind) -> bool {
        let registration = self.registration.lock().unwrap_or_else(PoisonError::into_inner);
        match registration.as_ref() {
            Some((trigger, notifier)) if trigger.kind == kind => notifier.notify(*trigger),
            _ => false,
        }
    }

    /// A trigger is currently registered
    pub fn is_registered(&self) -> bool {
        self.registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Raise the line every `period`
    pub fn spawn_periodic(self, kind: TriggerKind, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !self.raise(kind) {
                    log::trace!("{:?} interrupt while no handler registered", kind);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_show_gravity() {
        let mut sim = SimulatedLis2dh::new("sim", 7);
        sim.sample_fetch().unwrap();
        match sim.channel_get(Channel::AccelXyz).unwrap() {
            ChannelReading::Xyz(v) => {
                assert!((v[2].to_f64() - STANDARD_GRAVITY_M_S2).abs() < 0.06);
                assert!(v[0].to_f64().abs() < 0.06);
            }
            other => panic!("unexpected reading {:?}", other),
        }
    }

    #[test]
    fn overrun_schedule() {
        let mut sim = SimulatedLis2dh::new("sim", 1).with_overrun_every(3);
        assert_eq!(sim.sample_fetch(), Ok(()));
        assert_eq!(sim.sample_fetch(), Ok(()));
        assert_eq!(sim.sample_fetch(), Err(-EBADMSG));
    }

    #[test]
    fn line_only_reaches_matching_registration() {
        let mut sim = SimulatedLis2dh::new("sim", 1);
        let line = sim.interrupt_line();
        let (notifier, mut rx) = fired_channel();

        assert!(!line.raise(TriggerKind::Delta));

        sim.trigger_set(&TriggerConfig::delta(), Some(notifier)).unwrap();
        assert!(!line.raise(TriggerKind::DataReady));
        assert!(line.raise(TriggerKind::Delta));
        assert_eq!(rx.try_recv().unwrap(), TriggerConfig::delta());

        sim.trigger_set(&TriggerConfig::delta(), None).unwrap();
        assert!(!line.is_registered());
        assert!(!line.raise(TriggerKind::Delta));
    }

    #[test]
    fn attributes_are_kept() {
        let mut sim = SimulatedLis2dh::new("sim", 1);
        sim.attr_set(Channel::AccelXyz, AttributeKind::SlopeDuration, &SensorValue::from_integer(10))
            .unwrap();
        assert_eq!(sim.attributes().slope_duration, Some(SensorValue::from_integer(10)));

        let mut busy = SimulatedLis2dh::new("sim", 1).rejecting_attributes();
        assert_eq!(
            busy.attr_set(Channel::AccelXyz, AttributeKind::SlopeThreshold, &SensorValue::default()),
            Err(-EBUSY)
        );
    }

    #[test]
    fn registrations_run_out() {
        let mut sim = SimulatedLis2dh::new("sim", 1).refusing_triggers_after(1);
        let (notifier, _rx) = fired_channel();

        assert_eq!(sim.trigger_set(&TriggerConfig::delta(), Some(notifier.clone())), Ok(()));
        assert_eq!(sim.trigger_set(&TriggerConfig::delta(), None), Ok(()));
        assert_eq!(sim.trigger_set(&TriggerConfig::delta(), Some(notifier)), Err(-EIO));
    }
}
