//! Shared helpers for the runtime tests

#![allow(dead_code)]

use accelwatch_core::constants::sensors::DEFAULT_DEVICE_NAME;
use accelwatch_core::SamplerConfig;
use accelwatch_runtime::{SamplingOrchestrator, SimulatedLis2dh, TokioClock, WriterSink};

pub type TestOrchestrator = SamplingOrchestrator<SimulatedLis2dh, TokioClock, WriterSink<Vec<u8>>>;

pub fn device() -> SimulatedLis2dh {
    SimulatedLis2dh::new(DEFAULT_DEVICE_NAME, 42)
}

/// Orchestrator writing into a buffer, clocked from the (paused) tokio time
pub fn orchestrator(device: SimulatedLis2dh, config: SamplerConfig) -> TestOrchestrator {
    SamplingOrchestrator::new(device, TokioClock::new(), WriterSink::new(Vec::new()), config)
}

/// Report lines written so far
pub fn lines(orchestrator: &TestOrchestrator) -> Vec<String> {
    String::from_utf8(orchestrator.sink().get_ref().clone())
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

/// A shutdown signal that never fires
pub async fn never() {
    std::future::pending::<()>().await
}
