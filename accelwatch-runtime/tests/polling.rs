mod common;

use std::time::Duration;

use accelwatch_core::SamplerConfig;
use accelwatch_runtime::{fired_channel, OrchestratorError};
use common::{device, lines, never, orchestrator};

#[tokio::test(start_paused = true)]
async fn reports_every_two_seconds() {
    let sim = device();
    let line = sim.interrupt_line();
    let mut orch = orchestrator(sim, SamplerConfig::polling()).with_sample_limit(3);
    let (notifier, events) = fired_channel();

    let summary = orch.run(notifier, events, never()).await.unwrap();

    assert_eq!(summary.samples, 3);
    assert_eq!(summary.read_errors, 0);
    assert_eq!(summary.arbiter, None);

    let out = lines(&orch);
    assert_eq!(out.len(), 3);
    assert!(out[0].starts_with("#1 @ 0 ms: x "), "{}", out[0]);
    assert!(out[1].starts_with("#2 @ 2000 ms: x "), "{}", out[1]);
    assert!(out[2].starts_with("#3 @ 4000 ms: x "), "{}", out[2]);

    // Nothing is written to the device and no trigger is registered
    assert_eq!(orch.driver().attributes(), Default::default());
    assert!(!line.is_registered());
}

#[tokio::test(start_paused = true)]
async fn first_record_is_numbered_one() {
    let mut orch = orchestrator(device(), SamplerConfig::polling()).with_sample_limit(1);
    let (notifier, events) = fired_channel();
    assert_eq!(orch.sequence(), 0);

    orch.run(notifier, events, never()).await.unwrap();

    assert_eq!(orch.sequence(), 1);
    let out = lines(&orch);
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("#1 @ 0 ms: "), "{}", out[0]);
}

#[tokio::test(start_paused = true)]
async fn overruns_are_not_marked() {
    let sim = device().with_overrun_every(2);
    let mut orch = orchestrator(sim, SamplerConfig::polling()).with_sample_limit(2);
    let (notifier, events) = fired_channel();

    orch.run(notifier, events, never()).await.unwrap();

    let out = lines(&orch);
    assert!(out[1].starts_with("#2 @ 2000 ms: x "), "{}", out[1]);
    assert!(out.iter().all(|l| !l.contains("OVERRUN")));
}

#[tokio::test(start_paused = true)]
async fn temperature_follows_the_sample() {
    let config = SamplerConfig {
        measure_temperature: true,
        ..SamplerConfig::polling()
    };
    let mut orch = orchestrator(device(), config).with_sample_limit(1);
    let (notifier, events) = fired_channel();

    orch.run(notifier, events, never()).await.unwrap();

    let out = lines(&orch);
    assert_eq!(out.len(), 1);
    assert!(out[0].contains(", t "), "{}", out[0]);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_loop() {
    let mut orch = orchestrator(device(), SamplerConfig::polling());
    let (notifier, events) = fired_channel();

    let summary = orch
        .run(notifier, events, tokio::time::sleep(Duration::from_millis(5000)))
        .await
        .unwrap();

    // 0, 2000 and 4000 ms
    assert_eq!(summary.samples, 3);
    assert_eq!(lines(&orch).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn device_not_ready_is_fatal() {
    let mut orch = orchestrator(device().not_ready(), SamplerConfig::polling());
    let (notifier, events) = fired_channel();

    let err = orch.run(notifier, events, never()).await.unwrap_err();

    assert!(matches!(err, OrchestratorError::NotReady("lis2dh")));
    assert!(lines(&orch).is_empty());
}
