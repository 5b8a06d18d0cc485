use std::path::PathBuf;
use std::time::Duration;

use accelwatch_core::constants::sensors::DEFAULT_DEVICE_NAME;
use accelwatch_core::{SamplingMode, TriggerKind};
use accelwatch_runtime::{
    fired_channel, logger, SamplingOrchestrator, Settings, SimulatedLis2dh, TokioClock, WriterSink,
};
use anyhow::Context;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logger::init_from_env().context("installing logger")?;

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(path.as_deref())?;
    log::debug!("Settings: {:?}", settings);

    let mut device = SimulatedLis2dh::new(DEFAULT_DEVICE_NAME, settings.simulation.seed);
    if let Some(n) = settings.simulation.overrun_every {
        device = device.with_overrun_every(n);
    }

    // Stand-in for the physical interrupt pin
    let line = device.interrupt_line();
    let source = match settings.sampler.sampling_mode() {
        SamplingMode::Polling { .. } => None,
        SamplingMode::RuntimeOdr { sampling_hz } => {
            let period = Duration::from_millis((1000 / u64::from(sampling_hz.max(1))).max(1));
            Some(line.spawn_periodic(TriggerKind::DataReady, period))
        }
        SamplingMode::FixedDuration { .. } => {
            let period = Duration::from_millis(settings.simulation.motion_interval_ms.max(1));
            Some(line.spawn_periodic(TriggerKind::Delta, period))
        }
    };

    let (notifier, events) = fired_channel();
    let mut orchestrator = SamplingOrchestrator::new(
        device,
        TokioClock::new(),
        WriterSink::stdout(),
        settings.sampler,
    );
    if let Some(limit) = settings.max_samples {
        orchestrator = orchestrator.with_sample_limit(limit);
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let result = orchestrator.run(notifier, events, shutdown).await;
    if let Some(source) = source {
        source.abort();
    }

    let summary = result?;
    log::info!(
        "Stopped after {} samples ({} failed reads)",
        summary.samples,
        summary.read_errors
    );
    if let Some(stats) = summary.arbiter {
        log::info!(
            "Trigger: {} fired, {} rearmed, {} ignored",
            stats.fired,
            stats.rearmed,
            stats.ignored
        );
    }
    Ok(())
}
