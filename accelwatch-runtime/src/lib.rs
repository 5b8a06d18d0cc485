//! Host runtime for AccelWatch
//!
//! Runs the core sampling engine on tokio: the orchestrator owns the driver
//! and the trigger arbiter, a simulated LIS2DH stands in for the hardware,
//! and report lines go to stdout while diagnostics go through `log`.
//!
//! ## Modes
//!
//! | Trigger mode     | Device writes               | Trigger    |
//! |------------------|-----------------------------|------------|
//! | `disabled`       | none                        | none       |
//! | `runtime_odr`    | sampling frequency          | data ready |
//! | `fixed_duration` | slope threshold, duration   | delta      |

pub mod logger;
pub mod orchestrator;
pub mod settings;
pub mod sim;
pub mod sink;

pub use orchestrator::{OrchestratorError, RunSummary, SamplingOrchestrator};
pub use settings::{Settings, SettingsError, SimulationSettings};
pub use sim::{fired_channel, ChannelNotifier, InterruptLine, SimulatedLis2dh};
pub use sink::{TokioClock, WriterSink};
