//! Closed-loop docking autopilot.
//!
//! Reads attitude and position telemetry, estimates per-axis velocity with a [`RateDecomposer`], and nudges the
//! vehicle with directional commands: attitude first, then translation once attitude is inside tolerance. Both the
//! telemetry source and the actuator are injected, and all timing runs on an explicit [`Scheduler`].

pub mod config;
pub mod control;
pub mod error;
pub mod rates;
pub mod scheduler;

#[cfg(test)]
mod fakes;

pub use config::AutopilotConfig;
pub use control::{correction, ControlLoop, Phase, TickReport};
pub use error::{AutopilotError, Result};
pub use rates::{apportion, RateDecomposer};
pub use scheduler::{CancelToken, Scheduler};
