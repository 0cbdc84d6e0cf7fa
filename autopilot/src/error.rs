use dock_utils::TelemetryError;
use thiserror::Error;

/// everything that can end a tick, a session or a start-up.
#[derive(Error, Debug)]
pub enum AutopilotError {
    /// the telemetry contract was broken mid-tick. Fatal for that tick; never retried.
    #[error("telemetry read failed: {0}")]
    Telemetry(#[from] TelemetryError),

    /// a job registered by the embedding application failed.
    #[error("{job} failed: {reason}")]
    Job {
        /// name the job was registered under.
        job: &'static str,
        /// the job's own error, rendered.
        reason: String,
    },

    /// a configuration value is out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// the configuration file could not be read.
    #[error("could not read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// the configuration file is not valid JSON for [`crate::AutopilotConfig`].
    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// result of every fallible autopilot operation.
pub type Result<T> = std::result::Result<T, AutopilotError>;
