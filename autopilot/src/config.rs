//! Tuning of the autopilot. Every field has the reference value as its default, so an empty JSON object is a valid
//! configuration.

use std::path::Path;
use std::time::Duration;

use dock_utils::Axis;
use serde::{Deserialize, Serialize};

use crate::error::{AutopilotError, Result};

/// tuning knobs of the control loop and the rate decomposer, read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// period of the control tick, in milliseconds.
    pub tick_interval_ms: u64,

    /// period of the displacement poll feeding the rate decomposer, in milliseconds.
    pub poll_interval_ms: u64,

    /// attitude proportional gain. The loop drives each angular rate towards -error / gain, so errors decay with
    /// this time constant (seconds).
    pub angle_gain: f64,

    /// every angle error must be strictly below this before translation is enabled.
    pub angle_tolerance: f64,

    /// the approach axis, which gets the tighter dampening close in.
    pub primary_axis: Axis,

    /// distance along the primary axis under which the near-field dampening applies.
    pub near_field_threshold: f64,

    /// dampening of the primary axis inside the near field.
    pub near_field_dampening: f64,

    /// dampening of every other axis, and of the primary axis outside the near field.
    pub far_field_dampening: f64,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 20,
            poll_interval_ms: 100,
            angle_gain: 10.0,
            angle_tolerance: 0.2,
            primary_axis: Axis::X,
            near_field_threshold: 5.0,
            near_field_dampening: 500.0,
            far_field_dampening: 200.0,
        }
    }
}

impl AutopilotConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        //! parses and validates a configuration. Missing fields take their defaults.
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        //! reads `path` and parses it with [`AutopilotConfig::from_json_str`].
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn tick_interval(&self) -> Duration {
        //! control tick period.
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        //! displacement poll period.
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn dampening_for(&self, axis: Axis, displacement: f64) -> f64 {
        //! dampening constant for a translation axis at the given displacement.
        if axis == self.primary_axis && displacement.abs() < self.near_field_threshold {
            self.near_field_dampening
        } else {
            self.far_field_dampening
        }
    }

    pub fn validate(&self) -> Result<()> {
        //! rejects zero periods, gains or dampenings that are not finite and positive, and negative tolerances.
        if self.tick_interval_ms == 0 || self.poll_interval_ms == 0 {
            return Err(AutopilotError::Config(
                "tick and poll intervals must be non-zero".to_string(),
            ));
        }
        for (name, value) in [
            ("angle_gain", self.angle_gain),
            ("near_field_dampening", self.near_field_dampening),
            ("far_field_dampening", self.far_field_dampening),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(AutopilotError::Config(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("angle_tolerance", self.angle_tolerance),
            ("near_field_threshold", self.near_field_threshold),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AutopilotError::Config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
