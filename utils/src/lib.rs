//! Shared vocabulary for the docking autopilot: the degrees of freedom it controls, the commands it issues, and the
//! contracts of the two collaborators it is wired to (a telemetry source and an actuator).
mod actuator;
mod identifiers;
mod telemetry;
mod triple;

pub use actuator::Actuator;
pub use identifiers::{Angle, Axis, ControlCommand, ControlTarget, Direction};
pub use telemetry::{numeric_prefix_of, FiniteReading, TelemetryError, TelemetrySource};
pub use triple::{AngleTriple, AxisTriple};
