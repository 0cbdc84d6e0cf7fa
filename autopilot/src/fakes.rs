//! scripted collaborators for unit tests.
use std::cell::{Cell, RefCell};

use dock_utils::{
    Actuator, Angle, AngleTriple, Axis, AxisTriple, ControlCommand, ControlTarget, Direction,
    TelemetryError, TelemetrySource,
};

/// a field that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AngleError,
    AngleRate,
    Displacement,
    Speed,
}

/// telemetry that reports whatever the test last set, and never moves on its own.
#[derive(Default)]
pub struct FakeTelemetry {
    pub angle_errors: Cell<AngleTriple<f64>>,
    pub angle_rates: Cell<AngleTriple<f64>>,
    pub displacements: Cell<AxisTriple<f64>>,
    pub speed: Cell<f64>,
    pub failing: Cell<Option<Field>>,
}

impl FakeTelemetry {
    fn check(&self, field: Field, label: String) -> Result<(), TelemetryError> {
        if self.failing.get() == Some(field) {
            Err(TelemetryError::unparsable(label, "--.-"))
        } else {
            Ok(())
        }
    }
}

impl TelemetrySource for FakeTelemetry {
    fn angle_error(&self, angle: Angle) -> Result<f64, TelemetryError> {
        self.check(Field::AngleError, format!("{angle} error"))?;
        Ok(*self.angle_errors.get().get(angle))
    }

    fn angle_rate(&self, angle: Angle) -> Result<f64, TelemetryError> {
        self.check(Field::AngleRate, format!("{angle} rate"))?;
        Ok(*self.angle_rates.get().get(angle))
    }

    fn axis_displacement(&self, axis: Axis) -> Result<f64, TelemetryError> {
        self.check(Field::Displacement, format!("{axis} distance"))?;
        Ok(*self.displacements.get().get(axis))
    }

    fn combined_angular_rate(&self) -> Result<f64, TelemetryError> {
        Ok(self.angle_rates.get().magnitude())
    }

    fn combined_speed(&self) -> Result<f64, TelemetryError> {
        self.check(Field::Speed, "range rate".to_string())?;
        Ok(self.speed.get())
    }
}

/// remembers every command, in order.
#[derive(Default)]
pub struct RecordingActuator {
    commands: RefCell<Vec<ControlCommand>>,
}

impl RecordingActuator {
    pub fn take(&self) -> Vec<ControlCommand> {
        self.commands.take()
    }
}

impl Actuator for RecordingActuator {
    fn command(&self, target: ControlTarget, direction: Direction) {
        self.commands
            .borrow_mut()
            .push(ControlCommand { target, direction });
    }
}
