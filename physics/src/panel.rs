//! contains the Panel: the instrument display and control buttons of the chaser. It is the only view the autopilot
//! gets of the vehicle. Readouts are rendered as text at display precision and parsed back on every read, so the
//! autopilot sees exactly what a pilot would, quantisation included.
//! Readouts can be faulted to simulate a broken display; a faulted readout never yields a number.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use dock_utils::{
    numeric_prefix_of, Actuator, Angle, Axis, ControlTarget, Direction, TelemetryError,
    TelemetrySource,
};
use tracing::trace;

use crate::vehicle::{SimulationError, Vehicle};

/// every readout on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Readout {
    AngleError(Angle),
    AngleRate(Angle),
    Distance(Axis),
    /// combined range rate.
    Speed,
    /// combined angular rate.
    AngularSpeed,
}

impl Readout {
    pub fn label(self) -> String {
        match self {
            Readout::AngleError(angle) => format!("{angle} error"),
            Readout::AngleRate(angle) => format!("{angle} rate"),
            Readout::Distance(axis) => format!("{axis} distance"),
            Readout::Speed => "range rate".to_string(),
            Readout::AngularSpeed => "angular rate".to_string(),
        }
    }
}

/// ways a readout can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutFault {
    Garbled, // shows text that is not a number
    Blank,   // shows nothing at all
}

/// how close counts as docked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockingTolerances {
    pub angle: f64,
    pub distance: f64,
}

impl Default for DockingTolerances {
    fn default() -> Self {
        Self {
            angle: 0.2,
            distance: 0.2,
        }
    }
}

/// shared handle to the vehicle behind the display. Cloning yields another handle to the same vehicle.
#[derive(Debug, Clone)]
pub struct Panel {
    vehicle: Rc<RefCell<Vehicle>>,
    faults: Rc<RefCell<HashMap<Readout, ReadoutFault>>>,
    presses: Rc<Cell<u64>>,
}

impl Panel {
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle: Rc::new(RefCell::new(vehicle)),
            faults: Rc::default(),
            presses: Rc::default(),
        }
    }

    /// copy of the true vehicle state.
    pub fn vehicle(&self) -> Vehicle {
        self.vehicle.borrow().clone()
    }

    pub fn step(&self, dt: f64) -> Result<(), SimulationError> {
        self.vehicle.borrow_mut().step(dt)
    }

    /// number of buttons pressed so far.
    pub fn presses(&self) -> u64 {
        self.presses.get()
    }

    pub fn inject_fault(&self, readout: Readout, fault: ReadoutFault) {
        self.faults.borrow_mut().insert(readout, fault);
    }

    pub fn clear_faults(&self) {
        self.faults.borrow_mut().clear();
    }

    pub fn readout(&self, readout: Readout) -> Option<String> {
        //! the text currently shown for a readout; None when the readout is blank.
        match self.faults.borrow().get(&readout) {
            Some(ReadoutFault::Blank) => return None,
            Some(ReadoutFault::Garbled) => return Some("--.-".to_string()),
            None => {}
        }
        let v = self.vehicle.borrow();
        let text = match readout {
            Readout::AngleError(angle) => format!("{:.1}°", v.attitude.get(angle)),
            Readout::AngleRate(angle) => format!("{:.1} °/s", v.angular_rate.get(angle)),
            Readout::Distance(axis) => format!("{:.1} m", v.position.get(axis)),
            Readout::Speed => format!("{:.3} m/s", v.speed()),
            Readout::AngularSpeed => format!("{:.1} °/s", v.angular_speed()),
        };
        Some(text)
    }

    pub fn is_docked(&self, tolerances: DockingTolerances) -> bool {
        let v = self.vehicle.borrow();
        v.attitude.all(|a| a.abs() < tolerances.angle)
            && v.position.all(|d| d.abs() < tolerances.distance)
    }

    fn read(&self, readout: Readout) -> Result<f64, TelemetryError> {
        let text = self
            .readout(readout)
            .ok_or_else(|| TelemetryError::missing(readout.label()))?;
        numeric_prefix_of(&text).ok_or_else(|| TelemetryError::unparsable(readout.label(), text))
    }
}

impl TelemetrySource for Panel {
    fn angle_error(&self, angle: Angle) -> Result<f64, TelemetryError> {
        self.read(Readout::AngleError(angle))
    }

    fn angle_rate(&self, angle: Angle) -> Result<f64, TelemetryError> {
        self.read(Readout::AngleRate(angle))
    }

    fn axis_displacement(&self, axis: Axis) -> Result<f64, TelemetryError> {
        self.read(Readout::Distance(axis))
    }

    fn combined_angular_rate(&self) -> Result<f64, TelemetryError> {
        self.read(Readout::AngularSpeed)
    }

    fn combined_speed(&self) -> Result<f64, TelemetryError> {
        self.read(Readout::Speed)
    }
}

impl Actuator for Panel {
    fn command(&self, target: ControlTarget, direction: Direction) {
        trace!(button = %target.button_id(direction), "press");
        self.vehicle.borrow_mut().nudge(target, direction);
        self.presses.set(self.presses.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dock_utils::{AngleTriple, AxisTriple};

    fn test_panel() -> Panel {
        Panel::new(
            Vehicle::default()
                .with_attitude(AngleTriple(1.26, -0.44, 7.0))
                .with_position(AxisTriple(42.37, -3.0, 0.5)),
        )
    }

    #[test]
    fn readouts_are_quantised_text() {
        let panel = test_panel();
        assert_eq!(panel.readout(Readout::AngleError(Angle::Roll)).unwrap(), "1.3°");
        assert_eq!(panel.readout(Readout::AngleError(Angle::Pitch)).unwrap(), "-0.4°");
        assert_eq!(panel.readout(Readout::Distance(Axis::X)).unwrap(), "42.4 m");
        assert_eq!(panel.readout(Readout::Speed).unwrap(), "0.000 m/s");
    }

    #[test]
    fn telemetry_reads_what_is_displayed() {
        let panel = test_panel();
        assert_relative_eq!(panel.angle_error(Angle::Roll).unwrap(), 1.3);
        assert_relative_eq!(panel.axis_displacement(Axis::X).unwrap(), 42.4);
        assert_eq!(panel.angle_rate(Angle::Yaw).unwrap(), 0.0);
    }

    #[test]
    fn presses_move_the_vehicle() {
        let panel = test_panel();
        let handle = panel.clone();
        panel.command(Axis::X.into(), Direction::Decrease);
        panel.command(Axis::X.into(), Direction::Decrease);
        handle.step(1.0).unwrap();

        assert_eq!(handle.presses(), 2);
        assert_relative_eq!(handle.vehicle().velocity.0, -0.04);
        assert_eq!(handle.readout(Readout::Speed).unwrap(), "0.040 m/s");
        assert_relative_eq!(handle.combined_speed().unwrap(), 0.04);
    }

    #[test]
    fn faulted_readouts_fail_reads() {
        let panel = test_panel();
        panel.inject_fault(Readout::Distance(Axis::Y), ReadoutFault::Garbled);
        panel.inject_fault(Readout::AngleRate(Angle::Pitch), ReadoutFault::Blank);

        assert_eq!(
            panel.axis_displacement(Axis::Y),
            Err(TelemetryError::unparsable("y distance", "--.-"))
        );
        assert_eq!(
            panel.angle_rate(Angle::Pitch),
            Err(TelemetryError::missing("pitch rate"))
        );
        // other readouts are unaffected.
        assert!(panel.axis_displacement(Axis::X).is_ok());

        panel.clear_faults();
        assert!(panel.axis_displacement(Axis::Y).is_ok());
    }

    #[test]
    fn non_finite_state_is_unparsable() {
        let panel = Panel::new(Vehicle::default().with_position(AxisTriple(f64::NAN, 0.0, 0.0)));
        assert!(matches!(
            panel.axis_displacement(Axis::X),
            Err(TelemetryError::Unparsable { .. })
        ));
    }

    #[test]
    fn docking_check() {
        let panel = Panel::new(
            Vehicle::default()
                .with_attitude(AngleTriple(0.1, -0.1, 0.0))
                .with_position(AxisTriple(0.15, 0.0, -0.05)),
        );
        assert!(panel.is_docked(DockingTolerances::default()));
        assert!(!test_panel().is_docked(DockingTolerances::default()));
    }
}
