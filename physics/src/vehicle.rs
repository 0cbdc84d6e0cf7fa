//! This file is responsible for the time-step simulation of the chaser: attitude error and relative position,
//! driven only by the constant-size nudges the thrusters apply.
use dock_utils::{AngleTriple, AxisTriple, ControlTarget, Direction};
use rand::Rng;

const ROTATION_STEP: f64 = 0.1; // deg/s per press
const TRANSLATION_STEP: f64 = 0.02; // m/s per press

// bounds of a randomised approach.
const MAX_START_ANGLE: f64 = 15.0;
const START_RANGE: std::ops::Range<f64> = 20.0..60.0;
const MAX_START_OFFSET: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("time step must be finite and positive, got {0}")]
    BadTimeStep(f64),
}

/// thruster characteristics. A press never changes size; only its direction is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleParams {
    pub rotation_step: f64,
    pub translation_step: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            rotation_step: ROTATION_STEP,
            translation_step: TRANSLATION_STEP,
        }
    }
}

/// true state of the chaser relative to the port. Attitude is the error from the docking attitude; position is the
/// displacement from the port, with x the approach axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub attitude: AngleTriple<f64>,
    pub angular_rate: AngleTriple<f64>,
    pub position: AxisTriple<f64>,
    pub velocity: AxisTriple<f64>,
    params: VehicleParams,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::new(VehicleParams::default())
    }
}

impl Vehicle {
    pub fn new(params: VehicleParams) -> Self {
        //! a vehicle sitting motionless on the port.
        Self {
            attitude: AngleTriple::default(),
            angular_rate: AngleTriple::default(),
            position: AxisTriple::default(),
            velocity: AxisTriple::default(),
            params,
        }
    }

    pub fn with_attitude(mut self, attitude: AngleTriple<f64>) -> Self {
        self.attitude = attitude;
        self
    }

    pub fn with_position(mut self, position: AxisTriple<f64>) -> Self {
        self.position = position;
        self
    }

    pub fn random_approach<R: Rng>(rng: &mut R, params: VehicleParams) -> Self {
        //! draws a start state at rest: tilted on every angle, some way out along x and off-centre on y and z.
        let attitude = AngleTriple::from_fn(|_| rng.gen_range(-MAX_START_ANGLE..=MAX_START_ANGLE));
        let position = AxisTriple(
            rng.gen_range(START_RANGE),
            rng.gen_range(-MAX_START_OFFSET..=MAX_START_OFFSET),
            rng.gen_range(-MAX_START_OFFSET..=MAX_START_OFFSET),
        );
        Self::new(params)
            .with_attitude(attitude)
            .with_position(position)
    }

    pub fn step(&mut self, dt: f64) -> Result<(), SimulationError> {
        //! advances the state by dt seconds. Rates are constant between presses, so a single Euler step is exact.
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimulationError::BadTimeStep(dt));
        }
        self.attitude = self.attitude.add(&self.angular_rate.scale(dt));
        self.position = self.position.add(&self.velocity.scale(dt));
        Ok(())
    }

    pub fn nudge(&mut self, target: ControlTarget, direction: Direction) {
        match target {
            ControlTarget::Angle(angle) => {
                *self.angular_rate.get_mut(angle) += direction.sign() * self.params.rotation_step
            }
            ControlTarget::Axis(axis) => {
                *self.velocity.get_mut(axis) += direction.sign() * self.params.translation_step
            }
        }
    }

    /// combined closing speed, not resolved per axis.
    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_rate.magnitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dock_utils::{Angle, Axis};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn nudges_are_fixed_size() {
        let mut v = Vehicle::default();
        v.nudge(Angle::Pitch.into(), Direction::Increase);
        v.nudge(Angle::Pitch.into(), Direction::Increase);
        v.nudge(Axis::Z.into(), Direction::Decrease);
        assert_relative_eq!(*v.angular_rate.get(Angle::Pitch), 2.0 * ROTATION_STEP);
        assert_relative_eq!(*v.velocity.get(Axis::Z), -TRANSLATION_STEP);
        assert_eq!(*v.angular_rate.get(Angle::Roll), 0.0);
    }

    #[test]
    fn step_integrates_rates() {
        let mut v = Vehicle::default()
            .with_attitude(AngleTriple(1.0, 0.0, 0.0))
            .with_position(AxisTriple(10.0, 0.0, 0.0));
        v.angular_rate = AngleTriple(-0.5, 0.0, 0.25);
        v.velocity = AxisTriple(-1.0, 0.5, 0.0);
        v.step(2.0).unwrap();
        assert_relative_eq!(v.attitude.0, 0.0);
        assert_relative_eq!(v.attitude.2, 0.5);
        assert_relative_eq!(v.position.0, 8.0);
        assert_relative_eq!(v.position.1, 1.0);
    }

    #[test]
    fn bad_time_steps_are_rejected() {
        let mut v = Vehicle::default();
        assert_eq!(v.step(0.0), Err(SimulationError::BadTimeStep(0.0)));
        assert!(v.step(f64::NAN).is_err());
        assert!(v.step(-0.01).is_err());
    }

    #[test]
    fn random_approach_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = Vehicle::random_approach(&mut rng, VehicleParams::default());
            assert!(v.attitude.all(|a| a.abs() <= MAX_START_ANGLE));
            assert!(START_RANGE.contains(&v.position.0));
            assert!(v.position.1.abs() <= MAX_START_OFFSET);
            assert!(v.position.2.abs() <= MAX_START_OFFSET);
            assert_eq!(v.speed(), 0.0);
            assert_eq!(v.angular_speed(), 0.0);
        }
    }
}
