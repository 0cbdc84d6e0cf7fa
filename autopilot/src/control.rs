//! The autopilot proper: proportional control of attitude, then of translation once attitude has settled.
//!
//! Every tick drives each angle's rate towards `-error / angle_gain`, which makes the error decay exponentially with
//! time constant `angle_gain`. Once every angle error is inside tolerance a latch enables translation, which does the
//! same per axis with a dampening constant in place of the gain and the rate decomposer's estimate in place of a
//! measured rate. The latch never opens again for the rest of the session, even if attitude later drifts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use arrayvec::ArrayVec;
use dock_utils::{
    Actuator, Angle, AngleTriple, Axis, ControlCommand, Direction, FiniteReading, TelemetrySource,
};
use tracing::{debug, info, trace};

use crate::config::AutopilotConfig;
use crate::error::Result;
use crate::rates::RateDecomposer;
use crate::scheduler::{CancelToken, Scheduler};

/// which control phases run each tick. Moves from `AttitudeOnly` to `AttitudeAndTranslation` once per session,
/// never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// only roll, pitch and yaw are corrected.
    AttitudeOnly,
    /// attitude keeps being corrected and every translation axis is driven towards zero as well.
    AttitudeAndTranslation,
}

/// what one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// phase after the tick.
    pub phase: Phase,
    /// every angle error was inside tolerance this tick.
    pub angles_ready: bool,
    /// number of commands sent to the actuator.
    pub commands_issued: usize,
}

pub fn correction(error: f64, rate: f64, constant: f64) -> Option<Direction> {
    //! direction of the nudge that moves `rate` towards `-error / constant`, or None inside the dead-band.
    let goal = -error / constant;
    Direction::from_delta(goal - rate)
}

/// the autopilot: owns the latch and the rate decomposer, reads from `T` and commands `A` on every tick.
pub struct ControlLoop<T, A> {
    telemetry: Rc<T>,
    actuator: A,
    rates: Rc<RateDecomposer<Rc<T>>>,
    config: AutopilotConfig,
    translation_enabled: Cell<bool>,
    running: RefCell<Option<CancelToken>>,
}

impl<T, A> ControlLoop<T, A>
where
    T: TelemetrySource + 'static,
    A: Actuator + 'static,
{
    pub fn new(telemetry: T, actuator: A, config: AutopilotConfig) -> Result<Self> {
        //! an idle loop with its own rate decomposer on the same telemetry. Fails if `config` does not validate.
        config.validate()?;
        let telemetry = Rc::new(telemetry);
        let rates = Rc::new(RateDecomposer::new(
            Rc::clone(&telemetry),
            config.poll_interval(),
        ));
        Ok(Self {
            telemetry,
            actuator,
            rates,
            config,
            translation_enabled: Cell::new(false),
            running: RefCell::new(None),
        })
    }

    pub fn rates(&self) -> &RateDecomposer<Rc<T>> {
        //! the rate decomposer feeding translation control.
        &self.rates
    }

    pub fn translation_enabled(&self) -> bool {
        //! whether the latch has closed this session.
        self.translation_enabled.get()
    }

    pub fn phase(&self) -> Phase {
        //! the phase the next tick runs in.
        if self.translation_enabled() {
            Phase::AttitudeAndTranslation
        } else {
            Phase::AttitudeOnly
        }
    }

    pub fn is_running(&self) -> bool {
        //! true between `start` and `stop`.
        self.running
            .borrow()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    pub fn start(self: &Rc<Self>, scheduler: &Scheduler) -> Result<CancelToken> {
        //! starts a session: the rate decomposer, then the control tick, on `scheduler`.
        //! both are registered now, the decomposer first, so when their ticks coincide the tick sees the fresh poll.
        //! every session begins in `AttitudeOnly`. Starting a running loop hands back its existing token.
        if let Some(token) = self.running.borrow().as_ref() {
            if !token.is_cancelled() {
                return Ok(token.clone());
            }
        }
        self.translation_enabled.set(false);
        self.rates.start(scheduler)?;

        let this = Rc::clone(self);
        let token = scheduler.every("control-tick", self.config.tick_interval(), move || {
            this.tick().map(|_| ())
        });
        *self.running.borrow_mut() = Some(token.clone());
        info!(
            tick = ?self.config.tick_interval(),
            phase = ?self.phase(),
            "control loop started"
        );
        Ok(token)
    }

    pub fn stop(&self) {
        //! ends the session: stops the control tick and the rate decomposer. Safe to call at any time, any number
        //! of times.
        if let Some(token) = self.running.borrow_mut().take() {
            token.cancel();
            info!("control loop stopped");
        }
        self.rates.stop();
    }

    pub fn tick(&self) -> Result<TickReport> {
        //! one control tick.
        //! every reading is taken and every command decided before the first command goes out, so a tick whose reads
        //! fail issues nothing and leaves the latch as it was.
        let mut commands: ArrayVec<ControlCommand, 6> = ArrayVec::new();

        // attitude phase
        let errors = AngleTriple::try_from_fn(|angle| {
            self.telemetry
                .angle_error(angle)
                .finite(|| format!("{angle} error"))
        })?;
        for angle in Angle::ALL {
            let rate = self
                .telemetry
                .angle_rate(angle)
                .finite(|| format!("{angle} rate"))?;
            if let Some(direction) = correction(*errors.get(angle), rate, self.config.angle_gain) {
                commands.push(ControlCommand::new(angle, direction));
            }
        }

        // gate
        let tolerance = self.config.angle_tolerance;
        let angles_ready = errors.all(|error| error.abs() < tolerance);
        let translation_enabled = self.translation_enabled.get() || angles_ready;

        if translation_enabled {
            for axis in Axis::ALL {
                let displacement = self
                    .telemetry
                    .axis_displacement(axis)
                    .finite(|| format!("{axis} distance"))?;
                let rate = self.rates.rate_of(axis)?;
                let dampening = self.config.dampening_for(axis, displacement);
                if let Some(direction) = correction(displacement, rate, dampening) {
                    commands.push(ControlCommand::new(axis, direction));
                }
            }
        }

        // everything read: commit.
        if translation_enabled && !self.translation_enabled.replace(true) {
            info!(?errors, "attitude within tolerance; translation enabled");
        }
        for command in &commands {
            trace!(dof = %command.target, direction = ?command.direction, "command");
            self.actuator.command(command.target, command.direction);
        }

        let report = TickReport {
            phase: self.phase(),
            angles_ready,
            commands_issued: commands.len(),
        };
        debug!(?report, "tick");
        Ok(report)
    }
}
