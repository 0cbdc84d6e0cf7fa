//! closed enumerations naming every degree of freedom the autopilot can command.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// translation degree of freedom. X is the approach axis (distance to the port), Y is lateral, Z is vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// evaluation order used by every per-axis loop.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub const fn index(self) -> usize {
        //! position of this axis in [`Axis::ALL`] and in an `AxisTriple`.
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        //! lowercase name, as used in readout labels and configuration.
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// orientation degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Angle {
    Roll,
    Pitch,
    Yaw,
}

impl Angle {
    /// evaluation order used by the attitude phase.
    pub const ALL: [Angle; 3] = [Angle::Roll, Angle::Pitch, Angle::Yaw];

    pub const fn index(self) -> usize {
        //! position of this angle in [`Angle::ALL`] and in an `AngleTriple`.
        match self {
            Angle::Roll => 0,
            Angle::Pitch => 1,
            Angle::Yaw => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        //! lowercase name, as used in readout labels and button ids.
        match self {
            Angle::Roll => "roll",
            Angle::Pitch => "pitch",
            Angle::Yaw => "yaw",
        }
    }
}

impl Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// which way a command nudges its target's rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    pub fn from_delta(delta: f64) -> Option<Self> {
        //! maps a signed correction onto a command direction. Zero is the dead-band: no command at all.
        //! NaN also falls into the dead-band, as it compares false against zero both ways.
        if delta > 0.0 {
            Some(Direction::Increase)
        } else if delta < 0.0 {
            Some(Direction::Decrease)
        } else {
            None
        }
    }

    pub const fn sign(self) -> f64 {
        //! +1 for an increase, -1 for a decrease.
        match self {
            Direction::Increase => 1.0,
            Direction::Decrease => -1.0,
        }
    }
}

/// anything a command can be addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlTarget {
    Axis(Axis),
    Angle(Angle),
}

impl ControlTarget {
    pub const fn name(self) -> &'static str {
        //! name of the axis or angle addressed.
        match self {
            ControlTarget::Axis(axis) => axis.name(),
            ControlTarget::Angle(angle) => angle.name(),
        }
    }

    pub fn button_id(self, direction: Direction) -> String {
        //! id of the control-panel button that performs this command, e.g. "pitch-up-button" or
        //! "translate-backward-button".
        // (decrease, increase) labels as printed on the panel.
        let (dec, inc) = match self {
            ControlTarget::Angle(Angle::Roll) | ControlTarget::Angle(Angle::Yaw) => ("left", "right"),
            ControlTarget::Angle(Angle::Pitch) => ("down", "up"),
            ControlTarget::Axis(Axis::X) => ("backward", "forward"),
            ControlTarget::Axis(Axis::Y) => ("left", "right"),
            ControlTarget::Axis(Axis::Z) => ("down", "up"),
        };
        let label = match direction {
            Direction::Increase => inc,
            Direction::Decrease => dec,
        };
        match self {
            ControlTarget::Angle(angle) => format!("{angle}-{label}-button"),
            ControlTarget::Axis(_) => format!("translate-{label}-button"),
        }
    }
}

impl From<Axis> for ControlTarget {
    fn from(value: Axis) -> Self {
        ControlTarget::Axis(value)
    }
}

impl From<Angle> for ControlTarget {
    fn from(value: Angle) -> Self {
        ControlTarget::Angle(value)
    }
}

impl Display for ControlTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// a single directional nudge. Built and consumed within one control tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlCommand {
    pub target: ControlTarget,
    pub direction: Direction,
}

impl ControlCommand {
    pub fn new(target: impl Into<ControlTarget>, direction: Direction) -> Self {
        //! accepts a bare `Axis` or `Angle` as the target.
        Self {
            target: target.into(),
            direction,
        }
    }
}
