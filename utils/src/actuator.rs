use std::rc::Rc;

use crate::identifiers::{ControlTarget, Direction};

/// the write side of the autopilot. Each command applies one fixed-magnitude nudge; the magnitude belongs to the
/// actuator, not to the caller. Commands cannot fail.
pub trait Actuator {
    fn command(&self, target: ControlTarget, direction: Direction);
}

impl<A: Actuator + ?Sized> Actuator for &A {
    fn command(&self, target: ControlTarget, direction: Direction) {
        (**self).command(target, direction)
    }
}

impl<A: Actuator + ?Sized> Actuator for Rc<A> {
    fn command(&self, target: ControlTarget, direction: Direction) {
        (**self).command(target, direction)
    }
}
