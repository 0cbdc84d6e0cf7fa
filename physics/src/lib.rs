//! A simulated chaser vehicle closing on a docking port, and the instrument panel through which the autopilot sees
//! and flies it.
pub mod panel;
pub mod vehicle;

pub use panel::{DockingTolerances, Panel, Readout, ReadoutFault};
pub use vehicle::{SimulationError, Vehicle, VehicleParams};
