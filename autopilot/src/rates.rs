//! Per-axis velocity estimation without a per-axis rate sensor.
//!
//! The display offers two imperfect views of translational motion: per-axis displacement, which is axis-resolved but
//! coarsely quantised, and a single combined speed, which is precise but carries no direction. The decomposer polls
//! displacement on its own timer to keep a finite-difference "contribution" per axis, then on demand splits the
//! combined speed across the axes in proportion to each contribution's share of the squared total, keeping the
//! contribution's sign.
//!
//! This is a heuristic, not a projection: the split takes `sqrt(|V| * share)` rather than `|V| * c / |c|`, so its
//! magnitudes are only meaningful relative to one another. The control loop only needs the right sign and a
//! monotone magnitude.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use dock_utils::{Axis, AxisTriple, FiniteReading, TelemetrySource};
use tokio::sync::watch;
use tracing::{info, trace};

use crate::error::Result;
use crate::scheduler::{CancelToken, Scheduler, MIN_PERIOD};

pub fn apportion(contributions: &AxisTriple<f64>, axis: Axis, combined: f64) -> f64 {
    //! splits `combined` across the axes by each axis's share of the squared contributions.
    //! returns 0 for every axis when all contributions are zero, as there is no direction to go on. A zero
    //! contribution counts as positive; its magnitude is zero anyway.
    let sum_sq = contributions.sum_of_squares();
    if sum_sq == 0.0 {
        return 0.0;
    }
    let c = *contributions.get(axis);
    let proportion = c * c / sum_sq;
    let magnitude = (combined.abs() * proportion).sqrt();
    if c < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

/// polls displacement and answers `rate_of` queries from the published contribution snapshots.
/// contributions are published as a whole batch through a watch channel, so a reader always sees the three values of
/// one poll, never a mix of two.
pub struct RateDecomposer<T> {
    telemetry: T,
    interval: Duration,
    last: Cell<AxisTriple<f64>>,
    contributions: watch::Sender<AxisTriple<f64>>,
    running: RefCell<Option<CancelToken>>,
}

impl<T: TelemetrySource + 'static> RateDecomposer<T> {
    pub fn new(telemetry: T, interval: Duration) -> Self {
        //! an idle decomposer that will poll every `interval` (at least [`MIN_PERIOD`]) once started.
        let (contributions, _) = watch::channel(AxisTriple::default());
        Self {
            telemetry,
            interval: interval.max(MIN_PERIOD),
            last: Cell::default(),
            contributions,
            running: RefCell::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        //! the poll period in use.
        self.interval
    }

    pub fn is_running(&self) -> bool {
        //! true between `start` and `stop`.
        self.running
            .borrow()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    pub fn start(self: &Rc<Self>, scheduler: &Scheduler) -> Result<CancelToken> {
        //! begins polling on `scheduler`.
        //! captures the starting displacement (the first poll differences against it) and clears the previous
        //! session's contributions. Starting a running decomposer hands back its existing token.
        if let Some(token) = self.running.borrow().as_ref() {
            if !token.is_cancelled() {
                return Ok(token.clone());
            }
        }
        let initial = self.read_displacements()?;
        self.last.set(initial);
        self.contributions.send_replace(AxisTriple::default());

        let this = Rc::clone(self);
        let token = scheduler.every("rate-poll", self.interval, move || this.poll());
        *self.running.borrow_mut() = Some(token.clone());
        info!(interval = ?self.interval, "rate decomposer started");
        Ok(token)
    }

    pub fn stop(&self) {
        //! stops polling. The last contributions stay in place.
        if let Some(token) = self.running.borrow_mut().take() {
            token.cancel();
            info!("rate decomposer stopped");
        }
    }

    pub fn poll(&self) -> Result<()> {
        //! one poll: differences every axis against the previous poll and publishes the batch.
        //! all three axes are read before anything changes, so a failed read leaves the previous snapshot intact.
        let current = self.read_displacements()?;
        let per_second = 1.0 / self.interval.as_secs_f64();
        let contributions = current.sub(&self.last.get()).scale(per_second);
        self.contributions.send_replace(contributions);
        self.last.set(current);
        trace!(?contributions, "polled");
        Ok(())
    }

    pub fn rate_of(&self, axis: Axis) -> Result<f64> {
        //! signed velocity estimate along `axis`, from a fresh combined speed reading.
        let combined = self
            .telemetry
            .combined_speed()
            .finite(|| "range rate".to_string())?;
        Ok(apportion(&self.contributions.borrow(), axis, combined))
    }

    pub fn contributions(&self) -> AxisTriple<f64> {
        //! copy of the latest contribution snapshot.
        *self.contributions.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AxisTriple<f64>> {
        //! receiver notified on every published snapshot.
        self.contributions.subscribe()
    }

    fn read_displacements(&self) -> Result<AxisTriple<f64>> {
        let displacements = AxisTriple::try_from_fn(|axis| {
            self.telemetry
                .axis_displacement(axis)
                .finite(|| format!("{axis} distance"))
        })?;
        Ok(displacements)
    }
}
