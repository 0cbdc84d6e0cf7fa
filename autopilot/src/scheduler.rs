//! Single-threaded cooperative tick source.
//!
//! Jobs register a period and get a [`CancelToken`] back. Time is virtual: nothing runs until the owner advances the
//! clock, and then every tick that falls due runs to completion, one at a time, in time order (ties in registration
//! order). A tick never overlaps another tick, of its own job or any other. [`Scheduler::run_paced`] ties virtual
//! time to the wall clock for interactive use.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{trace, warn};

use crate::error::Result;

/// shortest period a job can run at.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// cancels one registered job. Cancelling is idempotent and takes effect immediately: the job's next tick never runs.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        //! stops the job before its next tick.
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        //! true once `cancel` has been called on this token or any clone of it.
        self.0.load(Ordering::SeqCst)
    }
}

type Job = Rc<RefCell<dyn FnMut() -> Result<()>>>;

struct Task {
    name: &'static str,
    period: Duration,
    next_due: Duration,
    cancel: CancelToken,
    job: Job,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    tasks: Vec<Task>,
}

impl SchedulerState {
    fn prune(&mut self) {
        self.tasks.retain(|task| !task.cancel.is_cancelled());
    }

    fn take_due(&mut self, deadline: Duration) -> Option<(&'static str, CancelToken, Job)> {
        //! finds the earliest tick due at or before the deadline, moves the clock to it and books the job's next
        //! tick. The job itself is handed back to run outside the borrow.
        self.prune();
        // min_by_key keeps the first of equal keys, which is registration order.
        let task = self
            .tasks
            .iter_mut()
            .filter(|task| task.next_due <= deadline)
            .min_by_key(|task| task.next_due)?;
        self.now = task.next_due;
        task.next_due += task.period;
        Some((task.name, task.cancel.clone(), Rc::clone(&task.job)))
    }
}

/// handle to the tick source. Clones share the same clock and jobs.
#[derive(Clone, Default)]
pub struct Scheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl Scheduler {
    pub fn new() -> Self {
        //! a scheduler at time zero with no jobs.
        Self::default()
    }

    pub fn now(&self) -> Duration {
        //! current virtual time since the scheduler was created.
        self.state.borrow().now
    }

    pub fn every<F>(&self, name: &'static str, period: Duration, job: F) -> CancelToken
    where
        F: FnMut() -> Result<()> + 'static,
    {
        //! registers `job` to run every `period`, first one period from now.
        //! periods shorter than [`MIN_PERIOD`] are raised to it so that a job can never stall the clock.
        let period = period.max(MIN_PERIOD);
        let cancel = CancelToken::default();
        let mut state = self.state.borrow_mut();
        let next_due = state.now + period;
        state.tasks.push(Task {
            name,
            period,
            next_due,
            cancel: cancel.clone(),
            job: Rc::new(RefCell::new(job)),
        });
        trace!(job = name, ?period, "registered");
        cancel
    }

    pub fn pending(&self) -> usize {
        //! number of live (not cancelled) jobs.
        self.state
            .borrow()
            .tasks
            .iter()
            .filter(|task| !task.cancel.is_cancelled())
            .count()
    }

    pub fn next_due(&self) -> Option<Duration> {
        //! when the next tick of any live job falls due.
        self.state
            .borrow()
            .tasks
            .iter()
            .filter(|task| !task.cancel.is_cancelled())
            .map(|task| task.next_due)
            .min()
    }

    pub fn advance(&self, span: Duration) -> Result<()> {
        //! runs every tick due within `span` of now. See [`Scheduler::advance_to`].
        let deadline = self.now() + span;
        self.advance_to(deadline)
    }

    pub fn advance_to(&self, deadline: Duration) -> Result<()> {
        //! runs every tick due up to and including `deadline`, then moves the clock there.
        //! a tick that fails stops the advance: the error is returned and the clock stays at the failed tick. The job
        //! stays registered; whether the session continues is the caller's decision.
        loop {
            // the borrow ends before the job runs, so jobs may register or cancel jobs themselves.
            let due = self.state.borrow_mut().take_due(deadline);
            let Some((name, cancel, job)) = due else {
                break;
            };
            if cancel.is_cancelled() {
                continue;
            }
            let outcome = (&mut *job.borrow_mut())();
            if let Err(e) = outcome {
                warn!(job = name, at = ?self.now(), "tick failed: {e}");
                return Err(e);
            }
        }
        let mut state = self.state.borrow_mut();
        state.now = state.now.max(deadline);
        Ok(())
    }

    pub async fn run_paced(&self, span: Duration) -> Result<()> {
        //! advances by `span`, sleeping so that each tick runs no earlier than its due time on the wall clock.
        let start = tokio::time::Instant::now();
        let origin = self.now();
        let deadline = origin + span;
        while let Some(due) = self.next_due().filter(|due| *due <= deadline) {
            tokio::time::sleep_until(start + (due - origin)).await;
            self.advance_to(due)?;
        }
        self.advance_to(deadline)
    }
}
