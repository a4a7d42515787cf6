//! Scheduled tasks.

use std::{
    cell::{Cell, RefCell},
    fmt::{Debug, Formatter, Result as FmtResult},
    rc::Rc,
    time::Duration,
};

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled task. Cancelling stops the task from running if it
/// has not fired yet; cancelling afterwards has no effect.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    /// Creates a handle and wraps `task` so it only runs while the handle is
    /// not cancelled. Scheduler implementations use this to honour
    /// cancellation uniformly.
    pub fn guard(task: Task) -> (Self, Task) {
        let handle = Self::default();
        let cancelled = Rc::clone(&handle.cancelled);

        let guarded: Task = Box::new(move || {
            if !cancelled.get() {
                task();
            }
        });

        (handle, guarded)
    }

    /// Prevents the task from running.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether [`TaskHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Runs tasks after a delay.
pub trait Scheduler {
    /// Schedules `task` to run once after `delay`.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

struct Pending {
    due: Duration,
    sequence: u64,
    task: Task,
}

#[derive(Default)]
struct Timeline {
    now: Duration,
    next_sequence: u64,
    pending: Vec<Pending>,
}

impl Timeline {
    fn take_next_due(&mut self, until: Duration) -> Option<Pending> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= until)
            .min_by_key(|(_, pending)| (pending.due, pending.sequence))
            .map(|(position, _)| position)?;

        Some(self.pending.swap_remove(position))
    }
}

/// Scheduler driven by a virtual clock.
///
/// Nothing runs until [`ManualScheduler::advance`] moves the clock forward.
/// Tasks fire in due order, ties broken by scheduling order, and tasks
/// scheduled while advancing run in the same call if they fall due.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    timeline: Rc<RefCell<Timeline>>,
}

impl Debug for ManualScheduler {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let timeline = self.timeline.borrow();

        f.debug_struct("ManualScheduler")
            .field("now", &timeline.now)
            .field("pending", &timeline.pending.len())
            .finish()
    }
}

impl ManualScheduler {
    /// Creates a scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.timeline.borrow().now
    }

    /// Number of tasks that have not fired yet, cancelled ones included.
    pub fn pending(&self) -> usize {
        self.timeline.borrow().pending.len()
    }

    /// Moves the clock forward by `by`, running every task that falls due.
    pub fn advance(&self, by: Duration) {
        let until = self.now().saturating_add(by);

        loop {
            let next = self.timeline.borrow_mut().take_next_due(until);

            let Some(pending) = next else {
                break;
            };

            self.timeline.borrow_mut().now = pending.due;

            (pending.task)();
        }

        self.timeline.borrow_mut().now = until;
    }

    /// Runs pending tasks until none remain, including tasks they schedule,
    /// advancing the clock to the last due time.
    pub fn run_all(&self) {
        loop {
            let last_due = self
                .timeline
                .borrow()
                .pending
                .iter()
                .map(|pending| pending.due)
                .max();

            let Some(last_due) = last_due else {
                break;
            };

            self.advance(last_due.saturating_sub(self.now()));
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let (handle, task) = TaskHandle::guard(task);
        let mut timeline = self.timeline.borrow_mut();

        let sequence = timeline.next_sequence;
        timeline.next_sequence += 1;

        let due = timeline.now.saturating_add(delay);

        timeline.pending.push(Pending {
            due,
            sequence,
            task,
        });

        handle
    }
}
