//! Notifications
//!
//! Transient, auto-dismissing messages. Each toast fades in shortly after it
//! is shown, stays for a fixed dwell period counted from when it was shown,
//! then fades out and is removed. Toasts stack; nothing is de-duplicated.

use std::{
    cell::RefCell,
    fmt::{Debug, Formatter, Result as FmtResult},
    rc::Rc,
    time::Duration,
};

use serde::Deserialize;

pub mod scheduler;

pub use scheduler::{ManualScheduler, Scheduler, Task, TaskHandle};

/// Identifier of a toast, unique within one [`NotificationCenter`].
pub type NotificationId = u64;

/// Visual phase of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    /// Attached but not yet shown (about to fade in).
    Entering,

    /// Fully shown.
    Visible,

    /// Fading out; removed once the fade completes.
    Leaving,
}

/// A toast currently in the visual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Toast id
    pub id: NotificationId,

    /// Message text
    pub message: String,

    /// Current phase
    pub phase: NotificationPhase,
}

/// Toast timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationTiming {
    /// Delay before a new toast becomes visible, in milliseconds.
    pub enter_delay_ms: u64,

    /// Time from showing a toast until it starts fading out, in milliseconds.
    pub dwell_ms: u64,

    /// Length of the fade-out before removal, in milliseconds.
    pub fade_ms: u64,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            enter_delay_ms: 10,
            dwell_ms: 3000,
            fade_ms: 300,
        }
    }
}

impl NotificationTiming {
    fn enter_delay(self) -> Duration {
        Duration::from_millis(self.enter_delay_ms)
    }

    fn dwell(self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    fn fade(self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

type Listener = Rc<dyn Fn(&[Notification])>;

#[derive(Default)]
struct Toasts {
    next_id: NotificationId,
    entries: Vec<Notification>,
    listeners: Vec<Listener>,
}

/// Shared toast state. Clones refer to the same toasts.
#[derive(Clone, Default)]
struct ToastState(Rc<RefCell<Toasts>>);

impl ToastState {
    fn push(&self, message: String) -> NotificationId {
        let id = {
            let mut toasts = self.0.borrow_mut();
            let id = toasts.next_id;

            toasts.next_id += 1;
            toasts.entries.push(Notification {
                id,
                message,
                phase: NotificationPhase::Entering,
            });

            id
        };

        self.emit();

        id
    }

    fn set_phase(&self, id: NotificationId, phase: NotificationPhase) {
        let changed = {
            let mut toasts = self.0.borrow_mut();

            if let Some(entry) = toasts.entries.iter_mut().find(|entry| entry.id == id) {
                entry.phase = phase;

                true
            } else {
                false
            }
        };

        if changed {
            self.emit();
        }
    }

    fn remove(&self, id: NotificationId) {
        let removed = {
            let mut toasts = self.0.borrow_mut();
            let before = toasts.entries.len();

            toasts.entries.retain(|entry| entry.id != id);

            toasts.entries.len() != before
        };

        if removed {
            self.emit();
        }
    }

    fn snapshot(&self) -> Vec<Notification> {
        self.0.borrow().entries.clone()
    }

    fn emit(&self) {
        let (entries, listeners) = {
            let toasts = self.0.borrow();

            (toasts.entries.clone(), toasts.listeners.clone())
        };

        for listener in listeners {
            listener(&entries);
        }
    }
}

/// Handle to one shown toast.
#[derive(Clone)]
pub struct NotificationHandle {
    id: NotificationId,
    tasks: Rc<RefCell<Vec<TaskHandle>>>,
    state: ToastState,
}

impl Debug for NotificationHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NotificationHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl NotificationHandle {
    /// Toast id
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Cancels every pending timer of this toast and removes it immediately.
    pub fn dismiss(&self) {
        for task in self.tasks.borrow().iter() {
            task.cancel();
        }

        self.state.remove(self.id);
    }
}

/// Stack of transient notifications driven by a [`Scheduler`].
#[derive(Clone)]
pub struct NotificationCenter<Sch: Scheduler + Clone + 'static> {
    scheduler: Sch,
    timing: NotificationTiming,
    state: ToastState,
}

impl<Sch: Scheduler + Clone + 'static> Debug for NotificationCenter<Sch> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NotificationCenter")
            .field("timing", &self.timing)
            .field("active", &self.state.snapshot())
            .finish_non_exhaustive()
    }
}

impl<Sch: Scheduler + Clone + 'static> NotificationCenter<Sch> {
    /// Creates a notification center with the given timings.
    pub fn new(scheduler: Sch, timing: NotificationTiming) -> Self {
        Self {
            scheduler,
            timing,
            state: ToastState::default(),
        }
    }

    /// Registers a listener called with every toast after each change.
    pub fn subscribe(&self, listener: impl Fn(&[Notification]) + 'static) {
        self.state.0.borrow_mut().listeners.push(Rc::new(listener));
    }

    /// Toasts currently in the visual tree, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.state.snapshot()
    }

    /// Shows a toast and schedules its fade-in, fade-out and removal.
    pub fn show(&self, message: impl Into<String>) -> NotificationHandle {
        let id = self.state.push(message.into());
        let tasks = Rc::new(RefCell::new(Vec::with_capacity(3)));

        let enter = {
            let state = self.state.clone();

            self.scheduler.schedule(
                self.timing.enter_delay(),
                Box::new(move || state.set_phase(id, NotificationPhase::Visible)),
            )
        };

        let leave = {
            let state = self.state.clone();
            let scheduler = self.scheduler.clone();
            let fade = self.timing.fade();
            let tasks = Rc::clone(&tasks);

            self.scheduler.schedule(
                self.timing.dwell(),
                Box::new(move || {
                    state.set_phase(id, NotificationPhase::Leaving);

                    let removal = scheduler.schedule(fade, Box::new(move || state.remove(id)));

                    tasks.borrow_mut().push(removal);
                }),
            )
        };

        tasks.borrow_mut().extend([enter, leave]);

        NotificationHandle {
            id,
            tasks,
            state: self.state.clone(),
        }
    }
}
