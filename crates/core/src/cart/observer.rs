//! Cart Observer

use mockall::automock;

/// Receives the presentation side effects of cart mutations.
///
/// The store never touches the page directly: after every mutation it pushes
/// the new counter value here, and successful adds (plus a few flow-level
/// messages) are raised as transient notifications. Adapters implement this
/// to redraw the header counter or to enqueue toasts.
#[automock]
pub trait CartObserver {
    /// Called with the summed quantity of every line after each mutation and
    /// once when the store is opened.
    fn counter_changed(&mut self, count: u64);

    /// Called with a short, user-facing message.
    fn notify(&mut self, message: &str);
}

/// Observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn counter_changed(&mut self, _count: u64) {}

    fn notify(&mut self, _message: &str) {}
}

/// Observer that remembers the latest counter value and every message, for
/// adapters that render after the fact (such as the CLI).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingObserver {
    /// Last counter value pushed by the store
    pub counter: u64,

    /// Messages in the order they were raised
    pub messages: Vec<String>,
}

impl CartObserver for RecordingObserver {
    fn counter_changed(&mut self, count: u64) {
        self.counter = count;
    }

    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
