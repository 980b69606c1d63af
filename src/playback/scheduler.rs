//! Cancellable deferred work on a cooperative clock.

use std::time::Duration;

/// Identifies a scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Scheduled<T> {
    id: TaskId,
    due: Duration,
    task: T,
}

/// Holds tasks until the clock passes their due time.
///
/// The clock only moves when [`advance`](Scheduler::advance) is called, so
/// tasks fire from the caller's own update loop and never concurrently with
/// it. A cancelled task is removed outright and can never fire.
///
/// # Examples
///
/// ```
/// use stillwater::playback::Scheduler;
/// use std::time::Duration;
///
/// let mut scheduler = Scheduler::new();
/// let keep = scheduler.schedule_after(Duration::from_millis(100), "keep");
/// let dropped = scheduler.schedule_after(Duration::from_millis(100), "dropped");
/// assert_eq!(scheduler.cancel(dropped), Some("dropped"));
///
/// assert!(scheduler.advance(Duration::from_millis(50)).is_empty());
/// assert_eq!(scheduler.advance(Duration::from_millis(50)), vec!["keep"]);
/// assert!(!scheduler.is_pending(keep));
/// ```
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Time elapsed on this scheduler's clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queues `task` to fire once `delay` has elapsed.
    pub fn schedule_after(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    /// Removes a pending task, returning it if it had not fired yet.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let index = self.pending.iter().position(|s| s.id == id)?;
        Some(self.pending.remove(index).task)
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// Advances the clock and returns every task now due, earliest first.
    pub fn advance(&mut self, delta: Duration) -> Vec<T> {
        self.now += delta;
        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = waiting;
        due.sort_by_key(|s| (s.due, s.id));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Drops every pending task, returning how many were cancelled.
    pub fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
