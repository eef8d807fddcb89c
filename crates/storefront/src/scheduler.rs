//! Cancellable one-shot timers.
//!
//! The cart schedules exactly one task: hiding itself after a delay. The
//! [`Scheduler`] trait lets the host decide how time passes:
//!
//! - [`TokioScheduler`] - real time on a tokio runtime
//! - [`ManualScheduler`] - virtual clock advanced explicitly, for tests and
//!   hosts that drive their own event loop
//!
//! Cancelling a [`TimerHandle`] is idempotent: cancelling twice, or cancelling
//! a timer that already fired, does nothing.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A task run when a timer fires.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled task.
pub trait TimerHandle: Send {
    /// Whether the task is still waiting to run.
    fn is_active(&self) -> bool;

    /// Prevent the task from running. No-op if it already ran or was cancelled.
    fn cancel(&mut self);
}

/// Runs tasks after a delay.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Task) -> Box<dyn TimerHandle>;
}

// =============================================================================
// Tokio
// =============================================================================

/// Scheduler backed by `tokio::time::sleep` on a runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Create a scheduler that spawns onto `runtime`.
    #[must_use]
    pub const fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Create a scheduler on the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime.
    pub fn from_current() -> Result<Self, tokio::runtime::TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Box<dyn TimerHandle> {
        let state = Arc::new(Mutex::new(TimerState::Pending));
        let task_state = Arc::clone(&state);
        let join = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Held while the task runs so `cancel` cannot return mid-task.
            let mut state = task_state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == TimerState::Pending {
                *state = TimerState::Fired;
                task();
            }
        });
        Box::new(TokioTimer { join, state })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Pending,
    Fired,
    Cancelled,
}

struct TokioTimer {
    join: JoinHandle<()>,
    state: Arc<Mutex<TimerState>>,
}

impl TokioTimer {
    fn lock(&self) -> std::sync::MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TimerHandle for TokioTimer {
    fn is_active(&self) -> bool {
        *self.lock() == TimerState::Pending && !self.join.is_finished()
    }

    /// Blocks while the task is running on another worker, so once this
    /// returns the task has either finished or will never run.
    fn cancel(&mut self) {
        let mut state = self.lock();
        if *state == TimerState::Pending {
            *state = TimerState::Cancelled;
            self.join.abort();
        }
    }
}

// =============================================================================
// Manual
// =============================================================================

struct PendingTask {
    id: u64,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTask>,
}

/// Scheduler with a virtual clock.
///
/// Clones share the same clock, so a test can keep one clone and hand
/// another to the cart.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<Clock>>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let clock = self.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &clock.now)
            .field("pending", &clock.pending.len())
            .finish()
    }
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Move the clock forward and run every task that comes due, in due order.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut clock = self.lock();
            clock.now += by;
            let now = clock.now;

            let (mut due, waiting): (Vec<_>, Vec<_>) =
                clock.pending.drain(..).partition(|t| t.due <= now);
            clock.pending = waiting;
            due.sort_by_key(|t| (t.due, t.id));
            due
        };

        let ran = due.len();
        for pending in due {
            (pending.task)();
        }
        ran
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Box<dyn TimerHandle> {
        let mut clock = self.lock();
        let id = clock.next_id;
        clock.next_id += 1;
        let due = clock.now + delay;
        clock.pending.push(PendingTask { id, due, task });

        Box::new(ManualTimer {
            id,
            clock: Arc::clone(&self.clock),
        })
    }
}

struct ManualTimer {
    id: u64,
    clock: Arc<Mutex<Clock>>,
}

impl TimerHandle for ManualTimer {
    fn is_active(&self) -> bool {
        let clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        clock.pending.iter().any(|t| t.id == self.id)
    }

    fn cancel(&mut self) {
        let mut clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        clock.pending.retain(|t| t.id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, Task) {
        let hits = Arc::new(AtomicUsize::new(0));
        let task_hits = Arc::clone(&hits);
        let task: Task = Box::new(move || {
            task_hits.fetch_add(1, Ordering::SeqCst);
        });
        (hits, task)
    }

    #[test]
    fn test_manual_fires_when_due() {
        let scheduler = ManualScheduler::new();
        let (hits, task) = counter();
        let handle = scheduler.schedule(Duration::from_millis(3000), task);

        assert_eq!(scheduler.advance(Duration::from_millis(2999)), 0);
        assert!(handle.is_active());

        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!handle.is_active());
    }

    #[test]
    fn test_manual_cancel_is_idempotent() {
        let scheduler = ManualScheduler::new();
        let (hits, task) = counter();
        let mut handle = scheduler.schedule(Duration::from_millis(10), task);

        handle.cancel();
        handle.cancel();
        assert!(!handle.is_active());
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_manual_cancel_after_fire() {
        let scheduler = ManualScheduler::new();
        let (hits, task) = counter();
        let mut handle = scheduler.schedule(Duration::ZERO, task);

        scheduler.advance(Duration::ZERO);
        handle.cancel();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_manual_cancel_only_own_task() {
        let scheduler = ManualScheduler::new();
        let (first_hits, first) = counter();
        let (second_hits, second) = counter();
        let mut first_handle = scheduler.schedule(Duration::from_millis(5), first);
        let _second_handle = scheduler.schedule(Duration::from_millis(5), second);

        first_handle.cancel();
        scheduler.advance(Duration::from_millis(5));

        assert_eq!(first_hits.load(Ordering::SeqCst), 0);
        assert_eq!(second_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_fires_after_delay() {
        let scheduler = TokioScheduler::from_current().unwrap_or_else(|e| panic!("{e}"));
        let (hits, task) = counter();
        let handle = scheduler.schedule(Duration::from_millis(3000), task);

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(handle.is_active());

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_tokio_cancel_waits_for_running_task() {
        let scheduler = TokioScheduler::from_current().unwrap_or_else(|e| panic!("{e}"));
        let started = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let (task_started, task_finished) = (Arc::clone(&started), Arc::clone(&finished));
        let mut handle = scheduler.schedule(
            Duration::ZERO,
            Box::new(move || {
                task_started.store(true, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(100));
                task_finished.store(true, Ordering::SeqCst);
            }),
        );

        while !started.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        handle.cancel();

        assert!(finished.load(Ordering::SeqCst));
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_cancel() {
        let scheduler = TokioScheduler::from_current().unwrap_or_else(|e| panic!("{e}"));
        let (hits, task) = counter();
        let mut handle = scheduler.schedule(Duration::from_millis(100), task);

        handle.cancel();
        handle.cancel();
        assert!(!handle.is_active());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
