//! Repeating-timer abstraction used by countdown displays.
//!
//! [`TokioScheduler`] runs each timer as its own tokio task; [`ManualScheduler`]
//! fires timers only when `advance` is called, so tests can step time.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::clock::ManualClock;

/// Callback run on every tick.
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Timer handle returned by [`TickScheduler::schedule_repeating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

const MIN_PERIOD: Duration = Duration::from_millis(1);

pub trait TickScheduler: Send + Sync {
    /// Run `tick` every `period`, first firing one period from now.
    fn schedule_repeating(&self, period: Duration, tick: TickFn) -> TimerId;

    /// Stop a timer. Returns false if it was unknown or already cancelled.
    /// A tick must not cancel its own timer.
    fn cancel(&self, id: TimerId) -> bool;
}

struct TokioTimer {
    task: JoinHandle<()>,
    // Held across each tick. On a multi-thread runtime `abort` alone can race
    // a tick already past its await point.
    cancelled: Arc<Mutex<bool>>,
}

impl TokioTimer {
    /// Once this returns no tick is running and none will start.
    fn stop(self) {
        *self.cancelled.lock().unwrap() = true;
        self.task.abort();
    }
}

/// One spawned interval task per timer; cancellation aborts the task.
pub struct TokioScheduler {
    handle: Handle,
    next_id: AtomicU64,
    tasks: Mutex<HashMap<TimerId, TokioTimer>>,
}

impl TokioScheduler {
    /// Scheduler bound to the runtime of the calling context.
    pub fn new() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::with_handle)
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            next_id: AtomicU64::new(1),
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Number of timers not yet cancelled.
    pub fn active(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule_repeating(&self, period: Duration, mut tick: TickFn) -> TimerId {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let period = period.max(MIN_PERIOD);
        let start = Instant::now() + period;
        let cancelled = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&cancelled);
        let task = self.handle.spawn(async move {
            let mut interval = time::interval_at(start, period);
            // A starved runtime jumps forward rather than bursting missed ticks.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let stopped = flag.lock().unwrap();
                if *stopped {
                    break;
                }
                tick();
            }
        });
        self.tasks
            .lock()
            .unwrap()
            .insert(id, TokioTimer { task, cancelled });
        tracing::trace!(timer = id.0, period_ms = period.as_millis() as u64, "timer scheduled");
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let timer = self.tasks.lock().unwrap().remove(&id);
        match timer {
            Some(timer) => {
                timer.stop();
                tracing::trace!(timer = id.0, "timer cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        if let Ok(tasks) = self.tasks.get_mut() {
            for (_, timer) in tasks.drain() {
                timer.stop();
            }
        }
    }
}

struct ManualTimer {
    period: Duration,
    next_due: Duration,
    // Taken out while the callback runs so the lock is not held across it.
    tick: Option<TickFn>,
}

#[derive(Default)]
struct ManualInner {
    elapsed: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, ManualTimer>,
    scheduled: usize,
    cancelled: usize,
    fired: usize,
}

/// Deterministic scheduler for tests and replays. Advancing it also advances
/// the paired [`ManualClock`], tick by tick.
pub struct ManualScheduler {
    clock: ManualClock,
    inner: Mutex<ManualInner>,
}

impl ManualScheduler {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            inner: Mutex::new(ManualInner::default()),
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Move time forward by `by`, firing every timer that comes due, in due order.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.lock().unwrap().elapsed + by;
        loop {
            let due = {
                let mut inner = self.inner.lock().unwrap();
                let next = inner
                    .timers
                    .iter()
                    .filter(|(_, t)| t.next_due <= target && t.tick.is_some())
                    .min_by_key(|(id, t)| (t.next_due, **id))
                    .map(|(id, t)| (*id, t.next_due));
                let Some((id, at)) = next else {
                    break;
                };
                let step = at.saturating_sub(inner.elapsed);
                inner.elapsed = at;
                self.clock.advance(step);
                inner.fired += 1;
                let timer = inner.timers.get_mut(&id).map(|t| {
                    t.next_due += t.period;
                    t.tick.take()
                });
                timer.flatten().map(|tick| (id, tick))
            };
            let Some((id, mut tick)) = due else {
                continue;
            };
            tick();
            if let Some(timer) = self.inner.lock().unwrap().timers.get_mut(&id) {
                timer.tick = Some(tick);
            }
        }
        let mut inner = self.inner.lock().unwrap();
        let step = target.saturating_sub(inner.elapsed);
        inner.elapsed = target;
        self.clock.advance(step);
    }

    pub fn active_timers(&self) -> usize {
        self.inner.lock().unwrap().timers.len()
    }

    pub fn scheduled_count(&self) -> usize {
        self.inner.lock().unwrap().scheduled
    }

    pub fn cancelled_count(&self) -> usize {
        self.inner.lock().unwrap().cancelled
    }

    /// Total tick callbacks run so far.
    pub fn fired_count(&self) -> usize {
        self.inner.lock().unwrap().fired
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, tick: TickFn) -> TimerId {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = TimerId(inner.next_id);
        let period = period.max(MIN_PERIOD);
        let next_due = inner.elapsed + period;
        inner.timers.insert(
            id,
            ManualTimer {
                period,
                next_due,
                tick: Some(tick),
            },
        );
        inner.scheduled += 1;
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.timers.remove(&id).is_some() {
            inner.cancelled += 1;
            true
        } else {
            false
        }
    }
}
