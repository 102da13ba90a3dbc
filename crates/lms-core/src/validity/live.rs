//! Live, self-ticking countdown for one displayed grant.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::clock::Clock;
use super::countdown::{compute_countdown, CountdownState};
use super::grant::ValidityGrant;
use super::scheduler::{TickScheduler, TimerId};

/// Countdowns refresh once per second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A countdown display bound to one grant.
///
/// The state starts as `None` and is filled on the first tick. At most one
/// timer is live per clock: it is cancelled before any replacement is
/// scheduled, and on unmount or drop.
pub struct ValidityClock {
    grant: ValidityGrant,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn TickScheduler>,
    period: Duration,
    timer: Option<TimerId>,
    state: Arc<watch::Sender<Option<CountdownState>>>,
}

impl ValidityClock {
    pub fn mount(
        grant: ValidityGrant,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Self {
        Self::mount_with_period(grant, clock, scheduler, TICK_PERIOD)
    }

    pub fn mount_with_period(
        grant: ValidityGrant,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn TickScheduler>,
        period: Duration,
    ) -> Self {
        let (tx, _) = watch::channel(None);
        let mut this = Self {
            grant,
            clock,
            scheduler,
            period,
            timer: None,
            state: Arc::new(tx),
        };
        this.start();
        this
    }

    /// Swap in new inputs from the parent view.
    ///
    /// Unchanged inputs keep the running timer. Otherwise the old timer is
    /// cancelled, the state is recomputed right away, and a new timer starts
    /// only if both inputs are defined.
    pub fn set_grant(&mut self, grant: ValidityGrant) {
        if grant == self.grant {
            return;
        }
        self.stop();
        self.grant = grant;
        self.state
            .send_replace(compute_countdown(&self.grant, self.clock.now()));
        self.start();
    }

    /// Stop ticking. Same as dropping the clock.
    pub fn unmount(mut self) {
        self.stop();
    }

    pub fn grant(&self) -> &ValidityGrant {
        &self.grant
    }

    /// Latest computed state (`None` before the first tick or while inputs are missing).
    pub fn state(&self) -> Option<CountdownState> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every tick.
    pub fn subscribe(&self) -> watch::Receiver<Option<CountdownState>> {
        self.state.subscribe()
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.is_some()
    }

    fn start(&mut self) {
        if self.timer.is_some() || !self.grant.is_defined() {
            return;
        }
        let grant = self.grant.clone();
        let clock = Arc::clone(&self.clock);
        let state = Arc::clone(&self.state);
        let id = self.scheduler.schedule_repeating(
            self.period,
            Box::new(move || {
                state.send_replace(compute_countdown(&grant, clock.now()));
            }),
        );
        self.timer = Some(id);
    }

    fn stop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl Drop for ValidityClock {
    fn drop(&mut self) {
        self.stop();
    }
}
