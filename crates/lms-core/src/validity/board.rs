//! One independent countdown per row of a list or tree view.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;

use super::clock::Clock;
use super::countdown::CountdownState;
use super::grant::ValidityGrant;
use super::live::ValidityClock;
use super::scheduler::TickScheduler;
use crate::tree::NodeKey;

/// Countdown clocks keyed by row identity.
///
/// Each row owns its own timer, so removing a row cancels exactly that timer
/// and re-rendering the list never leaves stale timers behind.
pub struct CountdownBoard {
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn TickScheduler>,
    rows: BTreeMap<NodeKey, ValidityClock>,
}

impl CountdownBoard {
    pub fn new(clock: Arc<dyn Clock>, scheduler: Arc<dyn TickScheduler>) -> Self {
        Self {
            clock,
            scheduler,
            rows: BTreeMap::new(),
        }
    }

    /// Mount a row, or hand new inputs to an already mounted one.
    pub fn mount_row(&mut self, key: NodeKey, grant: ValidityGrant) {
        match self.rows.get_mut(&key) {
            Some(existing) => existing.set_grant(grant),
            None => {
                let clock = ValidityClock::mount(
                    grant,
                    Arc::clone(&self.clock),
                    Arc::clone(&self.scheduler),
                );
                self.rows.insert(key, clock);
            }
        }
    }

    /// Unmount a row; false if it was not mounted.
    pub fn unmount_row(&mut self, key: &NodeKey) -> bool {
        match self.rows.remove(key) {
            Some(clock) => {
                clock.unmount();
                true
            }
            None => false,
        }
    }

    /// Reconcile with a freshly rendered set of rows: rows that disappeared are
    /// unmounted, changed rows are updated in place and new rows are mounted.
    pub fn sync<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (NodeKey, ValidityGrant)>,
    {
        let incoming: BTreeMap<NodeKey, ValidityGrant> = rows.into_iter().collect();
        let gone: Vec<NodeKey> = self
            .rows
            .keys()
            .filter(|k| !incoming.contains_key(*k))
            .cloned()
            .collect();
        for key in &gone {
            self.unmount_row(key);
        }
        for (key, grant) in incoming {
            self.mount_row(key, grant);
        }
        tracing::trace!(rows = self.rows.len(), removed = gone.len(), "countdown board synced");
    }

    pub fn state(&self, key: &NodeKey) -> Option<CountdownState> {
        self.rows.get(key).and_then(ValidityClock::state)
    }

    pub fn subscribe(&self, key: &NodeKey) -> Option<watch::Receiver<Option<CountdownState>>> {
        self.rows.get(key).map(ValidityClock::subscribe)
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose clock currently has a live timer.
    pub fn ticking(&self) -> usize {
        self.rows.values().filter(|c| c.is_ticking()).count()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validity::clock::ManualClock;
    use crate::validity::scheduler::ManualScheduler;
    use crate::validity::TICK_PERIOD;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap()
    }

    fn board() -> (CountdownBoard, Arc<ManualScheduler>) {
        let clock = ManualClock::new(now());
        let sched = Arc::new(ManualScheduler::new(clock.clone()));
        let board =
            CountdownBoard::new(Arc::new(clock), Arc::clone(&sched) as Arc<dyn TickScheduler>);
        (board, sched)
    }

    fn rows(users: &[(&str, f64)]) -> Vec<(NodeKey, ValidityGrant)> {
        users
            .iter()
            .map(|(name, days)| (NodeKey::user("b1", *name), ValidityGrant::at(now(), *days)))
            .collect()
    }

    #[test]
    fn repeated_rerenders_do_not_accumulate_timers() {
        let (mut board, sched) = board();
        let list = rows(&[("alice", 3.0), ("bob", 5.0), ("carol", 1.0)]);
        for _ in 0..10 {
            board.sync(list.clone());
        }
        assert_eq!(board.len(), 3);
        assert_eq!(sched.active_timers(), 3);
        assert_eq!(sched.scheduled_count(), 3);

        sched.advance(TICK_PERIOD);
        assert_eq!(sched.fired_count(), 3);
    }

    #[test]
    fn removed_rows_cancel_only_their_timer() {
        let (mut board, sched) = board();
        board.sync(rows(&[("alice", 3.0), ("bob", 5.0)]));
        board.sync(rows(&[("bob", 5.0)]));
        assert_eq!(sched.active_timers(), 1);
        assert_eq!(sched.cancelled_count(), 1);
        assert!(!board.contains(&NodeKey::user("b1", "alice")));

        sched.advance(TICK_PERIOD);
        let bob = board.state(&NodeKey::user("b1", "bob")).unwrap();
        assert_eq!(bob.remaining_label, "4d 23h 59m 59s");
    }

    #[test]
    fn changed_grant_is_updated_in_place() {
        let (mut board, sched) = board();
        board.sync(rows(&[("alice", 3.0)]));
        board.sync(rows(&[("alice", 30.0)]));
        assert_eq!(board.len(), 1);
        assert_eq!(sched.active_timers(), 1);
        assert_eq!(
            board.state(&NodeKey::user("b1", "alice")).unwrap().remaining_label,
            "30d 0h 0m 0s"
        );
    }

    #[test]
    fn rows_tick_independently() {
        let (mut board, sched) = board();
        board.mount_row(NodeKey::batch("b1"), ValidityGrant::at(now() - TimeDelta::days(8), 7.0));
        board.mount_row(NodeKey::batch("b2"), ValidityGrant::at(now(), 7.0));
        sched.advance(TICK_PERIOD);
        assert!(board.state(&NodeKey::batch("b1")).unwrap().is_expired);
        assert!(!board.state(&NodeKey::batch("b2")).unwrap().is_expired);
        assert!(board.unmount_row(&NodeKey::batch("b1")));
        assert!(!board.unmount_row(&NodeKey::batch("b1")));
        assert_eq!(board.ticking(), 1);
    }

    #[test]
    fn clear_cancels_everything() {
        let (mut board, sched) = board();
        board.sync(rows(&[("alice", 3.0), ("bob", 5.0)]));
        board.clear();
        assert!(board.is_empty());
        assert_eq!(sched.active_timers(), 0);
    }
}
