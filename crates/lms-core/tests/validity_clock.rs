//! Integration tests: countdown clocks on the real tokio timer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use lms_core::tree::NodeKey;
use lms_core::validity::{
    CountdownBoard, SystemClock, TickScheduler, TokioScheduler, ValidityClock, ValidityGrant,
};

#[tokio::test]
async fn live_clock_publishes_ticks_and_stops_on_unmount() {
    let sched = Arc::new(TokioScheduler::new().unwrap());
    let grant = ValidityGrant::at(Utc::now() - TimeDelta::days(5), 7.0);
    let vc = ValidityClock::mount_with_period(
        grant,
        Arc::new(SystemClock),
        Arc::clone(&sched) as Arc<dyn TickScheduler>,
        Duration::from_millis(10),
    );
    let mut rx = vc.subscribe();
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("tick within timeout")
        .unwrap();
    let state = rx.borrow().clone().unwrap();
    assert!(!state.is_expired);
    let label = state.remaining_label.as_str();
    assert!(label.starts_with("1d 23h 59m") || label == "2d 0h 0m 0s");

    vc.unmount();
    assert_eq!(sched.active(), 0);
}

#[tokio::test]
async fn board_rerenders_keep_one_timer_per_row() {
    let sched = Arc::new(TokioScheduler::new().unwrap());
    let mut board = CountdownBoard::new(
        Arc::new(SystemClock),
        Arc::clone(&sched) as Arc<dyn TickScheduler>,
    );
    let now = Utc::now();
    let rows = vec![
        (NodeKey::batch("1"), ValidityGrant::at(now, 7.0)),
        (NodeKey::batch("2"), ValidityGrant::at(now - TimeDelta::days(30), 7.0)),
    ];
    for _ in 0..5 {
        board.sync(rows.clone());
    }
    assert_eq!(sched.active(), 2);

    board.sync(rows[..1].to_vec());
    assert_eq!(sched.active(), 1);
    drop(board);
    assert_eq!(sched.active(), 0);
}
