//! `lms countdown` – show or follow the remaining validity of a grant.

use anyhow::Result;
use lms_core::config::LmsConfig;
use lms_core::validity::{
    compute_countdown, Clock, SystemClock, TokioScheduler, ValidityClock, ValidityGrant,
};
use std::sync::Arc;

use super::validity_label;

pub async fn run_countdown(
    cfg: &LmsConfig,
    granted_at: &str,
    validity_days: f64,
    ticks: u32,
) -> Result<()> {
    let grant = ValidityGrant::new(granted_at, validity_days);
    if let Err(err) = grant.expires_at() {
        tracing::warn!("grant cannot be evaluated, treating as expired: {}", err);
    }

    if ticks == 0 {
        println!("{}", validity_label(compute_countdown(&grant, SystemClock.now())));
        return Ok(());
    }

    let scheduler = Arc::new(TokioScheduler::new()?);
    let clock = ValidityClock::mount_with_period(
        grant,
        Arc::new(SystemClock),
        scheduler,
        cfg.tick_period(),
    );
    let mut updates = clock.subscribe();
    for _ in 0..ticks {
        tokio::select! {
            changed = updates.changed() => {
                changed?;
                let state = updates.borrow_and_update().clone();
                let expired = state.as_ref().is_some_and(|s| s.is_expired);
                println!("{}", validity_label(state));
                if expired {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    clock.unmount();
    Ok(())
}
