//! Remaining-time decomposition and labels.

use std::fmt;

use chrono::{DateTime, Utc};

use super::grant::ValidityGrant;

pub const EXPIRED_LABEL: &str = "Expired";

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Remaining time split into display components.
///
/// `hours` is total hours modulo 24, not hours since the grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    /// Floor-decompose milliseconds; negative input clamps to zero.
    pub fn from_millis(millis: i64) -> Self {
        let total = (millis / 1000).max(0);
        Self {
            days: total / SECS_PER_DAY,
            hours: (total / SECS_PER_HOUR) % 24,
            minutes: (total / SECS_PER_MINUTE) % 60,
            seconds: total % 60,
        }
    }

    pub fn total_millis(&self) -> i64 {
        (self.days * SECS_PER_DAY
            + self.hours * SECS_PER_HOUR
            + self.minutes * SECS_PER_MINUTE
            + self.seconds)
            * 1000
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// What a countdown display shows at one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining_label: String,
    pub is_expired: bool,
}

impl CountdownState {
    pub fn expired() -> Self {
        Self {
            remaining_label: EXPIRED_LABEL.to_string(),
            is_expired: true,
        }
    }

    pub fn remaining(remaining: Remaining) -> Self {
        Self {
            remaining_label: remaining.to_string(),
            is_expired: false,
        }
    }
}

/// Countdown to `expires_at` as seen at `now`.
pub fn countdown_at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> CountdownState {
    let millis = expires_at.signed_duration_since(now).num_milliseconds();
    if millis <= 0 {
        return CountdownState::expired();
    }
    CountdownState::remaining(Remaining::from_millis(millis))
}

/// Countdown for a grant at `now`.
///
/// `None` while the grant is incomplete. A grant that cannot be evaluated
/// (bad timestamp, negative days) shows as expired instead of failing.
pub fn compute_countdown(grant: &ValidityGrant, now: DateTime<Utc>) -> Option<CountdownState> {
    match grant.expires_at() {
        Ok(None) => None,
        Ok(Some(expires_at)) => Some(countdown_at(expires_at, now)),
        Err(err) => {
            tracing::trace!(error = %err, "grant not evaluable, showing as expired");
            Some(CountdownState::expired())
        }
    }
}
