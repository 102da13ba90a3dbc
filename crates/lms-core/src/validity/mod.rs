//! Validity countdowns for course, batch and user-course grants.
//!
//! A grant is `(granted_at, validity_days)` as sent by the backend; expiry is
//! derived, never stored. [`compute_countdown`] is the pure computation,
//! [`ValidityClock`] re-evaluates it once per second for one displayed row, and
//! [`CountdownBoard`] keeps one independent clock per row of a list view.

mod board;
mod clock;
mod countdown;
mod grant;
mod live;
mod scheduler;

pub use board::CountdownBoard;
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{compute_countdown, countdown_at, CountdownState, Remaining, EXPIRED_LABEL};
pub use grant::{parse_timestamp, ValidityError, ValidityGrant};
pub use live::{ValidityClock, TICK_PERIOD};
pub use scheduler::{ManualScheduler, TickFn, TickScheduler, TimerId, TokioScheduler};
