//! CLI command handlers. Each command is in its own file.

mod batches;
mod countdown;
mod stream;
mod users;

pub use batches::run_batches;
pub use countdown::run_countdown;
pub use stream::run_stream;
pub use users::run_users;

use lms_core::validity::CountdownState;

/// Label for a countdown cell; `-` while inputs are missing.
pub(crate) fn validity_label(state: Option<CountdownState>) -> String {
    state
        .map(|s| s.remaining_label)
        .unwrap_or_else(|| "-".to_string())
}
