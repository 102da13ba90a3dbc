use std::time::Duration;

/// Additional attempts after the first one when no config overrides it.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

const BACKOFF_MULTIPLIER: u32 = 2;

/// High-level classification of a failed API call.
///
/// The retry loop does not look at this; it is for logging and for choosing
/// the message shown to the user once retries are exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Server answered with a 5xx status.
    ServerFault(u16),
    /// Server answered with a 4xx status.
    Client(u16),
    /// No response was received (connect, DNS, timeout, reset).
    Network,
    /// Anything else (bad payload, unexpected status, local failure).
    Other,
}

impl ErrorKind {
    pub fn is_server_fault(self) -> bool {
        matches!(self, ErrorKind::ServerFault(_))
    }
}

/// Exponential backoff with a fixed doubling factor and no cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the second attempt; each later delay doubles.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_retries(DEFAULT_MAX_RETRIES, DEFAULT_BASE_DELAY)
    }
}

impl RetryPolicy {
    /// Policy allowing `retries` extra attempts after the original call.
    pub fn with_retries(retries: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            base_delay,
        }
    }

    /// Single attempt, failures surface immediately.
    pub fn no_retry() -> Self {
        Self::with_retries(0, DEFAULT_BASE_DELAY)
    }

    /// Effective attempt budget (at least one).
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay inserted before `attempt` (1-based): `base * 2^(attempt - 2)`.
    ///
    /// Returns `None` for the first attempt and for attempts past the budget.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt < 2 || attempt > self.attempts() {
            return None;
        }
        let exp = (attempt - 2).min(31);
        Some(
            self.base_delay
                .saturating_mul(BACKOFF_MULTIPLIER.saturating_pow(exp)),
        )
    }
}

/// Per-invocation retry state.
///
/// `Attempting(k)` is 1-based. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting(u32),
    Succeeded,
    Failed,
}

impl RetryState {
    pub fn start() -> Self {
        RetryState::Attempting(1)
    }

    /// Transition after the current attempt finished.
    pub fn next(self, policy: &RetryPolicy, succeeded: bool) -> Self {
        match self {
            RetryState::Attempting(_) if succeeded => RetryState::Succeeded,
            RetryState::Attempting(k) if k < policy.attempts() => RetryState::Attempting(k + 1),
            RetryState::Attempting(_) => RetryState::Failed,
            terminal => terminal,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, RetryState::Attempting(_))
    }
}
