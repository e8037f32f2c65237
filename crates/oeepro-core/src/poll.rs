//! Repeat-until polling driven by the host's clock.
//!
//! `PollTask` owns no timer. The host asks whether a poll is due, performs
//! the request itself and reports the outcome back. Once a task reaches a
//! terminal state it never asks for another poll, so a host that drops its
//! timer on the terminal state cannot leak one.

use std::time::Duration;

use tracing::debug;

use crate::auth::AccountStatus;

/// Default interval for the account-approval waiting screen.
pub const APPROVAL_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Lifecycle of a poll task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState<T> {
    /// Still polling.
    Active,
    /// The predicate accepted this value.
    Satisfied(T),
    /// Stopped by the host.
    Cancelled,
    /// The attempt limit was reached without satisfying the predicate.
    Exhausted,
}

impl<T> PollState<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Active)
    }
}

type Predicate<T> = Box<dyn Fn(&T) -> bool>;

/// Polls until a value satisfies a predicate, the task is cancelled, or
/// the attempt limit runs out.
pub struct PollTask<T> {
    interval: Duration,
    max_attempts: Option<u32>,
    attempts: u32,
    next_due: Duration,
    predicate: Predicate<T>,
    state: PollState<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for PollTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollTask")
            .field("interval", &self.interval)
            .field("max_attempts", &self.max_attempts)
            .field("attempts", &self.attempts)
            .field("state", &self.state)
            .finish()
    }
}

impl<T> PollTask<T> {
    /// A task whose first poll is due immediately.
    pub fn new<F>(interval: Duration, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Self {
            interval,
            max_attempts: None,
            attempts: 0,
            next_due: Duration::ZERO,
            predicate: Box::new(predicate),
            state: PollState::Active,
        }
    }

    /// Give up after `max` completed attempts.
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.set_max_attempts(max);
        self
    }

    /// Change the attempt limit of a running task. Attempts already made
    /// count toward it, so a limit at or below them exhausts the task. No
    /// effect once the task is terminal.
    pub fn set_max_attempts(&mut self, max: u32) -> &PollState<T> {
        if self.is_active() {
            self.max_attempts = Some(max);
            if self.attempts >= max {
                debug!(attempts = self.attempts, "poll exhausted");
                self.state = PollState::Exhausted;
            }
        }
        &self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> &PollState<T> {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_terminal()
    }

    /// Whether the host should issue a request at `now`.
    pub fn is_due(&self, now: Duration) -> bool {
        self.is_active() && now >= self.next_due
    }

    /// Time left until the next poll, `None` once terminal.
    pub fn time_until_due(&self, now: Duration) -> Option<Duration> {
        self.is_active().then(|| self.next_due.saturating_sub(now))
    }

    /// Report a successful response received at `now`.
    pub fn observe(&mut self, now: Duration, value: T) -> &PollState<T> {
        if !self.is_active() {
            return &self.state;
        }
        self.attempts += 1;
        if (self.predicate)(&value) {
            debug!(attempts = self.attempts, "poll satisfied");
            self.state = PollState::Satisfied(value);
        } else {
            self.schedule_next(now);
        }
        &self.state
    }

    /// Report a failed request at `now`. Counts as an attempt.
    pub fn miss(&mut self, now: Duration) -> &PollState<T> {
        if self.is_active() {
            self.attempts += 1;
            self.schedule_next(now);
        }
        &self.state
    }

    fn schedule_next(&mut self, now: Duration) {
        if self.max_attempts.is_some_and(|max| self.attempts >= max) {
            debug!(attempts = self.attempts, "poll exhausted");
            self.state = PollState::Exhausted;
        } else {
            self.next_due = now + self.interval;
        }
    }

    /// Stop polling. No effect on a task that already finished.
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!(attempts = self.attempts, "poll cancelled");
            self.state = PollState::Cancelled;
        }
    }
}

/// Poll an account's review status until an admin decides it.
pub fn approval_task(interval: Duration) -> PollTask<AccountStatus> {
    PollTask::new(interval, |status: &AccountStatus| status.is_decided())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_first_poll_immediate() {
        let task = approval_task(secs(5));
        assert!(task.is_due(Duration::ZERO));
        assert_eq!(task.time_until_due(Duration::ZERO), Some(Duration::ZERO));
    }

    #[test]
    fn test_approval_observed() {
        let mut task = approval_task(secs(5));

        task.observe(secs(0), AccountStatus::Pending);
        assert!(!task.is_due(secs(4)));
        assert!(task.is_due(secs(5)));
        assert_eq!(task.time_until_due(secs(2)), Some(secs(3)));

        let state = task.observe(secs(5), AccountStatus::Approved);
        assert_eq!(state, &PollState::Satisfied(AccountStatus::Approved));
        assert!(!task.is_due(secs(100)));
        assert_eq!(task.time_until_due(secs(100)), None);
        assert_eq!(task.attempts(), 2);
    }

    #[test]
    fn test_rejection_is_terminal() {
        let mut task = approval_task(APPROVAL_POLL_INTERVAL);
        task.observe(secs(0), AccountStatus::Rejected);
        assert_eq!(task.state(), &PollState::Satisfied(AccountStatus::Rejected));
    }

    #[test]
    fn test_cancel() {
        let mut task = approval_task(secs(5));
        task.observe(secs(0), AccountStatus::Pending);
        task.cancel();

        assert_eq!(task.state(), &PollState::Cancelled);
        assert!(!task.is_due(secs(10)));

        // Late responses after teardown are ignored
        task.observe(secs(10), AccountStatus::Approved);
        assert_eq!(task.state(), &PollState::Cancelled);
        assert_eq!(task.attempts(), 1);
    }

    #[test]
    fn test_cancel_after_satisfied() {
        let mut task = approval_task(secs(5));
        task.observe(secs(0), AccountStatus::Approved);
        task.cancel();
        assert_eq!(task.state(), &PollState::Satisfied(AccountStatus::Approved));
    }

    #[test]
    fn test_exhausted() {
        let mut task = PollTask::new(secs(1), |v: &u32| *v > 10).with_max_attempts(3);

        task.observe(secs(0), 1);
        task.miss(secs(1));
        assert!(task.is_active());
        task.observe(secs(2), 5);

        assert_eq!(task.state(), &PollState::Exhausted);
        assert_eq!(task.attempts(), 3);
        assert!(!task.is_due(secs(3)));
    }

    #[test]
    fn test_satisfied_on_last_attempt() {
        let mut task = PollTask::new(secs(1), |v: &u32| *v > 10).with_max_attempts(1);
        task.observe(secs(0), 11);
        assert_eq!(task.state(), &PollState::Satisfied(11));
    }

    #[test]
    fn test_set_max_attempts_keeps_progress() {
        let mut task = approval_task(secs(5));
        task.observe(secs(0), AccountStatus::Pending);
        task.miss(secs(5));

        assert_eq!(task.set_max_attempts(4), &PollState::Active);
        assert_eq!(task.attempts(), 2);
        assert!(task.is_due(secs(10)));

        task.miss(secs(10));
        task.observe(secs(15), AccountStatus::Pending);
        assert_eq!(task.state(), &PollState::Exhausted);
    }

    #[test]
    fn test_set_max_attempts_below_progress_exhausts() {
        let mut task = approval_task(secs(5));
        task.miss(secs(0));
        task.miss(secs(5));

        assert_eq!(task.set_max_attempts(2), &PollState::Exhausted);
        assert_eq!(task.attempts(), 2);
    }

    #[test]
    fn test_set_max_attempts_ignored_when_terminal() {
        let mut task = approval_task(secs(5));
        task.cancel();
        assert_eq!(task.set_max_attempts(3), &PollState::Cancelled);

        let mut task = approval_task(secs(5));
        task.observe(secs(0), AccountStatus::Approved);
        task.set_max_attempts(10);
        assert_eq!(task.state(), &PollState::Satisfied(AccountStatus::Approved));
        assert_eq!(task.attempts(), 1);
    }

    #[test]
    fn test_miss_reschedules() {
        let mut task = approval_task(secs(5));
        task.miss(secs(0));
        assert!(task.is_active());
        assert!(task.is_due(secs(5)));
    }
}
