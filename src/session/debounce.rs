//! Keystroke debouncing for the search field
//!
//! Typing reschedules a single pending evaluation; Enter evaluates at once.
//! Nothing here owns a thread or a runtime timer: the event loop asks
//! [`QueryDebouncer::time_until_ready`] how long it may block and calls
//! [`QueryDebouncer::poll`] when it wakes up.

use std::time::{Duration, Instant};

/// Delay between the last keystroke and the evaluation
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Deadline used when a delay does not fit in an `Instant`
const MAX_DELAY: Duration = Duration::from_secs(365 * 24 * 3600);

/// A cancellable one-shot schedule holding at most one payload.
///
/// Scheduling again replaces the pending payload and its deadline.
#[derive(Debug)]
pub struct Timer<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for Timer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Timer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `payload` once `delay` has elapsed after `now`.
    /// Returns the payload that was pending before, if any.
    /// A delay too large for an `Instant` is shortened to a year.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> Option<T> {
        let deadline = now
            .checked_add(delay)
            .or_else(|| now.checked_add(MAX_DELAY))
            .unwrap_or(now);
        self.pending
            .replace((deadline, payload))
            .map(|(_, previous)| previous)
    }

    /// Drop the pending payload without firing it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the payload if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((deadline, _)) if now >= deadline => self.cancel(),
            _ => None,
        }
    }

    /// Time left before the payload fires (None if nothing is scheduled)
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(deadline, _)| deadline.saturating_duration_since(now))
    }
}

/// Debouncer for the search field
#[derive(Debug)]
pub struct QueryDebouncer {
    delay: Duration,
    timer: Timer<String>,
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl QueryDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timer: Timer::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// A key was released in the search field
    pub fn on_keyup(&mut self, value: &str, now: Instant) {
        self.timer.schedule(now, self.delay, value.to_string());
    }

    /// Enter was pressed: cancel the pending evaluation and return the
    /// query to evaluate right away.
    ///
    /// The key is consumed; callers must not give it any other meaning.
    pub fn on_confirm(&mut self, value: &str) -> String {
        self.timer.cancel();
        value.to_string()
    }

    /// Query to evaluate, if the debounce window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        self.timer.take_due(now)
    }

    pub fn has_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.timer.time_until_due(now)
    }

    /// Forget the pending evaluation
    pub fn clear(&mut self) {
        self.timer.cancel();
    }
}
