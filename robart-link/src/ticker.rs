//! Cooperative fixed-period task scheduling.
//!
//! A [`PeriodicTask`] holds a callback and a period; calling
//! [`PeriodicTask::tick`] from the main loop invokes the callback once per
//! elapsed period, catching up with multiple invocations after a long gap.
//! Time is integer microseconds throughout and the clock is injected: the
//! caller passes `now` explicitly, which keeps the scheduler testable and
//! free of process-wide state.

use log::warn;
use std::time::Duration;

/// Callback invoked per elapsed period with the time since the previous
/// tick and the number of completed invocations.
pub type TaskCallback = Box<dyn FnMut(Duration, u64) + Send>;

/// A fixed-period cooperative task.
pub struct PeriodicTask {
    callback: Option<TaskCallback>,
    period_micros: i64,
    accumulator_micros: i64,
    last_time_micros: i64,
    count: u64,
}

impl PeriodicTask {
    /// Create a task that fires `callback` once per `period`, starting
    /// from `now_micros`.
    pub fn new(
        period: Duration,
        now_micros: i64,
        callback: impl FnMut(Duration, u64) + Send + 'static,
    ) -> Self {
        let period_micros = period.as_micros() as i64;
        debug_assert!(period_micros > 0);
        Self {
            callback: Some(Box::new(callback)),
            period_micros,
            accumulator_micros: 0,
            last_time_micros: now_micros,
            count: 0,
        }
    }

    /// Create a task with no callback; ticking it does nothing.
    pub fn idle(now_micros: i64) -> Self {
        Self {
            callback: None,
            period_micros: 0,
            accumulator_micros: 0,
            last_time_micros: now_micros,
            count: 0,
        }
    }

    /// Number of completed invocations
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Advance the task clock to `now_micros`, invoking the callback once
    /// per period that has elapsed since the last invocation.
    pub fn tick(&mut self, now_micros: i64) {
        let callback = match self.callback.as_mut() {
            Some(callback) => callback,
            // Without a callback the drain loop below would never
            // terminate with a zero period
            None => return,
        };

        self.accumulator_micros += now_micros - self.last_time_micros;
        self.last_time_micros = now_micros;

        // Every invocation of this tick reports the same delta: the time
        // accumulated since the previous tick call
        let delta_since_last_tick =
            Duration::from_micros(self.accumulator_micros.max(0) as u64);

        if self.accumulator_micros >= 2 * self.period_micros {
            warn!(
                "Task overrun: {:?} accumulated (period: {:?})",
                delta_since_last_tick,
                Duration::from_micros(self.period_micros as u64)
            );
        }

        while self.accumulator_micros >= self.period_micros {
            callback(delta_since_last_tick, self.count);
            self.accumulator_micros -= self.period_micros;
            self.count += 1;
        }
    }
}
