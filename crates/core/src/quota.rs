//! Gemini request quota windows.
//!
//! Two fixed windows are tracked: the current UTC minute and the current
//! UTC day. A counter is reset the first time a request lands in a newer
//! window than the one it was counting; windows only ever move forward, so
//! out-of-order timestamps cannot resurrect or double-reset a counter.

use chrono::{DurationRound, TimeDelta};
use serde::Serialize;

use crate::types::Timestamp;

/// How long requests are refused after the upstream reports rate limiting.
pub const RATE_LIMIT_BACKOFF_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaLimits {
    pub per_minute: u32,
    pub per_day: u32,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            per_minute: 10,
            per_day: 500,
        }
    }
}

/// Start of the UTC minute containing `now`.
pub fn minute_start(now: Timestamp) -> Timestamp {
    now.duration_trunc(TimeDelta::minutes(1)).unwrap_or(now)
}

/// Start of the UTC day containing `now`.
pub fn day_start(now: Timestamp) -> Timestamp {
    now.duration_trunc(TimeDelta::days(1)).unwrap_or(now)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaState {
    pub minute_window_start: Timestamp,
    pub minute_count: u32,
    pub day_window_start: Timestamp,
    pub day_count: u32,
    pub total_count: u64,
    pub error_count: u64,
    pub last_error: Option<String>,
    pub last_error_at: Option<Timestamp>,
    pub blocked_until: Option<Timestamp>,
}

impl Default for QuotaState {
    fn default() -> Self {
        Self {
            minute_window_start: Timestamp::default(),
            minute_count: 0,
            day_window_start: Timestamp::default(),
            day_count: 0,
            total_count: 0,
            error_count: 0,
            last_error: None,
            last_error_at: None,
            blocked_until: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaWindow {
    Minute,
    Day,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuotaDecision {
    Allowed,
    Exhausted {
        window: QuotaWindow,
        retry_at: Timestamp,
    },
}

impl QuotaState {
    /// Reset counters whose window lies before the window containing `now`.
    pub fn roll_forward(&mut self, now: Timestamp) {
        let minute = minute_start(now);
        if minute > self.minute_window_start {
            self.minute_window_start = minute;
            self.minute_count = 0;
        }
        let day = day_start(now);
        if day > self.day_window_start {
            self.day_window_start = day;
            self.day_count = 0;
        }
    }

    pub fn record_success(&mut self, now: Timestamp) {
        self.roll_forward(now);
        self.minute_count = self.minute_count.saturating_add(1);
        self.day_count = self.day_count.saturating_add(1);
        self.total_count = self.total_count.saturating_add(1);
    }

    pub fn record_error(
        &mut self,
        now: Timestamp,
        message: impl Into<String>,
        blocked_until: Option<Timestamp>,
    ) {
        self.error_count = self.error_count.saturating_add(1);
        self.last_error = Some(message.into());
        self.last_error_at = Some(now);
        if let Some(until) = blocked_until {
            self.blocked_until = Some(self.blocked_until.map_or(until, |b| b.max(until)));
        }
    }

    /// Whether one more request may be sent at `now`.
    pub fn check(&self, limits: &QuotaLimits, now: Timestamp) -> QuotaDecision {
        if let Some(until) = self.blocked_until.filter(|until| *until > now) {
            return QuotaDecision::Exhausted {
                window: QuotaWindow::Blocked,
                retry_at: until,
            };
        }

        let mut current = self.clone();
        current.roll_forward(now);

        if current.day_count >= limits.per_day {
            return QuotaDecision::Exhausted {
                window: QuotaWindow::Day,
                retry_at: current.day_window_start + TimeDelta::days(1),
            };
        }
        if current.minute_count >= limits.per_minute {
            return QuotaDecision::Exhausted {
                window: QuotaWindow::Minute,
                retry_at: current.minute_window_start + TimeDelta::minutes(1),
            };
        }
        QuotaDecision::Allowed
    }
}
