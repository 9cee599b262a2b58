//! The shared Gemini quota row.

use adforge_core::quota::QuotaState;
use adforge_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// Row of `gemini_quota`. There is exactly one, with `id = 1`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GeminiQuota {
    pub id: i32,
    pub minute_window_start: Timestamp,
    pub minute_count: i32,
    pub day_window_start: Timestamp,
    pub day_count: i32,
    pub total_count: i64,
    pub error_count: i64,
    pub last_error: Option<String>,
    pub last_error_at: Option<Timestamp>,
    pub blocked_until: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl From<GeminiQuota> for QuotaState {
    fn from(row: GeminiQuota) -> Self {
        // CHECK constraints keep counters non-negative; clamp regardless.
        Self {
            minute_window_start: row.minute_window_start,
            minute_count: u32::try_from(row.minute_count).unwrap_or(0),
            day_window_start: row.day_window_start,
            day_count: u32::try_from(row.day_count).unwrap_or(0),
            total_count: u64::try_from(row.total_count).unwrap_or(0),
            error_count: u64::try_from(row.error_count).unwrap_or(0),
            last_error: row.last_error,
            last_error_at: row.last_error_at,
            blocked_until: row.blocked_until,
        }
    }
}
