//! Repository for the `gemini_quota` table.
//!
//! Every write is a single upsert statement evaluated against the current
//! row, so concurrent instances never lose increments and a window reset
//! happens at most once per boundary.

use adforge_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::quota::GeminiQuota;

const COLUMNS: &str = "\
    id, minute_window_start, minute_count, day_window_start, day_count, \
    total_count, error_count, last_error, last_error_at, blocked_until, updated_at";

const QUOTA_ROW_ID: i32 = 1;

pub struct QuotaRepo;

impl QuotaRepo {
    /// Fetch the quota row, if it has been created.
    pub async fn get(pool: &PgPool) -> Result<Option<GeminiQuota>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gemini_quota WHERE id = $1");
        sqlx::query_as::<_, GeminiQuota>(&query)
            .bind(QUOTA_ROW_ID)
            .fetch_optional(pool)
            .await
    }

    /// Count one successful request.
    ///
    /// `minute_start` and `day_start` are the window boundaries containing
    /// the request. A counter resets only when its stored window is older;
    /// stored windows never move backwards.
    pub async fn record_success(
        pool: &PgPool,
        minute_start: Timestamp,
        day_start: Timestamp,
    ) -> Result<GeminiQuota, sqlx::Error> {
        let query = format!(
            "INSERT INTO gemini_quota \
                (id, minute_window_start, minute_count, day_window_start, day_count, total_count) \
             VALUES ($1, $2, 1, $3, 1, 1) \
             ON CONFLICT (id) DO UPDATE SET \
                minute_count = CASE WHEN gemini_quota.minute_window_start < $2 \
                    THEN 1 ELSE gemini_quota.minute_count + 1 END, \
                minute_window_start = GREATEST(gemini_quota.minute_window_start, $2), \
                day_count = CASE WHEN gemini_quota.day_window_start < $3 \
                    THEN 1 ELSE gemini_quota.day_count + 1 END, \
                day_window_start = GREATEST(gemini_quota.day_window_start, $3), \
                total_count = gemini_quota.total_count + 1, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeminiQuota>(&query)
            .bind(QUOTA_ROW_ID)
            .bind(minute_start)
            .bind(day_start)
            .fetch_one(pool)
            .await
    }

    /// Record a failed request. `blocked_until` only ever extends an
    /// existing block.
    pub async fn record_error(
        pool: &PgPool,
        message: &str,
        at: Timestamp,
        blocked_until: Option<Timestamp>,
    ) -> Result<GeminiQuota, sqlx::Error> {
        let query = format!(
            "INSERT INTO gemini_quota (id, error_count, last_error, last_error_at, blocked_until) \
             VALUES ($1, 1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                error_count = gemini_quota.error_count + 1, \
                last_error = $2, \
                last_error_at = $3, \
                blocked_until = GREATEST(gemini_quota.blocked_until, $4), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeminiQuota>(&query)
            .bind(QUOTA_ROW_ID)
            .bind(message)
            .bind(at)
            .bind(blocked_until)
            .fetch_one(pool)
            .await
    }
}
