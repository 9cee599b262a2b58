use adforge_core::quota::{day_start, minute_start, QuotaState};
use adforge_db::repositories::QuotaRepo;
use chrono::{TimeDelta, TimeZone, Utc};
use sqlx::PgPool;

fn at(h: u32, m: u32, s: u32) -> adforge_core::types::Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 14, h, m, s).unwrap()
}

async fn success(pool: &PgPool, now: adforge_core::types::Timestamp) -> QuotaState {
    QuotaRepo::record_success(pool, minute_start(now), day_start(now))
        .await
        .unwrap()
        .into()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seeded_row_starts_empty(pool: PgPool) {
    adforge_db::health_check(&pool).await.unwrap();

    let row = QuotaRepo::get(&pool).await.unwrap().expect("seed row");
    assert_eq!(row.id, 1);
    assert_eq!(row.minute_count, 0);
    assert_eq!(row.total_count, 0);
    assert!(row.blocked_until.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn success_resets_minute_once(pool: PgPool) {
    success(&pool, at(10, 0, 1)).await;
    let state = success(&pool, at(10, 0, 40)).await;
    assert_eq!(state.minute_count, 2);

    let state = success(&pool, at(10, 1, 0)).await;
    assert_eq!(state.minute_count, 1);
    assert_eq!(state.day_count, 3);
    assert_eq!(state.total_count, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn late_request_counts_in_current_window(pool: PgPool) {
    success(&pool, at(10, 5, 0)).await;
    let state = success(&pool, at(10, 4, 59)).await;
    assert_eq!(state.minute_window_start, at(10, 5, 0));
    assert_eq!(state.minute_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_increments_are_not_lost(pool: PgPool) {
    let now = at(12, 0, 0);
    let mut handles = Vec::new();
    for _ in 0..16 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move { success(&pool, now).await }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let state: QuotaState = QuotaRepo::get(&pool).await.unwrap().unwrap().into();
    assert_eq!(state.minute_count, 16);
    assert_eq!(state.total_count, 16);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn day_rollover_resets_day_count(pool: PgPool) {
    success(&pool, at(23, 59, 0)).await;
    let state = success(&pool, at(0, 0, 5) + TimeDelta::days(1)).await;
    assert_eq!(state.day_count, 1);
    assert_eq!(state.total_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn block_only_extends(pool: PgPool) {
    QuotaRepo::record_error(&pool, "429", at(8, 0, 0), Some(at(8, 5, 0)))
        .await
        .unwrap();
    let row = QuotaRepo::record_error(&pool, "500", at(8, 0, 1), Some(at(8, 1, 0)))
        .await
        .unwrap();
    assert_eq!(row.blocked_until, Some(at(8, 5, 0)));
    assert_eq!(row.error_count, 2);
    assert_eq!(row.last_error.as_deref(), Some("500"));

    let row = QuotaRepo::record_error(&pool, "timeout", at(8, 0, 2), None)
        .await
        .unwrap();
    assert_eq!(row.blocked_until, Some(at(8, 5, 0)));
}
