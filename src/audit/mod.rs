use serde_json::Value;
use sqlx::PgPool;

use crate::errors::AppError;

/// Record a lifecycle action in `audit_log`.
pub async fn log(
    pool: &PgPool,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO audit_log (user_id, action, target_type, target_id, details) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details)
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: Value,
    pub created_at: String,
}

/// Audit entries for one target, newest first.
pub async fn find_for_target(
    pool: &PgPool,
    target_type: &str,
    target_id: i64,
) -> Result<Vec<AuditEntry>, AppError> {
    let entries = sqlx::query_as::<_, AuditEntry>(
        "SELECT id, user_id, action, target_type, target_id, details, created_at::TEXT AS created_at \
         FROM audit_log WHERE target_type = $1 AND target_id = $2 ORDER BY id DESC",
    )
    .bind(target_type)
    .bind(target_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}
