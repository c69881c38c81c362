use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use super::store::{ProposalStore, format_serial};
use super::types::WorkProposal;
use crate::errors::AppError;
use crate::models::reference::ReferenceKind;

/// Postgres-backed proposal store. Each aggregate is one row in
/// `work_proposals`, with the full document in a JSONB column and the fields
/// that need indexes (`current_status`, `work_order_number`) mirrored into
/// their own columns.
#[derive(Clone)]
pub struct PgProposalStore {
    pool: PgPool,
}

impl PgProposalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    serial_number: String,
    version: i64,
    document: Json<WorkProposal>,
}

impl Row {
    fn into_proposal(self) -> WorkProposal {
        let mut proposal = self.document.0;
        proposal.id = self.id;
        proposal.serial_number = self.serial_number;
        proposal.version = self.version;
        proposal
    }
}

/// Map a unique-index violation on `work_order_number` to a conflict.
fn map_write_error(e: sqlx::Error, proposal: &WorkProposal) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let number = proposal.work_order_number().unwrap_or_default();
            log::warn!("Unique violation saving work proposal {}: {}", proposal.id, db.message());
            return AppError::Conflict(format!("work order number '{number}' already in use"));
        }
    }
    AppError::Db(e)
}

async fn exists(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM work_proposals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

#[async_trait]
impl ProposalStore for PgProposalStore {
    async fn insert(&self, mut proposal: WorkProposal) -> Result<WorkProposal, AppError> {
        let (id,): (i64,) =
            sqlx::query_as("SELECT nextval(pg_get_serial_sequence('work_proposals', 'id'))")
                .fetch_one(&self.pool)
                .await?;

        proposal.id = id;
        proposal.serial_number = format_serial(id);
        proposal.version = 1;

        sqlx::query(
            "INSERT INTO work_proposals \
                 (id, serial_number, current_status, work_order_number, version, document) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(proposal.id)
        .bind(&proposal.serial_number)
        .bind(proposal.current_status.as_str())
        .bind(proposal.work_order_number())
        .bind(proposal.version)
        .bind(Json(&proposal))
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &proposal))?;

        log::debug!("Inserted work proposal {} ({})", proposal.id, proposal.serial_number);
        Ok(proposal)
    }

    async fn load(&self, id: i64) -> Result<Option<WorkProposal>, AppError> {
        let row = sqlx::query_as::<_, Row>(
            "SELECT id, serial_number, version, document FROM work_proposals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Row::into_proposal))
    }

    async fn save(&self, proposal: &WorkProposal) -> Result<WorkProposal, AppError> {
        let mut saved = proposal.clone();
        saved.version = proposal.version + 1;

        let result = sqlx::query(
            "UPDATE work_proposals \
             SET current_status = $1, work_order_number = $2, document = $3, \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $4 AND version = $5",
        )
        .bind(saved.current_status.as_str())
        .bind(saved.work_order_number())
        .bind(Json(&saved))
        .bind(proposal.id)
        .bind(proposal.version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, proposal))?;

        if result.rows_affected() == 0 {
            if exists(&self.pool, proposal.id).await? {
                log::warn!(
                    "Stale write on work proposal {} at version {}",
                    proposal.id,
                    proposal.version
                );
                return Err(AppError::StaleWrite { id: proposal.id });
            }
            return Err(AppError::NotFound);
        }

        log::debug!("Saved work proposal {} at version {}", saved.id, saved.version);
        Ok(saved)
    }

    async fn delete(&self, id: i64, version: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM work_proposals WHERE id = $1 AND version = $2")
            .bind(id)
            .bind(version)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            if exists(&self.pool, id).await? {
                return Err(AppError::StaleWrite { id });
            }
            return Err(AppError::NotFound);
        }

        log::debug!("Deleted work proposal {id}");
        Ok(())
    }

    async fn work_order_number_in_use(
        &self,
        number: &str,
        excluding: Option<i64>,
    ) -> Result<bool, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM work_proposals \
             WHERE work_order_number = $1 AND ($2::BIGINT IS NULL OR id <> $2)",
        )
        .bind(number)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn count_references(&self, kind: ReferenceKind, id: i64) -> Result<i64, AppError> {
        // Each path is a comma-joined JSON path, e.g. "location,city_id".
        let paths: Vec<String> = kind.proposal_paths().iter().map(|p| p.join(",")).collect();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM work_proposals \
             WHERE EXISTS ( \
                 SELECT 1 FROM unnest($1::TEXT[]) AS p(path) \
                 WHERE document #>> string_to_array(p.path, ',') = $2)",
        )
        .bind(paths)
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
