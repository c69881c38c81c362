use sqlx::PgPool;

use super::guard::ensure_unreferenced;
use super::types::*;
use crate::errors::AppError;
use crate::models::proposal::ProposalStore;

const SELECT_COLUMNS: &str =
    "SELECT id, kind, name, parent_id, is_active, created_at::TEXT AS created_at FROM reference_items";

/// List all rows of one kind, ordered by name.
pub async fn find_by_kind(pool: &PgPool, kind: ReferenceKind) -> Result<Vec<ReferenceItem>, AppError> {
    let sql = format!("{SELECT_COLUMNS} WHERE kind = $1 ORDER BY LOWER(name), id");
    let items = sqlx::query_as::<_, ReferenceItem>(&sql)
        .bind(kind.as_str())
        .fetch_all(pool)
        .await?;
    Ok(items)
}

/// Find a single row of the given kind.
pub async fn find_by_id(
    pool: &PgPool,
    kind: ReferenceKind,
    id: i64,
) -> Result<Option<ReferenceItem>, AppError> {
    let sql = format!("{SELECT_COLUMNS} WHERE kind = $1 AND id = $2");
    let item = sqlx::query_as::<_, ReferenceItem>(&sql)
        .bind(kind.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

async fn name_taken(
    pool: &PgPool,
    kind: ReferenceKind,
    name: &str,
    excluding: Option<i64>,
) -> Result<bool, AppError> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM reference_items \
         WHERE kind = $1 AND LOWER(name) = LOWER($2) AND ($3::BIGINT IS NULL OR id <> $3)",
    )
    .bind(kind.as_str())
    .bind(name)
    .bind(excluding)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

fn validated_name(form: &ReferenceForm) -> Result<&str, AppError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(AppError::required("name"));
    }
    Ok(name)
}

fn duplicate(kind: ReferenceKind, name: &str) -> AppError {
    AppError::Conflict(format!("{kind} '{name}' already exists"))
}

/// A parent must be an existing row of the kind's parent kind (a ward's parent is a city).
async fn check_parent(
    pool: &PgPool,
    kind: ReferenceKind,
    parent_id: Option<i64>,
    own_id: Option<i64>,
) -> Result<(), AppError> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    let Some(parent_kind) = kind.parent_kind() else {
        return Err(AppError::validation("parent_id", format!("{kind} rows have no parent")));
    };
    if own_id == Some(parent_id) {
        return Err(AppError::validation("parent_id", "a row cannot be its own parent"));
    }
    if find_by_id(pool, parent_kind, parent_id).await?.is_none() {
        return Err(AppError::validation(
            "parent_id",
            format!("no {parent_kind} with id {parent_id}"),
        ));
    }
    Ok(())
}

/// Create a row. Names are unique per kind, case-insensitively.
pub async fn create(pool: &PgPool, kind: ReferenceKind, form: &ReferenceForm) -> Result<ReferenceItem, AppError> {
    let name = validated_name(form)?;
    if name_taken(pool, kind, name, None).await? {
        return Err(duplicate(kind, name));
    }
    check_parent(pool, kind, form.parent_id, None).await?;

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO reference_items (kind, name, parent_id, is_active) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(kind.as_str())
    .bind(name)
    .bind(form.parent_id)
    .bind(form.is_active.unwrap_or(true))
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => duplicate(kind, name),
        _ => AppError::Db(e),
    })?;

    find_by_id(pool, kind, id).await?.ok_or(AppError::NotFound)
}

/// Replace a row's name and parent. An absent `parent_id` clears the parent;
/// an absent `is_active` keeps the current flag.
pub async fn update(
    pool: &PgPool,
    kind: ReferenceKind,
    id: i64,
    form: &ReferenceForm,
) -> Result<ReferenceItem, AppError> {
    let existing = find_by_id(pool, kind, id).await?.ok_or(AppError::NotFound)?;
    let name = validated_name(form)?;
    if name_taken(pool, kind, name, Some(id)).await? {
        return Err(duplicate(kind, name));
    }
    check_parent(pool, kind, form.parent_id, Some(id)).await?;

    sqlx::query(
        "UPDATE reference_items SET name = $1, parent_id = $2, is_active = $3, updated_at = NOW() \
         WHERE id = $4",
    )
    .bind(name)
    .bind(form.parent_id)
    .bind(form.is_active.unwrap_or(existing.is_active))
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, kind, id).await?.ok_or(AppError::NotFound)
}

/// Delete a row, refusing while any work proposal or child row still references it.
pub async fn delete<S: ProposalStore + ?Sized>(
    pool: &PgPool,
    store: &S,
    kind: ReferenceKind,
    id: i64,
) -> Result<(), AppError> {
    find_by_id(pool, kind, id).await?.ok_or(AppError::NotFound)?;
    ensure_unreferenced(store, kind, id).await?;

    sqlx::query("DELETE FROM reference_items WHERE kind = $1 AND id = $2")
        .bind(kind.as_str())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::Conflict(format!("{kind} {id} still has child rows"))
            }
            _ => AppError::Db(e),
        })?;
    Ok(())
}
