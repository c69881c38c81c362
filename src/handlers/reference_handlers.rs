use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::session::{current_actor, require_workflow_manager};
use crate::errors::AppError;
use crate::handlers::proposal_handlers::ProposalService;
use crate::models::reference::{self, ReferenceForm, ReferenceKind};

/// GET /api/v1/references/{kind}
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    current_actor(&session)?;
    let kind: ReferenceKind = path.parse()?;
    let items = reference::find_by_kind(&pool, kind).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/v1/references/{kind}
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<ReferenceForm>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let kind: ReferenceKind = path.parse()?;
    let item = reference::create(&pool, kind, &body).await?;

    log::info!("reference.created: {kind} {} '{}' by user {}", item.id, item.name, actor.user_id);
    let details = serde_json::json!({ "kind": kind, "name": item.name });
    let _ = crate::audit::log(&pool, actor.user_id, "reference.created", kind.as_str(), item.id, details).await;
    Ok(HttpResponse::Created().json(item))
}

/// PUT /api/v1/references/{kind}/{id}
pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(String, i64)>,
    body: web::Json<ReferenceForm>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let (kind, id) = path.into_inner();
    let kind: ReferenceKind = kind.parse()?;
    let item = reference::update(&pool, kind, id, &body).await?;

    let details = serde_json::json!({ "kind": kind, "name": item.name });
    let _ = crate::audit::log(&pool, actor.user_id, "reference.updated", kind.as_str(), id, details).await;
    Ok(HttpResponse::Ok().json(item))
}

/// DELETE /api/v1/references/{kind}/{id}
/// Refused with 409 while any work proposal references the row.
pub async fn delete(
    pool: web::Data<PgPool>,
    engine: web::Data<ProposalService>,
    session: Session,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let (kind, id) = path.into_inner();
    let kind: ReferenceKind = kind.parse()?;
    reference::delete(&pool, engine.store(), kind, id).await?;

    log::info!("reference.deleted: {kind} {id} by user {}", actor.user_id);
    let details = serde_json::json!({ "kind": kind });
    let _ = crate::audit::log(&pool, actor.user_id, "reference.deleted", kind.as_str(), id, details).await;
    Ok(HttpResponse::NoContent().finish())
}
