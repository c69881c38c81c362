use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use super::{ProposalService, record_action};
use crate::auth::session::{current_actor, require_workflow_manager};
use crate::errors::AppError;
use crate::lifecycle::{NewProposal, ProposalPatch};

/// POST /api/v1/proposals
/// Submits a new work proposal in `Pending Technical Approval`.
pub async fn create(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<NewProposal>,
) -> Result<HttpResponse, AppError> {
    let actor = current_actor(&session)?;
    let proposal = engine.create(body.into_inner(), &actor).await?;

    let summary = format!("Submitted work proposal '{}'", proposal.work_name);
    record_action(&pool, &actor, "proposal.created", &proposal, summary).await;
    Ok(HttpResponse::Created().json(proposal))
}

/// GET /api/v1/proposals/{id}
pub async fn read(
    engine: web::Data<ProposalService>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    current_actor(&session)?;
    let proposal = engine.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(proposal))
}

/// PUT /api/v1/proposals/{id}
/// Partial update of descriptive fields. Admins may also override `current_status`.
pub async fn update(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<ProposalPatch>,
) -> Result<HttpResponse, AppError> {
    let actor = current_actor(&session)?;
    let fields = body.into_inner();
    let status_override = fields.current_status;
    let proposal = engine.update(path.into_inner(), fields, &actor).await?;

    let summary = match status_override {
        Some(status) => format!("Updated proposal details; status overridden to '{status}'"),
        None => "Updated proposal details".to_string(),
    };
    record_action(&pool, &actor, "proposal.updated", &proposal, summary).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// DELETE /api/v1/proposals/{id}
pub async fn delete(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal_id = path.into_inner();
    engine.delete(proposal_id, &actor).await?;

    log::info!("proposal.deleted: proposal {proposal_id} by user {}", actor.user_id);
    let details = serde_json::json!({ "summary": format!("Deleted work proposal #{proposal_id}") });
    let _ = crate::audit::log(&pool, actor.user_id, "proposal.deleted", "work_proposal", proposal_id, details).await;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/proposals/{id}/audit
pub async fn audit_trail(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    current_actor(&session)?;
    let entries = crate::audit::find_for_target(&pool, "work_proposal", path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entries))
}
