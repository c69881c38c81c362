use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::ProposalService;
use crate::auth::session::current_actor;
use crate::errors::AppError;
use crate::lifecycle::{ProgressAttachments, ProgressInput};

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    #[serde(flatten)]
    pub fields: ProgressInput,
    #[serde(flatten)]
    pub attachments: ProgressAttachments,
}

/// POST /api/v1/proposals/{id}/progress
/// Appends a progress entry. Only the appointed engineer or an admin may do this.
pub async fn add(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<ProgressRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = current_actor(&session)?;
    let proposal_id = path.into_inner();

    let proposal = engine.get(proposal_id).await?;
    if !actor.can_record_progress(&proposal) {
        return Err(AppError::PermissionDenied(
            "progress may only be recorded by the appointed engineer or an administrator".to_string(),
        ));
    }

    let ProgressRequest { fields, attachments } = body.into_inner();
    let entry = engine.add_progress(proposal_id, fields, attachments, &actor).await?;

    log::info!("proposal.progress_added: proposal {proposal_id} entry {} by user {}", entry.id, actor.user_id);
    let details = serde_json::json!({
        "entry_id": entry.id,
        "released": entry.total_amount_released_so_far,
        "progress_percent": entry.progress_percent,
        "summary": format!("Progress recorded: {}", entry.description),
    });
    let _ = crate::audit::log(&pool, actor.user_id, "proposal.progress_added", "work_proposal", proposal_id, details).await;
    Ok(HttpResponse::Created().json(entry))
}

/// DELETE /api/v1/proposals/{id}/progress/{entry_id}
pub async fn delete(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(i64, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let actor = current_actor(&session)?;
    let (proposal_id, entry_id) = path.into_inner();

    let proposal = engine.get(proposal_id).await?;
    if !actor.can_record_progress(&proposal) {
        return Err(AppError::PermissionDenied(
            "progress may only be removed by the appointed engineer or an administrator".to_string(),
        ));
    }

    let proposal = engine.delete_progress(proposal_id, entry_id).await?;

    log::info!("proposal.progress_deleted: proposal {proposal_id} entry {entry_id} by user {}", actor.user_id);
    let details = serde_json::json!({ "entry_id": entry_id, "summary": "Progress entry removed" });
    let _ = crate::audit::log(&pool, actor.user_id, "proposal.progress_deleted", "work_proposal", proposal_id, details).await;
    Ok(HttpResponse::Ok().json(proposal))
}
