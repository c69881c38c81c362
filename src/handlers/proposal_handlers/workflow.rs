use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use super::{ProposalService, record_action};
use crate::auth::session::require_workflow_manager;
use crate::errors::AppError;
use crate::lifecycle::*;

/// Approve/reject body: `{"action": "approve", ...payload fields}`.
#[derive(Debug, Deserialize)]
pub struct ApprovalRequest<T> {
    pub action: ApprovalAction,
    #[serde(flatten)]
    pub payload: T,
}

fn verb(action: ApprovalAction) -> &'static str {
    match action {
        ApprovalAction::Approve => "approved",
        ApprovalAction::Reject => "rejected",
    }
}

/// POST /api/v1/proposals/{id}/technical-approval
pub async fn technical_approval(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<ApprovalRequest<TechnicalApprovalInput>>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let ApprovalRequest { action, payload } = body.into_inner();
    let proposal = engine.technical_approval(path.into_inner(), action, payload, &actor).await?;

    let action_code = format!("proposal.technical_approval_{}", verb(action));
    let summary = format!("Technical approval {}", verb(action));
    record_action(&pool, &actor, &action_code, &proposal, summary).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// PATCH /api/v1/proposals/{id}/technical-approval
pub async fn update_technical_approval(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<TechnicalApprovalPatch>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal = engine
        .update_technical_approval(path.into_inner(), body.into_inner(), &actor)
        .await?;

    record_action(&pool, &actor, "proposal.technical_approval_updated", &proposal, "Technical approval edited".to_string()).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// POST /api/v1/proposals/{id}/administrative-approval
pub async fn administrative_approval(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<ApprovalRequest<AdministrativeApprovalInput>>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let ApprovalRequest { action, payload } = body.into_inner();
    let proposal = engine
        .administrative_approval(path.into_inner(), action, payload, &actor)
        .await?;

    let action_code = format!("proposal.administrative_approval_{}", verb(action));
    let summary = format!("Administrative approval {}", verb(action));
    record_action(&pool, &actor, &action_code, &proposal, summary).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// PATCH /api/v1/proposals/{id}/administrative-approval
pub async fn update_administrative_approval(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<AdministrativeApprovalPatch>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal = engine
        .update_administrative_approval(path.into_inner(), body.into_inner(), &actor)
        .await?;

    record_action(&pool, &actor, "proposal.administrative_approval_updated", &proposal, "Administrative approval edited".to_string()).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// POST /api/v1/proposals/{id}/tender
pub async fn start_tender(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<TenderInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal = engine
        .start_tender_process(path.into_inner(), body.into_inner(), &actor)
        .await?;

    let tender_id = proposal.tender_process.as_ref().map(|t| t.tender_id.clone()).unwrap_or_default();
    record_action(&pool, &actor, "proposal.tender_started", &proposal, format!("Tender {tender_id} notice published")).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// PATCH /api/v1/proposals/{id}/tender
pub async fn update_tender(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<TenderPatch>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal = engine
        .update_tender_process(path.into_inner(), body.into_inner(), &actor)
        .await?;

    record_action(&pool, &actor, "proposal.tender_updated", &proposal, "Tender process edited".to_string()).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// POST /api/v1/proposals/{id}/tender/award
pub async fn award_tender(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<AwardInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal = engine.award_tender(path.into_inner(), body.into_inner(), &actor).await?;

    record_action(&pool, &actor, "proposal.tender_awarded", &proposal, "Tender awarded".to_string()).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// POST /api/v1/proposals/{id}/work-order
pub async fn create_work_order(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<WorkOrderInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal = engine
        .create_work_order(path.into_inner(), body.into_inner(), &actor)
        .await?;

    let number = proposal.work_order_number().unwrap_or_default().to_string();
    record_action(&pool, &actor, "proposal.work_order_created", &proposal, format!("Work order {number} issued")).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// PATCH /api/v1/proposals/{id}/work-order
pub async fn update_work_order(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<WorkOrderPatch>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal = engine
        .update_work_order(path.into_inner(), body.into_inner(), &actor)
        .await?;

    record_action(&pool, &actor, "proposal.work_order_updated", &proposal, "Work order edited".to_string()).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// POST /api/v1/proposals/{id}/start-work
pub async fn start_work(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal = engine.start_work(path.into_inner()).await?;

    record_action(&pool, &actor, "proposal.work_started", &proposal, "Work started".to_string()).await;
    Ok(HttpResponse::Ok().json(proposal))
}

/// POST /api/v1/proposals/{id}/completion
pub async fn record_completion(
    engine: web::Data<ProposalService>,
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<CompletionInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_workflow_manager(&session)?;
    let proposal = engine
        .record_completion(path.into_inner(), body.into_inner(), &actor)
        .await?;

    let summary = format!("Work closed as '{}'", proposal.current_status);
    record_action(&pool, &actor, "proposal.completion_recorded", &proposal, summary).await;
    Ok(HttpResponse::Ok().json(proposal))
}
