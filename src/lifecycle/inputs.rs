//! Typed payloads accepted by the lifecycle operations.
//!
//! Create-style inputs keep required fields as `Option` so a missing field is
//! reported as a `Validation` error naming it rather than a decode failure.
//! Patch inputs follow partial-update semantics: `None` leaves the stored
//! value untouched.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::proposal::{BlobRef, Installment, ProposalStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProposal {
    pub work_name: Option<String>,
    pub description: Option<String>,
    pub financial_year: Option<String>,
    pub city_id: Option<i64>,
    pub ward_id: Option<i64>,
    pub type_of_location_id: Option<i64>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub department_id: Option<i64>,
    pub approving_department_id: Option<i64>,
    pub scheme_id: Option<i64>,
    pub work_agency_id: Option<i64>,
    pub type_of_work_id: Option<i64>,
    pub appointed_engineer_id: Option<i64>,
    pub appointed_sdo_id: Option<i64>,
    pub sanction_amount: Option<f64>,
    pub estimated_completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_dpr: bool,
    #[serde(default)]
    pub is_tender: bool,
}

/// Descriptive fields editable through the generic update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalPatch {
    pub work_name: Option<String>,
    pub description: Option<String>,
    pub financial_year: Option<String>,
    pub city_id: Option<i64>,
    pub ward_id: Option<i64>,
    pub type_of_location_id: Option<i64>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub department_id: Option<i64>,
    pub approving_department_id: Option<i64>,
    pub scheme_id: Option<i64>,
    pub work_agency_id: Option<i64>,
    pub type_of_work_id: Option<i64>,
    pub appointed_engineer_id: Option<i64>,
    pub appointed_sdo_id: Option<i64>,
    pub sanction_amount: Option<f64>,
    pub estimated_completion_date: Option<NaiveDate>,
    pub is_dpr: Option<bool>,
    pub is_tender: Option<bool>,
    /// Administrative override that bypasses the transition rules.
    pub current_status: Option<ProposalStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechnicalApprovalInput {
    pub approval_number: Option<String>,
    pub sanctioned_amount: Option<f64>,
    pub remarks: Option<String>,
    pub rejection_reason: Option<String>,
    pub file: Option<BlobRef>,
    #[serde(default)]
    pub images: Vec<BlobRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechnicalApprovalPatch {
    pub approval_number: Option<String>,
    pub approval_date: Option<chrono::DateTime<chrono::Utc>>,
    pub forwarding_date: Option<chrono::DateTime<chrono::Utc>>,
    pub sanctioned_amount: Option<f64>,
    pub remarks: Option<String>,
    pub rejection_reason: Option<String>,
    pub file: Option<BlobRef>,
    pub images: Option<Vec<BlobRef>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdministrativeApprovalInput {
    pub approval_number: Option<String>,
    pub sanction_reference: Option<String>,
    pub approved_amount: Option<f64>,
    pub remarks: Option<String>,
    pub rejection_reason: Option<String>,
    pub file: Option<BlobRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdministrativeApprovalPatch {
    pub approval_number: Option<String>,
    pub sanction_reference: Option<String>,
    pub approval_date: Option<chrono::DateTime<chrono::Utc>>,
    pub approved_amount: Option<f64>,
    pub remarks: Option<String>,
    pub rejection_reason: Option<String>,
    pub file: Option<BlobRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenderInput {
    pub title: Option<String>,
    pub tender_id: Option<String>,
    pub department_id: Option<i64>,
    pub file: Option<BlobRef>,
    pub issued_date: Option<NaiveDate>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenderPatch {
    pub title: Option<String>,
    pub tender_id: Option<String>,
    pub department_id: Option<i64>,
    pub file: Option<BlobRef>,
    pub issued_date: Option<NaiveDate>,
    pub remark: Option<String>,
    /// Display name of a `TenderStatus`, e.g. "Under Evaluation".
    pub tender_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwardInput {
    pub contractor_name: Option<String>,
    pub contact_info: Option<String>,
    pub awarded_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderInput {
    pub work_order_number: Option<String>,
    pub date_of_work_order: Option<NaiveDate>,
    pub contractor_or_gram_panchayat: Option<String>,
    pub remark: Option<String>,
    pub file: Option<BlobRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderPatch {
    pub work_order_number: Option<String>,
    pub date_of_work_order: Option<NaiveDate>,
    pub contractor_or_gram_panchayat: Option<String>,
    pub remark: Option<String>,
    pub file: Option<BlobRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressInput {
    pub description: Option<String>,
    /// Defaults to the proposal's sanction amount.
    pub sanctioned_amount: Option<f64>,
    #[serde(default)]
    pub installments: Vec<Installment>,
    pub mb_stage: Option<String>,
    pub expenditure_amount: Option<f64>,
    pub progress_percent: Option<f64>,
}

/// Attachments already uploaded to the blob store for a progress entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressAttachments {
    #[serde(default)]
    pub documents: Vec<BlobRef>,
    #[serde(default)]
    pub images: Vec<BlobRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CompletionOutcome {
    #[serde(rename = "Work Completed")]
    Completed,
    #[serde(rename = "Work Cancelled")]
    Cancelled,
    #[serde(rename = "Work Stopped")]
    Stopped,
    #[serde(rename = "Work Not Started")]
    NotStarted,
}

impl CompletionOutcome {
    pub fn status(&self) -> ProposalStatus {
        match self {
            CompletionOutcome::Completed => ProposalStatus::WorkCompleted,
            CompletionOutcome::Cancelled => ProposalStatus::WorkCancelled,
            CompletionOutcome::Stopped => ProposalStatus::WorkStopped,
            CompletionOutcome::NotStarted => ProposalStatus::WorkNotStarted,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionInput {
    pub outcome: CompletionOutcome,
    pub completion_date: Option<NaiveDate>,
    pub final_cost: Option<f64>,
    #[serde(default)]
    pub documents: Vec<BlobRef>,
}
