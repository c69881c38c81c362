//! Status rules and the pure mutations behind each lifecycle operation.
//!
//! Every function here works on an in-memory copy of the aggregate; the
//! engine persists the copy only when the function returns `Ok`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::inputs::*;
use crate::errors::AppError;
use crate::models::proposal::{
    AdministrativeApproval, ApprovalStatus, Location, ProgressEntry, ProposalStatus,
    SelectedContractor, TechnicalApproval, TenderProcess, TenderStatus, WorkOrder, WorkProposal,
};

use ProposalStatus::*;

/// Sub-records that are created by a transition and edited afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubRecord {
    TechnicalApproval,
    AdministrativeApproval,
    TenderProcess,
    WorkOrder,
}

/// Statuses from which an existing sub-record may be edited.
pub fn editable_statuses(record: SubRecord) -> &'static [ProposalStatus] {
    match record {
        SubRecord::TechnicalApproval => &[
            PendingTechnicalApproval,
            RejectedTechnicalApproval,
            PendingAdministrativeApproval,
            RejectedAdministrativeApproval,
            PendingTender,
            TenderInProgress,
            PendingWorkOrder,
            WorkOrderCreated,
            WorkInProgress,
            WorkCompleted,
            WorkCancelled,
            WorkStopped,
            WorkNotStarted,
        ],
        SubRecord::AdministrativeApproval => &[
            PendingAdministrativeApproval,
            RejectedAdministrativeApproval,
            PendingTender,
            TenderInProgress,
            PendingWorkOrder,
            WorkOrderCreated,
            WorkInProgress,
            WorkCompleted,
            WorkCancelled,
            WorkStopped,
            WorkNotStarted,
        ],
        SubRecord::TenderProcess => &ProposalStatus::ALL,
        SubRecord::WorkOrder => &[
            PendingWorkOrder,
            WorkOrderCreated,
            WorkInProgress,
            WorkCompleted,
            WorkCancelled,
            WorkStopped,
            WorkNotStarted,
        ],
    }
}

/// Statuses in which a proposal may be deleted.
pub const DELETABLE_STATUSES: [ProposalStatus; 6] = [
    PendingTechnicalApproval,
    PendingAdministrativeApproval,
    WorkCompleted,
    WorkCancelled,
    WorkStopped,
    WorkNotStarted,
];

const COMPLETABLE_STATUSES: [ProposalStatus; 2] = [WorkOrderCreated, WorkInProgress];

pub fn require_status(proposal: &WorkProposal, expected: &[ProposalStatus]) -> Result<(), AppError> {
    if expected.contains(&proposal.current_status) {
        Ok(())
    } else {
        Err(AppError::invalid_state(expected, proposal.current_status))
    }
}

/// Checks that `record` exists and the proposal is in one of its editable statuses.
pub fn require_editable(
    proposal: &WorkProposal,
    record: SubRecord,
    present: bool,
) -> Result<(), AppError> {
    let allowed = editable_statuses(record);
    if !present {
        return Err(AppError::invalid_state(allowed, proposal.current_status));
    }
    require_status(proposal, allowed)
}

/// Move both status fields together.
pub fn transition(proposal: &mut WorkProposal, to: ProposalStatus, now: DateTime<Utc>) {
    proposal.current_status = to;
    proposal.work_progress_stage = to;
    proposal.last_status_update = now;
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn require_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    non_blank(value).ok_or_else(|| AppError::required(field))
}

fn require<T>(field: &str, value: Option<T>) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::required(field))
}

fn require_amount(field: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AppError::validation(field, format!("{field} must be a non-negative amount")))
    }
}

fn check_amount(field: &str, value: Option<f64>) -> Result<Option<f64>, AppError> {
    value.map(|v| require_amount(field, v)).transpose()
}

/// A provided text field may not be blanked out by a patch.
fn patch_text(field: &str, slot: &mut String, value: Option<String>) -> Result<(), AppError> {
    if let Some(v) = value {
        *slot = require_text(field, Some(v))?;
    }
    Ok(())
}

fn patch<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn patch_opt<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

pub fn new_proposal(
    input: NewProposal,
    submitted_by: i64,
    now: DateTime<Utc>,
) -> Result<WorkProposal, AppError> {
    let work_name = require_text("work_name", input.work_name)?;
    let financial_year = require_text("financial_year", input.financial_year)?;
    let location = Location {
        city_id: require("city_id", input.city_id)?,
        ward_id: require("ward_id", input.ward_id)?,
        type_of_location_id: require("type_of_location_id", input.type_of_location_id)?,
        address: non_blank(input.address),
        latitude: input.latitude,
        longitude: input.longitude,
    };
    let department_id = require("department_id", input.department_id)?;
    let scheme_id = require("scheme_id", input.scheme_id)?;
    let work_agency_id = require("work_agency_id", input.work_agency_id)?;
    let type_of_work_id = require("type_of_work_id", input.type_of_work_id)?;
    let sanction_amount =
        require_amount("sanction_amount", require("sanction_amount", input.sanction_amount)?)?;

    Ok(WorkProposal {
        id: 0,
        serial_number: String::new(),
        version: 0,
        work_name,
        description: non_blank(input.description),
        financial_year,
        location,
        department_id,
        approving_department_id: input.approving_department_id,
        scheme_id,
        work_agency_id,
        type_of_work_id,
        appointed_engineer_id: input.appointed_engineer_id,
        appointed_sdo_id: input.appointed_sdo_id,
        sanction_amount,
        estimated_completion_date: input.estimated_completion_date,
        is_dpr: input.is_dpr,
        is_tender: input.is_tender,
        current_status: PendingTechnicalApproval,
        work_progress_stage: PendingTechnicalApproval,
        last_status_update: now,
        last_revision: None,
        submitted_by,
        submission_date: now,
        technical_approval: None,
        administrative_approval: None,
        tender_process: None,
        work_order: None,
        work_progress: Vec::new(),
        completion_date: None,
        completion_documents: Vec::new(),
        final_cost: None,
    })
}

pub fn technical_approval(
    proposal: &mut WorkProposal,
    action: ApprovalAction,
    input: TechnicalApprovalInput,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    require_status(proposal, &[PendingTechnicalApproval])?;
    let sanctioned_amount = check_amount("sanctioned_amount", input.sanctioned_amount)?;

    let (record, next) = match action {
        ApprovalAction::Approve => {
            let number = require_text("approval_number", input.approval_number)?;
            let record = TechnicalApproval {
                status: ApprovalStatus::Approved,
                approval_number: Some(number),
                approval_date: Some(now),
                forwarding_date: Some(now),
                sanctioned_amount,
                remarks: non_blank(input.remarks),
                file: input.file,
                images: input.images,
                approved_by: actor_id,
                rejection_reason: None,
                last_modified: None,
                modified_by: None,
            };
            (record, PendingAdministrativeApproval)
        }
        ApprovalAction::Reject => {
            let reason = non_blank(input.rejection_reason)
                .or_else(|| non_blank(input.remarks.clone()))
                .ok_or_else(|| AppError::required("rejection_reason"))?;
            let record = TechnicalApproval {
                status: ApprovalStatus::Rejected,
                approval_number: non_blank(input.approval_number),
                approval_date: None,
                forwarding_date: None,
                sanctioned_amount,
                remarks: non_blank(input.remarks),
                file: input.file,
                images: input.images,
                approved_by: actor_id,
                rejection_reason: Some(reason),
                last_modified: None,
                modified_by: None,
            };
            (record, RejectedTechnicalApproval)
        }
    };

    proposal.technical_approval = Some(record);
    transition(proposal, next, now);
    Ok(())
}

/// Approved records keep an approval number; rejected ones keep a reason.
fn check_approval_record(
    status: ApprovalStatus,
    approval_number: &Option<String>,
    rejection_reason: &Option<String>,
) -> Result<(), AppError> {
    let blank = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").is_empty();
    match status {
        ApprovalStatus::Approved if blank(approval_number) => {
            Err(AppError::validation("approval_number", "an approved record requires an approval number"))
        }
        ApprovalStatus::Rejected if blank(rejection_reason) => {
            Err(AppError::validation("rejection_reason", "a rejected record requires a rejection reason"))
        }
        _ => Ok(()),
    }
}

pub fn update_technical_approval(
    proposal: &mut WorkProposal,
    fields: TechnicalApprovalPatch,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    require_editable(proposal, SubRecord::TechnicalApproval, proposal.technical_approval.is_some())?;
    let sanctioned_amount = check_amount("sanctioned_amount", fields.sanctioned_amount)?;
    let Some(record) = proposal.technical_approval.as_mut() else {
        return Err(AppError::NotFound);
    };

    patch_opt(&mut record.approval_number, fields.approval_number);
    patch_opt(&mut record.approval_date, fields.approval_date);
    patch_opt(&mut record.forwarding_date, fields.forwarding_date);
    patch_opt(&mut record.sanctioned_amount, sanctioned_amount);
    patch_opt(&mut record.remarks, fields.remarks);
    patch_opt(&mut record.rejection_reason, fields.rejection_reason);
    patch_opt(&mut record.file, fields.file);
    patch(&mut record.images, fields.images);
    check_approval_record(record.status, &record.approval_number, &record.rejection_reason)?;

    record.last_modified = Some(now);
    record.modified_by = Some(actor_id);
    Ok(())
}

pub fn administrative_approval(
    proposal: &mut WorkProposal,
    action: ApprovalAction,
    input: AdministrativeApprovalInput,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    require_status(proposal, &[PendingAdministrativeApproval])?;
    let approved_amount = check_amount("approved_amount", input.approved_amount)?;

    let (record, next) = match action {
        ApprovalAction::Approve => {
            let number = require_text("approval_number", input.approval_number)?;
            let record = AdministrativeApproval {
                status: ApprovalStatus::Approved,
                sanction_reference: non_blank(input.sanction_reference),
                approval_number: Some(number),
                approval_date: Some(now),
                approved_amount,
                remarks: non_blank(input.remarks),
                file: input.file,
                approved_by: actor_id,
                rejection_reason: None,
                last_modified: None,
                modified_by: None,
            };
            let next = if proposal.is_tender { PendingTender } else { PendingWorkOrder };
            (record, next)
        }
        ApprovalAction::Reject => {
            let reason = non_blank(input.rejection_reason)
                .or_else(|| non_blank(input.remarks.clone()))
                .ok_or_else(|| AppError::required("rejection_reason"))?;
            let record = AdministrativeApproval {
                status: ApprovalStatus::Rejected,
                sanction_reference: non_blank(input.sanction_reference),
                approval_number: non_blank(input.approval_number),
                approval_date: None,
                approved_amount,
                remarks: non_blank(input.remarks),
                file: input.file,
                approved_by: actor_id,
                rejection_reason: Some(reason),
                last_modified: None,
                modified_by: None,
            };
            (record, RejectedAdministrativeApproval)
        }
    };

    proposal.administrative_approval = Some(record);
    transition(proposal, next, now);
    Ok(())
}

pub fn update_administrative_approval(
    proposal: &mut WorkProposal,
    fields: AdministrativeApprovalPatch,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    require_editable(
        proposal,
        SubRecord::AdministrativeApproval,
        proposal.administrative_approval.is_some(),
    )?;
    let approved_amount = check_amount("approved_amount", fields.approved_amount)?;
    let Some(record) = proposal.administrative_approval.as_mut() else {
        return Err(AppError::NotFound);
    };

    patch_opt(&mut record.approval_number, fields.approval_number);
    patch_opt(&mut record.sanction_reference, fields.sanction_reference);
    patch_opt(&mut record.approval_date, fields.approval_date);
    patch_opt(&mut record.approved_amount, approved_amount);
    patch_opt(&mut record.remarks, fields.remarks);
    patch_opt(&mut record.rejection_reason, fields.rejection_reason);
    patch_opt(&mut record.file, fields.file);
    check_approval_record(record.status, &record.approval_number, &record.rejection_reason)?;

    record.last_modified = Some(now);
    record.modified_by = Some(actor_id);
    Ok(())
}

pub fn start_tender_process(
    proposal: &mut WorkProposal,
    input: TenderInput,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    require_status(proposal, &[PendingTender])?;
    if !proposal.is_tender {
        return Err(AppError::invalid_state(&[PendingTender], proposal.current_status));
    }
    let title = require_text("title", input.title)?;
    let tender_id = require_text("tender_id", input.tender_id)?;

    proposal.tender_process = Some(TenderProcess {
        title,
        tender_id,
        department_id: input.department_id,
        file: input.file,
        issued_date: input.issued_date,
        remark: non_blank(input.remark),
        tender_status: TenderStatus::NoticePublished,
        selected_contractor: None,
        started_by: actor_id,
        last_modified: None,
        modified_by: None,
    });
    transition(proposal, PendingWorkOrder, now);
    Ok(())
}

pub fn update_tender_process(
    proposal: &mut WorkProposal,
    fields: TenderPatch,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    require_editable(proposal, SubRecord::TenderProcess, proposal.tender_process.is_some())?;
    let tender_status = fields
        .tender_status
        .as_deref()
        .map(str::parse::<TenderStatus>)
        .transpose()?;
    let Some(record) = proposal.tender_process.as_mut() else {
        return Err(AppError::NotFound);
    };

    patch_text("title", &mut record.title, fields.title)?;
    patch_text("tender_id", &mut record.tender_id, fields.tender_id)?;
    patch_opt(&mut record.department_id, fields.department_id);
    patch_opt(&mut record.file, fields.file);
    patch_opt(&mut record.issued_date, fields.issued_date);
    patch_opt(&mut record.remark, fields.remark);
    patch(&mut record.tender_status, tender_status);

    record.last_modified = Some(now);
    record.modified_by = Some(actor_id);
    Ok(())
}

pub fn award_tender(
    proposal: &mut WorkProposal,
    input: AwardInput,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    require_status(proposal, &[TenderInProgress])?;
    let name = require_text("contractor_name", input.contractor_name)?;
    let amount = require_amount("awarded_amount", require("awarded_amount", input.awarded_amount)?)?;
    let Some(record) = proposal.tender_process.as_mut() else {
        return Err(AppError::invalid_state(&[TenderInProgress], proposal.current_status));
    };

    record.selected_contractor = Some(SelectedContractor {
        name,
        contact_info: non_blank(input.contact_info),
        awarded_amount: amount,
        awarded_by: actor_id,
        awarded_at: now,
    });
    record.tender_status = TenderStatus::Awarded;
    record.last_modified = Some(now);
    record.modified_by = Some(actor_id);
    transition(proposal, PendingWorkOrder, now);
    Ok(())
}

/// Validated fields of a new work order.
pub struct WorkOrderFields {
    pub work_order_number: String,
    pub date_of_work_order: chrono::NaiveDate,
    pub contractor_or_gram_panchayat: String,
    pub remark: String,
    pub file: Option<crate::models::proposal::BlobRef>,
}

/// Precondition and field checks for `create_work_order`, run before the
/// uniqueness lookup so that state errors win over conflicts.
pub fn check_work_order(
    proposal: &WorkProposal,
    input: WorkOrderInput,
) -> Result<WorkOrderFields, AppError> {
    require_status(proposal, &[PendingWorkOrder])?;
    Ok(WorkOrderFields {
        work_order_number: require_text("work_order_number", input.work_order_number)?,
        date_of_work_order: require("date_of_work_order", input.date_of_work_order)?,
        contractor_or_gram_panchayat: require_text(
            "contractor_or_gram_panchayat",
            input.contractor_or_gram_panchayat,
        )?,
        remark: require_text("remark", input.remark)?,
        file: input.file,
    })
}

pub fn create_work_order(
    proposal: &mut WorkProposal,
    fields: WorkOrderFields,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    require_status(proposal, &[PendingWorkOrder])?;
    let description = format!("Work order {} issued", fields.work_order_number);

    proposal.work_order = Some(WorkOrder {
        work_order_number: fields.work_order_number,
        date_of_work_order: fields.date_of_work_order,
        contractor_or_gram_panchayat: fields.contractor_or_gram_panchayat,
        remark: fields.remark,
        file: fields.file,
        issued_by: actor_id,
        issued_at: now,
        last_modified: None,
        modified_by: None,
    });
    proposal.work_progress.push(ProgressEntry {
        id: Uuid::new_v4(),
        description,
        sanctioned_amount: proposal.sanction_amount,
        total_amount_released_so_far: 0.0,
        remaining_balance: proposal.sanction_amount,
        installments: Vec::new(),
        mb_stage: None,
        expenditure_amount: 0.0,
        progress_percent: 0.0,
        documents: Vec::new(),
        images: Vec::new(),
        updated_by: actor_id,
        updated_at: now,
    });
    transition(proposal, WorkInProgress, now);
    Ok(())
}

/// Applies a work-order patch. Returns the new number when it changed, so the
/// caller can re-check uniqueness.
pub fn update_work_order(
    proposal: &mut WorkProposal,
    fields: WorkOrderPatch,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<Option<String>, AppError> {
    require_editable(proposal, SubRecord::WorkOrder, proposal.work_order.is_some())?;
    let Some(record) = proposal.work_order.as_mut() else {
        return Err(AppError::NotFound);
    };

    let previous = record.work_order_number.clone();
    patch_text("work_order_number", &mut record.work_order_number, fields.work_order_number)?;
    patch(&mut record.date_of_work_order, fields.date_of_work_order);
    patch_text(
        "contractor_or_gram_panchayat",
        &mut record.contractor_or_gram_panchayat,
        fields.contractor_or_gram_panchayat,
    )?;
    patch_text("remark", &mut record.remark, fields.remark)?;
    patch_opt(&mut record.file, fields.file);

    record.last_modified = Some(now);
    record.modified_by = Some(actor_id);

    let changed = (record.work_order_number != previous).then(|| record.work_order_number.clone());
    Ok(changed)
}

pub fn start_work(proposal: &mut WorkProposal, now: DateTime<Utc>) -> Result<(), AppError> {
    require_status(proposal, &[WorkOrderCreated])?;
    transition(proposal, WorkInProgress, now);
    Ok(())
}

pub fn record_completion(
    proposal: &mut WorkProposal,
    input: CompletionInput,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    require_status(proposal, &COMPLETABLE_STATUSES)?;
    let final_cost = check_amount("final_cost", input.final_cost)?;
    if input.outcome == CompletionOutcome::Completed && input.completion_date.is_none() {
        return Err(AppError::required("completion_date"));
    }

    patch_opt(&mut proposal.completion_date, input.completion_date);
    patch_opt(&mut proposal.final_cost, final_cost);
    proposal.completion_documents.extend(input.documents);
    transition(proposal, input.outcome.status(), now);
    Ok(())
}

pub fn new_progress_entry(
    proposal: &WorkProposal,
    fields: ProgressInput,
    attachments: ProgressAttachments,
    actor_id: i64,
    now: DateTime<Utc>,
) -> Result<ProgressEntry, AppError> {
    let description = require_text("description", fields.description)?;
    let sanctioned_amount = require_amount(
        "sanctioned_amount",
        fields.sanctioned_amount.unwrap_or(proposal.sanction_amount),
    )?;
    let expenditure_amount =
        require_amount("expenditure_amount", fields.expenditure_amount.unwrap_or(0.0))?;
    let progress_percent = fields.progress_percent.unwrap_or(0.0);
    if !(0.0..=100.0).contains(&progress_percent) {
        return Err(AppError::validation("progress_percent", "progress_percent must be between 0 and 100"));
    }

    let mut last_number = 0;
    let mut released = 0.0;
    for installment in &fields.installments {
        if installment.number <= last_number {
            return Err(AppError::validation(
                "installments",
                "installment numbers must be strictly increasing",
            ));
        }
        last_number = installment.number;
        released += require_amount("installments", installment.amount)?;
    }
    let remaining_balance = sanctioned_amount - released;
    // Non-finite totals serialize as null and the stored document would no longer load.
    if !released.is_finite() || !remaining_balance.is_finite() {
        return Err(AppError::validation("installments", "installment total is out of range"));
    }

    Ok(ProgressEntry {
        id: Uuid::new_v4(),
        description,
        sanctioned_amount,
        total_amount_released_so_far: released,
        remaining_balance,
        installments: fields.installments,
        mb_stage: non_blank(fields.mb_stage),
        expenditure_amount,
        progress_percent,
        documents: attachments.documents,
        images: attachments.images,
        updated_by: actor_id,
        updated_at: now,
    })
}

/// Removes the entry if present; the remaining entries keep their order.
pub fn delete_progress(proposal: &mut WorkProposal, entry_id: Uuid) -> bool {
    let before = proposal.work_progress.len();
    proposal.work_progress.retain(|e| e.id != entry_id);
    proposal.work_progress.len() != before
}

/// Generic descriptive update. `current_status` is honoured only when
/// `allow_status_override` is set (admin actors).
pub fn update_details(
    proposal: &mut WorkProposal,
    fields: ProposalPatch,
    allow_status_override: bool,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if fields.current_status.is_some() && !allow_status_override {
        return Err(AppError::PermissionDenied(
            "only administrators may set current_status directly".to_string(),
        ));
    }
    let sanction_amount = check_amount("sanction_amount", fields.sanction_amount)?;

    patch_text("work_name", &mut proposal.work_name, fields.work_name)?;
    patch_text("financial_year", &mut proposal.financial_year, fields.financial_year)?;
    patch_opt(&mut proposal.description, fields.description);
    patch(&mut proposal.location.city_id, fields.city_id);
    patch(&mut proposal.location.ward_id, fields.ward_id);
    patch(&mut proposal.location.type_of_location_id, fields.type_of_location_id);
    patch_opt(&mut proposal.location.address, fields.address);
    patch_opt(&mut proposal.location.latitude, fields.latitude);
    patch_opt(&mut proposal.location.longitude, fields.longitude);
    patch(&mut proposal.department_id, fields.department_id);
    patch_opt(&mut proposal.approving_department_id, fields.approving_department_id);
    patch(&mut proposal.scheme_id, fields.scheme_id);
    patch(&mut proposal.work_agency_id, fields.work_agency_id);
    patch(&mut proposal.type_of_work_id, fields.type_of_work_id);
    patch_opt(&mut proposal.appointed_engineer_id, fields.appointed_engineer_id);
    patch_opt(&mut proposal.appointed_sdo_id, fields.appointed_sdo_id);
    patch(&mut proposal.sanction_amount, sanction_amount);
    patch_opt(&mut proposal.estimated_completion_date, fields.estimated_completion_date);
    patch(&mut proposal.is_dpr, fields.is_dpr);
    patch(&mut proposal.is_tender, fields.is_tender);

    if let Some(status) = fields.current_status {
        transition(proposal, status, now);
    }
    proposal.last_revision = Some(now);
    Ok(())
}

pub fn check_deletable(proposal: &WorkProposal) -> Result<(), AppError> {
    require_status(proposal, &DELETABLE_STATUSES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tender_record_is_editable_from_every_status() {
        assert_eq!(editable_statuses(SubRecord::TenderProcess).len(), ProposalStatus::ALL.len());
    }

    #[test]
    fn work_order_is_not_editable_before_it_can_exist() {
        let allowed = editable_statuses(SubRecord::WorkOrder);
        assert!(!allowed.contains(&PendingTender));
        assert!(!allowed.contains(&PendingAdministrativeApproval));
        assert!(allowed.contains(&WorkInProgress));
    }

    #[test]
    fn mid_pipeline_statuses_are_not_deletable() {
        for status in [PendingTender, TenderInProgress, PendingWorkOrder, WorkOrderCreated, WorkInProgress] {
            assert!(!DELETABLE_STATUSES.contains(&status), "{status} must not be deletable");
        }
    }

    #[test]
    fn approved_record_without_number_is_rejected() {
        let result = check_approval_record(ApprovalStatus::Approved, &Some("  ".to_string()), &None);
        assert!(matches!(result, Err(AppError::Validation { field, .. }) if field == "approval_number"));
        assert!(check_approval_record(ApprovalStatus::Rejected, &None, &Some("scope".to_string())).is_ok());
    }
}
