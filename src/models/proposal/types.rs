use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{ApprovalStatus, ProposalStatus, TenderStatus};
use crate::models::reference::ReferenceKind;

/// Reference to an object already uploaded to the blob store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobRef {
    pub key: String,
    pub url: String,
    pub size: i64,
    pub checksum: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city_id: i64,
    pub ward_id: i64,
    pub type_of_location_id: i64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalApproval {
    pub status: ApprovalStatus,
    pub approval_number: Option<String>,
    pub approval_date: Option<DateTime<Utc>>,
    pub forwarding_date: Option<DateTime<Utc>>,
    pub sanctioned_amount: Option<f64>,
    pub remarks: Option<String>,
    pub file: Option<BlobRef>,
    #[serde(default)]
    pub images: Vec<BlobRef>,
    pub approved_by: i64,
    pub rejection_reason: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub modified_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeApproval {
    pub status: ApprovalStatus,
    /// Government or district sanction reference.
    pub sanction_reference: Option<String>,
    pub approval_number: Option<String>,
    pub approval_date: Option<DateTime<Utc>>,
    pub approved_amount: Option<f64>,
    pub remarks: Option<String>,
    pub file: Option<BlobRef>,
    pub approved_by: i64,
    pub rejection_reason: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub modified_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedContractor {
    pub name: String,
    pub contact_info: Option<String>,
    pub awarded_amount: f64,
    pub awarded_by: i64,
    pub awarded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderProcess {
    pub title: String,
    pub tender_id: String,
    pub department_id: Option<i64>,
    pub file: Option<BlobRef>,
    pub issued_date: Option<NaiveDate>,
    pub remark: Option<String>,
    pub tender_status: TenderStatus,
    pub selected_contractor: Option<SelectedContractor>,
    pub started_by: i64,
    pub last_modified: Option<DateTime<Utc>>,
    pub modified_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub work_order_number: String,
    pub date_of_work_order: NaiveDate,
    pub contractor_or_gram_panchayat: String,
    pub remark: String,
    pub file: Option<BlobRef>,
    pub issued_by: i64,
    pub issued_at: DateTime<Utc>,
    pub last_modified: Option<DateTime<Utc>>,
    pub modified_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub amount: f64,
    pub date: NaiveDate,
}

/// One append-only progress record against the work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub description: String,
    pub sanctioned_amount: f64,
    pub total_amount_released_so_far: f64,
    pub remaining_balance: f64,
    #[serde(default)]
    pub installments: Vec<Installment>,
    /// Measurement-book stage.
    pub mb_stage: Option<String>,
    pub expenditure_amount: f64,
    pub progress_percent: f64,
    #[serde(default)]
    pub documents: Vec<BlobRef>,
    #[serde(default)]
    pub images: Vec<BlobRef>,
    pub updated_by: i64,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate root: one submitted public-works item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkProposal {
    pub id: i64,
    pub serial_number: String,
    /// Optimistic-concurrency counter, bumped by every successful save.
    pub version: i64,

    pub work_name: String,
    pub description: Option<String>,
    pub financial_year: String,
    pub location: Location,
    pub department_id: i64,
    pub approving_department_id: Option<i64>,
    pub scheme_id: i64,
    pub work_agency_id: i64,
    pub type_of_work_id: i64,
    pub appointed_engineer_id: Option<i64>,
    pub appointed_sdo_id: Option<i64>,
    pub sanction_amount: f64,
    pub estimated_completion_date: Option<NaiveDate>,
    pub is_dpr: bool,
    pub is_tender: bool,

    pub current_status: ProposalStatus,
    pub work_progress_stage: ProposalStatus,
    pub last_status_update: DateTime<Utc>,
    pub last_revision: Option<DateTime<Utc>>,
    pub submitted_by: i64,
    pub submission_date: DateTime<Utc>,

    pub technical_approval: Option<TechnicalApproval>,
    pub administrative_approval: Option<AdministrativeApproval>,
    pub tender_process: Option<TenderProcess>,
    pub work_order: Option<WorkOrder>,
    #[serde(default)]
    pub work_progress: Vec<ProgressEntry>,
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub completion_documents: Vec<BlobRef>,
    pub final_cost: Option<f64>,
}

impl WorkProposal {
    /// Every reference-table row this proposal points at. Reference deletion
    /// is refused while any proposal still returns the row here.
    pub fn references(&self) -> Vec<(ReferenceKind, i64)> {
        let mut refs = vec![
            (ReferenceKind::City, self.location.city_id),
            (ReferenceKind::Ward, self.location.ward_id),
            (ReferenceKind::TypeOfLocation, self.location.type_of_location_id),
            (ReferenceKind::Department, self.department_id),
            (ReferenceKind::Scheme, self.scheme_id),
            (ReferenceKind::Agency, self.work_agency_id),
            (ReferenceKind::TypeOfWork, self.type_of_work_id),
        ];
        if let Some(id) = self.approving_department_id {
            refs.push((ReferenceKind::Department, id));
        }
        if let Some(id) = self.appointed_sdo_id {
            refs.push((ReferenceKind::Sdo, id));
        }
        refs
    }

    pub fn references_row(&self, kind: ReferenceKind, id: i64) -> bool {
        self.references().into_iter().any(|r| r == (kind, id))
    }

    pub fn work_order_number(&self) -> Option<&str> {
        self.work_order.as_ref().map(|w| w.work_order_number.as_str())
    }

    pub fn progress_entry(&self, entry_id: Uuid) -> Option<&ProgressEntry> {
        self.work_progress.iter().find(|e| e.id == entry_id)
    }
}
