use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// Lifecycle status of a work proposal. `current_status` and
/// `work_progress_stage` always hold the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    #[serde(rename = "Pending Technical Approval")]
    PendingTechnicalApproval,
    #[serde(rename = "Rejected Technical Approval")]
    RejectedTechnicalApproval,
    #[serde(rename = "Pending Administrative Approval")]
    PendingAdministrativeApproval,
    #[serde(rename = "Rejected Administrative Approval")]
    RejectedAdministrativeApproval,
    #[serde(rename = "Pending Tender")]
    PendingTender,
    /// Precondition of `award_tender`; no current operation enters it.
    #[serde(rename = "Tender In Progress")]
    TenderInProgress,
    #[serde(rename = "Pending Work Order")]
    PendingWorkOrder,
    /// Precondition of `start_work`; no current operation enters it.
    #[serde(rename = "Work Order Created")]
    WorkOrderCreated,
    #[serde(rename = "Work In Progress")]
    WorkInProgress,
    #[serde(rename = "Work Completed")]
    WorkCompleted,
    #[serde(rename = "Work Cancelled")]
    WorkCancelled,
    #[serde(rename = "Work Stopped")]
    WorkStopped,
    #[serde(rename = "Work Not Started")]
    WorkNotStarted,
}

impl ProposalStatus {
    /// Every status in pipeline order.
    pub const ALL: [ProposalStatus; 13] = [
        ProposalStatus::PendingTechnicalApproval,
        ProposalStatus::RejectedTechnicalApproval,
        ProposalStatus::PendingAdministrativeApproval,
        ProposalStatus::RejectedAdministrativeApproval,
        ProposalStatus::PendingTender,
        ProposalStatus::TenderInProgress,
        ProposalStatus::PendingWorkOrder,
        ProposalStatus::WorkOrderCreated,
        ProposalStatus::WorkInProgress,
        ProposalStatus::WorkCompleted,
        ProposalStatus::WorkCancelled,
        ProposalStatus::WorkStopped,
        ProposalStatus::WorkNotStarted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::PendingTechnicalApproval => "Pending Technical Approval",
            ProposalStatus::RejectedTechnicalApproval => "Rejected Technical Approval",
            ProposalStatus::PendingAdministrativeApproval => "Pending Administrative Approval",
            ProposalStatus::RejectedAdministrativeApproval => "Rejected Administrative Approval",
            ProposalStatus::PendingTender => "Pending Tender",
            ProposalStatus::TenderInProgress => "Tender In Progress",
            ProposalStatus::PendingWorkOrder => "Pending Work Order",
            ProposalStatus::WorkOrderCreated => "Work Order Created",
            ProposalStatus::WorkInProgress => "Work In Progress",
            ProposalStatus::WorkCompleted => "Work Completed",
            ProposalStatus::WorkCancelled => "Work Cancelled",
            ProposalStatus::WorkStopped => "Work Stopped",
            ProposalStatus::WorkNotStarted => "Work Not Started",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalStatus::RejectedTechnicalApproval
                | ProposalStatus::RejectedAdministrativeApproval
                | ProposalStatus::WorkCompleted
                | ProposalStatus::WorkCancelled
                | ProposalStatus::WorkStopped
                | ProposalStatus::WorkNotStarted
        )
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProposalStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::validation("current_status", format!("unknown status '{s}'")))
    }
}

/// Status of an approval sub-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Status of the tender sub-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenderStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "Notice Published")]
    NoticePublished,
    #[serde(rename = "Bid Submission")]
    BidSubmission,
    #[serde(rename = "Under Evaluation")]
    UnderEvaluation,
    Awarded,
    Cancelled,
}

impl TenderStatus {
    pub const ALL: [TenderStatus; 6] = [
        TenderStatus::NotStarted,
        TenderStatus::NoticePublished,
        TenderStatus::BidSubmission,
        TenderStatus::UnderEvaluation,
        TenderStatus::Awarded,
        TenderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TenderStatus::NotStarted => "Not Started",
            TenderStatus::NoticePublished => "Notice Published",
            TenderStatus::BidSubmission => "Bid Submission",
            TenderStatus::UnderEvaluation => "Under Evaluation",
            TenderStatus::Awarded => "Awarded",
            TenderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TenderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TenderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::validation("tender_status", format!("unknown tender status '{s}'")))
    }
}
