use async_trait::async_trait;

use super::types::WorkProposal;
use crate::errors::AppError;
use crate::models::reference::ReferenceKind;

/// Persistence capability consumed by the lifecycle engine.
///
/// Implementations store the whole aggregate as one unit. `save` and `delete`
/// are conditional on `version`: a write against a stale copy fails with
/// `AppError::StaleWrite` instead of overwriting a concurrent change.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Persist a new proposal, assigning `id`, `serial_number` and `version = 1`.
    async fn insert(&self, proposal: WorkProposal) -> Result<WorkProposal, AppError>;

    async fn load(&self, id: i64) -> Result<Option<WorkProposal>, AppError>;

    /// Replace the stored aggregate if its version still equals
    /// `proposal.version`. Returns the stored copy with the bumped version.
    async fn save(&self, proposal: &WorkProposal) -> Result<WorkProposal, AppError>;

    async fn delete(&self, id: i64, version: i64) -> Result<(), AppError>;

    /// True when another proposal (other than `excluding`) already holds this
    /// work-order number.
    async fn work_order_number_in_use(
        &self,
        number: &str,
        excluding: Option<i64>,
    ) -> Result<bool, AppError>;

    /// Number of proposals referencing the given reference-table row.
    async fn count_references(&self, kind: ReferenceKind, id: i64) -> Result<i64, AppError>;
}

/// Human-readable serial number derived from the proposal id.
pub fn format_serial(id: i64) -> String {
    format!("WP-{id:06}")
}
