use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use super::store::{ProposalStore, format_serial};
use super::types::WorkProposal;
use crate::errors::AppError;
use crate::models::reference::ReferenceKind;

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    rows: BTreeMap<i64, WorkProposal>,
}

/// In-process `ProposalStore` with the same version and uniqueness checks as
/// the Postgres store.
#[derive(Default)]
pub struct MemoryProposalStore {
    state: Mutex<MemoryState>,
}

impl MemoryProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn number_taken(rows: &BTreeMap<i64, WorkProposal>, number: &str, excluding: Option<i64>) -> bool {
    rows.values()
        .filter(|p| Some(p.id) != excluding)
        .any(|p| p.work_order_number() == Some(number))
}

#[async_trait]
impl ProposalStore for MemoryProposalStore {
    async fn insert(&self, mut proposal: WorkProposal) -> Result<WorkProposal, AppError> {
        let mut state = self.state.lock().await;
        if let Some(number) = proposal.work_order_number() {
            if number_taken(&state.rows, number, None) {
                return Err(AppError::Conflict(format!("work order number '{number}' already in use")));
            }
        }
        state.next_id += 1;
        proposal.id = state.next_id;
        proposal.serial_number = format_serial(proposal.id);
        proposal.version = 1;
        state.rows.insert(proposal.id, proposal.clone());
        Ok(proposal)
    }

    async fn load(&self, id: i64) -> Result<Option<WorkProposal>, AppError> {
        Ok(self.state.lock().await.rows.get(&id).cloned())
    }

    async fn save(&self, proposal: &WorkProposal) -> Result<WorkProposal, AppError> {
        let mut state = self.state.lock().await;
        let stored_version = match state.rows.get(&proposal.id) {
            Some(stored) => stored.version,
            None => return Err(AppError::NotFound),
        };
        if stored_version != proposal.version {
            return Err(AppError::StaleWrite { id: proposal.id });
        }
        if let Some(number) = proposal.work_order_number() {
            if number_taken(&state.rows, number, Some(proposal.id)) {
                return Err(AppError::Conflict(format!("work order number '{number}' already in use")));
            }
        }
        let mut saved = proposal.clone();
        saved.version += 1;
        state.rows.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: i64, version: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        match state.rows.get(&id) {
            None => Err(AppError::NotFound),
            Some(stored) if stored.version != version => Err(AppError::StaleWrite { id }),
            Some(_) => {
                state.rows.remove(&id);
                Ok(())
            }
        }
    }

    async fn work_order_number_in_use(
        &self,
        number: &str,
        excluding: Option<i64>,
    ) -> Result<bool, AppError> {
        Ok(number_taken(&self.state.lock().await.rows, number, excluding))
    }

    async fn count_references(&self, kind: ReferenceKind, id: i64) -> Result<i64, AppError> {
        let state = self.state.lock().await;
        Ok(state.rows.values().filter(|p| p.references_row(kind, id)).count() as i64)
    }
}
