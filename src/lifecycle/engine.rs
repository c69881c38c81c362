use chrono::Utc;
use uuid::Uuid;

use super::inputs::*;
use super::rules;
use crate::auth::Actor;
use crate::errors::AppError;
use crate::models::proposal::{ProgressEntry, ProposalStore, WorkProposal};

/// Work proposal lifecycle engine.
///
/// Each operation loads the aggregate, validates its precondition, mutates a
/// copy and persists it with one version-checked save. A failed operation
/// never writes, so the stored proposal is unchanged.
pub struct LifecycleEngine<S> {
    store: S,
}

impl<S: ProposalStore> LifecycleEngine<S> {
    pub fn new(store: S) -> Self {
        LifecycleEngine { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn get(&self, id: i64) -> Result<WorkProposal, AppError> {
        self.store.load(id).await?.ok_or(AppError::NotFound)
    }

    async fn ensure_work_order_number_free(&self, number: &str, excluding: Option<i64>) -> Result<(), AppError> {
        if self.store.work_order_number_in_use(number, excluding).await? {
            return Err(AppError::Conflict(format!("work order number '{number}' already in use")));
        }
        Ok(())
    }

    pub async fn create(&self, input: NewProposal, actor: &Actor) -> Result<WorkProposal, AppError> {
        let proposal = rules::new_proposal(input, actor.user_id, Utc::now())?;
        self.store.insert(proposal).await
    }

    pub async fn technical_approval(
        &self,
        id: i64,
        action: ApprovalAction,
        input: TechnicalApprovalInput,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::technical_approval(&mut proposal, action, input, actor.user_id, Utc::now())?;
        self.store.save(&proposal).await
    }

    pub async fn update_technical_approval(
        &self,
        id: i64,
        fields: TechnicalApprovalPatch,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::update_technical_approval(&mut proposal, fields, actor.user_id, Utc::now())?;
        self.store.save(&proposal).await
    }

    pub async fn administrative_approval(
        &self,
        id: i64,
        action: ApprovalAction,
        input: AdministrativeApprovalInput,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::administrative_approval(&mut proposal, action, input, actor.user_id, Utc::now())?;
        self.store.save(&proposal).await
    }

    pub async fn update_administrative_approval(
        &self,
        id: i64,
        fields: AdministrativeApprovalPatch,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::update_administrative_approval(&mut proposal, fields, actor.user_id, Utc::now())?;
        self.store.save(&proposal).await
    }

    pub async fn start_tender_process(
        &self,
        id: i64,
        input: TenderInput,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::start_tender_process(&mut proposal, input, actor.user_id, Utc::now())?;
        self.store.save(&proposal).await
    }

    pub async fn update_tender_process(
        &self,
        id: i64,
        fields: TenderPatch,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::update_tender_process(&mut proposal, fields, actor.user_id, Utc::now())?;
        self.store.save(&proposal).await
    }

    /// Only reachable from `Tender In Progress`, which no operation currently enters.
    pub async fn award_tender(
        &self,
        id: i64,
        input: AwardInput,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::award_tender(&mut proposal, input, actor.user_id, Utc::now())?;
        self.store.save(&proposal).await
    }

    pub async fn create_work_order(
        &self,
        id: i64,
        input: WorkOrderInput,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        let fields = rules::check_work_order(&proposal, input)?;
        self.ensure_work_order_number_free(&fields.work_order_number, Some(id)).await?;
        rules::create_work_order(&mut proposal, fields, actor.user_id, Utc::now())?;
        self.store.save(&proposal).await
    }

    pub async fn update_work_order(
        &self,
        id: i64,
        fields: WorkOrderPatch,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        if let Some(number) = rules::update_work_order(&mut proposal, fields, actor.user_id, Utc::now())? {
            self.ensure_work_order_number_free(&number, Some(id)).await?;
        }
        self.store.save(&proposal).await
    }

    /// Only reachable from `Work Order Created`, which no operation currently enters.
    pub async fn start_work(&self, id: i64) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::start_work(&mut proposal, Utc::now())?;
        self.store.save(&proposal).await
    }

    pub async fn record_completion(
        &self,
        id: i64,
        input: CompletionInput,
        _actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::record_completion(&mut proposal, input, Utc::now())?;
        self.store.save(&proposal).await
    }

    /// Appends a progress entry. Whether `actor` may record progress is the
    /// caller's check (see `Actor::can_record_progress`).
    pub async fn add_progress(
        &self,
        id: i64,
        fields: ProgressInput,
        attachments: ProgressAttachments,
        actor: &Actor,
    ) -> Result<ProgressEntry, AppError> {
        let mut proposal = self.get(id).await?;
        let entry = rules::new_progress_entry(&proposal, fields, attachments, actor.user_id, Utc::now())?;
        proposal.work_progress.push(entry.clone());
        self.store.save(&proposal).await?;
        Ok(entry)
    }

    /// Removes a progress entry. Deleting an absent entry is a no-op.
    pub async fn delete_progress(&self, id: i64, entry_id: Uuid) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        if !rules::delete_progress(&mut proposal, entry_id) {
            return Ok(proposal);
        }
        self.store.save(&proposal).await
    }

    pub async fn update(
        &self,
        id: i64,
        fields: ProposalPatch,
        actor: &Actor,
    ) -> Result<WorkProposal, AppError> {
        let mut proposal = self.get(id).await?;
        rules::update_details(&mut proposal, fields, actor.is_admin(), Utc::now())?;
        self.store.save(&proposal).await
    }

    pub async fn delete(&self, id: i64, _actor: &Actor) -> Result<(), AppError> {
        let proposal = self.get(id).await?;
        rules::check_deletable(&proposal)?;
        self.store.delete(id, proposal.version).await
    }
}
