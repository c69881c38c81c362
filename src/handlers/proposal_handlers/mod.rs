pub mod crud;
pub mod progress;
pub mod workflow;

use sqlx::PgPool;

use crate::auth::Actor;
use crate::lifecycle::LifecycleEngine;
use crate::models::proposal::{PgProposalStore, WorkProposal};

/// Engine type shared with handlers through `web::Data`.
pub type ProposalService = LifecycleEngine<PgProposalStore>;

/// Log and audit a successful lifecycle action. Audit failures are ignored.
async fn record_action(pool: &PgPool, actor: &Actor, action: &str, proposal: &WorkProposal, summary: String) {
    log::info!(
        "{action}: proposal {} ({}) now '{}' by user {}",
        proposal.id,
        proposal.serial_number,
        proposal.current_status,
        actor.user_id
    );
    let details = serde_json::json!({
        "serial_number": proposal.serial_number,
        "status": proposal.current_status,
        "version": proposal.version,
        "summary": summary,
    });
    let _ = crate::audit::log(pool, actor.user_id, action, "work_proposal", proposal.id, details).await;
}
