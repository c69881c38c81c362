use super::types::ReferenceKind;
use crate::errors::AppError;
use crate::models::proposal::ProposalStore;

/// Fail with `Conflict` while any proposal references `(kind, id)`.
pub async fn ensure_unreferenced<S: ProposalStore + ?Sized>(
    store: &S,
    kind: ReferenceKind,
    id: i64,
) -> Result<(), AppError> {
    let count = store.count_references(kind, id).await?;
    if count > 0 {
        return Err(AppError::Conflict(format!(
            "{kind} {id} is referenced by {count} work proposal(s)"
        )));
    }
    Ok(())
}
