mod common;

use common::*;
use works_tracker::errors::AppError;
use works_tracker::lifecycle::*;
use works_tracker::models::proposal::{Installment, ProposalStatus};

fn installment(number: u32, amount: f64) -> Installment {
    Installment { number, amount, date: date(2025, 9, number) }
}

fn progress(description: &str, installments: Vec<Installment>) -> ProgressInput {
    ProgressInput {
        description: Some(description.to_string()),
        installments,
        mb_stage: Some("MB-2".to_string()),
        expenditure_amount: Some(90_000.0),
        progress_percent: Some(40.0),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_add_progress_accounts_installments() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;

    let input = progress("Excavation done", vec![installment(1, 50_000.0), installment(2, 25_000.0)]);
    let entry = engine
        .add_progress(p.id, input, ProgressAttachments::default(), &engineer())
        .await
        .unwrap();

    assert_eq!(entry.sanctioned_amount, SANCTION);
    assert_eq!(entry.total_amount_released_so_far, 75_000.0);
    assert_eq!(entry.remaining_balance, 175_000.0);
    assert_eq!(entry.progress_percent, 40.0);
    assert_eq!(entry.mb_stage.as_deref(), Some("MB-2"));
    assert_eq!(entry.updated_by, ENGINEER_ID);

    let p = engine.get(p.id).await.unwrap();
    assert_eq!(p.work_progress.len(), 2);
    assert_eq!(p.work_progress[1], entry);
    assert_status(&p, ProposalStatus::WorkInProgress);
}

#[tokio::test]
async fn test_entries_keep_insertion_order() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;

    for name in ["Foundation", "Walls", "Roof"] {
        engine
            .add_progress(p.id, progress(name, vec![]), ProgressAttachments::default(), &engineer())
            .await
            .unwrap();
    }

    let p = engine.get(p.id).await.unwrap();
    let descriptions: Vec<&str> = p.work_progress.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(descriptions, ["Work order WO-1 issued", "Foundation", "Walls", "Roof"]);
}

#[tokio::test]
async fn test_installment_numbers_must_increase() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;

    let input = progress("Plinth", vec![installment(2, 10_000.0), installment(2, 10_000.0)]);
    let result = engine
        .add_progress(p.id, input, ProgressAttachments::default(), &engineer())
        .await;

    assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "installments"));
    assert_eq!(engine.get(p.id).await.unwrap().work_progress.len(), 1);
}

#[tokio::test]
async fn test_overflowing_installment_total_is_rejected() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;

    let input = progress("Bulk release", vec![installment(1, 1e308), installment(2, 1e308)]);
    let result = engine
        .add_progress(p.id, input, ProgressAttachments::default(), &engineer())
        .await;

    assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "installments"));
    let stored = engine.get(p.id).await.unwrap();
    assert_eq!(stored.work_progress.len(), 1);
    // Every stored amount survives a JSON round trip.
    let json = serde_json::to_string(&stored).unwrap();
    let reloaded: works_tracker::models::proposal::WorkProposal = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, stored);
}

#[tokio::test]
async fn test_progress_percent_is_bounded() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;

    for percent in [-5.0, 100.5] {
        let input = ProgressInput { progress_percent: Some(percent), ..progress("Paving", vec![]) };
        let result = engine
            .add_progress(p.id, input, ProgressAttachments::default(), &engineer())
            .await;
        assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "progress_percent"));
    }

    let input = ProgressInput { progress_percent: Some(100.0), ..progress("Paving", vec![]) };
    let entry = engine
        .add_progress(p.id, input, ProgressAttachments::default(), &engineer())
        .await
        .unwrap();
    assert_eq!(entry.progress_percent, 100.0);
}

#[tokio::test]
async fn test_progress_requires_description() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;

    let input = ProgressInput { description: None, ..progress("", vec![]) };
    let result = engine
        .add_progress(p.id, input, ProgressAttachments::default(), &admin())
        .await;
    assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "description"));
}

#[tokio::test]
async fn test_delete_progress_keeps_others_in_order() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;
    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let entry = engine
            .add_progress(p.id, progress(name, vec![]), ProgressAttachments::default(), &engineer())
            .await
            .unwrap();
        ids.push(entry.id);
    }

    let p = engine.delete_progress(p.id, ids[1]).await.unwrap();

    let descriptions: Vec<&str> = p.work_progress.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(descriptions, ["Work order WO-1 issued", "A", "C"]);
    assert!(p.progress_entry(ids[1]).is_none());
}

#[tokio::test]
async fn test_delete_absent_progress_is_noop() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;

    let after = engine.delete_progress(p.id, uuid::Uuid::new_v4()).await.unwrap();

    assert_eq!(after, p);
    assert_eq!(engine.get(p.id).await.unwrap().version, p.version);
}

#[tokio::test]
async fn test_only_engineer_or_admin_may_record_progress() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;

    assert!(engineer().can_record_progress(&p));
    assert!(admin().can_record_progress(&p));
    assert!(!clerk().can_record_progress(&p));
}

#[tokio::test]
async fn test_add_then_delete_restores_prior_entries() {
    let engine = engine();
    let p = at_work_in_progress(&engine, "WO-1").await;
    engine
        .add_progress(p.id, progress("Survey", vec![]), ProgressAttachments::default(), &engineer())
        .await
        .unwrap();
    let before = engine.get(p.id).await.unwrap().work_progress;

    let entry = engine
        .add_progress(p.id, progress("Trenching", vec![]), ProgressAttachments::default(), &admin())
        .await
        .unwrap();
    let after = engine.delete_progress(p.id, entry.id).await.unwrap().work_progress;

    assert_eq!(after, before);
}
