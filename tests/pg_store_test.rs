//! Postgres store tests. Skipped unless `TEST_DATABASE_URL` points at a
//! scratch database.

mod common;

use common::*;
use works_tracker::errors::AppError;
use works_tracker::lifecycle::{LifecycleEngine, ProposalPatch};
use works_tracker::models::proposal::{PgProposalStore, ProposalStatus, ProposalStore};
use works_tracker::models::reference::{self, ReferenceForm, ReferenceKind};

macro_rules! pg_engine {
    () => {
        match pg_pool().await {
            Some(pool) => LifecycleEngine::new(PgProposalStore::new(pool)),
            None => {
                eprintln!("TEST_DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

#[tokio::test]
async fn test_pg_insert_and_load_round_trip() {
    let engine = pg_engine!();

    let created = engine.create(new_proposal(true), &clerk()).await.unwrap();
    assert_eq!(created.version, 1);
    assert_eq!(created.serial_number, format!("WP-{:06}", created.id));

    let loaded = engine.get(created.id).await.unwrap();
    assert_eq!(loaded, created);

    engine.delete(created.id, &admin()).await.unwrap();
}

#[tokio::test]
async fn test_pg_stale_save_is_rejected() {
    let engine = pg_engine!();
    let stale = engine.create(new_proposal(false), &clerk()).await.unwrap();

    let patch = ProposalPatch { work_name: Some("Renamed".to_string()), ..Default::default() };
    let fresh = engine.update(stale.id, patch, &clerk()).await.unwrap();
    assert_eq!(fresh.version, 2);

    let result = engine.store().save(&stale).await;
    assert!(matches!(result, Err(AppError::StaleWrite { .. })), "got {result:?}");
    assert_eq!(engine.get(stale.id).await.unwrap().work_name, "Renamed");

    let result = engine.store().delete(stale.id, stale.version).await;
    assert!(matches!(result, Err(AppError::StaleWrite { .. })));
    engine.store().delete(fresh.id, fresh.version).await.unwrap();
    assert!(matches!(engine.get(fresh.id).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_pg_work_order_number_is_unique() {
    let engine = pg_engine!();
    let number = unique("WO");

    let first = engine.create(new_proposal(false), &clerk()).await.unwrap();
    let second = engine.create(new_proposal(false), &clerk()).await.unwrap();
    for p in [&first, &second] {
        let patch = ProposalPatch {
            current_status: Some(ProposalStatus::PendingWorkOrder),
            ..Default::default()
        };
        engine.update(p.id, patch, &admin()).await.unwrap();
    }

    engine.create_work_order(first.id, work_order(&number), &admin()).await.unwrap();
    let result = engine.create_work_order(second.id, work_order(&number), &admin()).await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "got {result:?}");

    // Writing around the engine check still hits the unique index.
    let mut forged = engine.get(second.id).await.unwrap();
    forged.work_order = engine.get(first.id).await.unwrap().work_order;
    let result = engine.store().save(&forged).await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "got {result:?}");

    assert!(engine.store().work_order_number_in_use(&number, None).await.unwrap());
    assert!(!engine.store().work_order_number_in_use(&number, Some(first.id)).await.unwrap());
}

#[tokio::test]
async fn test_pg_reference_delete_is_guarded() {
    let engine = pg_engine!();
    let pool = engine.store().pool().clone();

    let form = ReferenceForm { name: unique("Ward"), parent_id: None, is_active: None };
    let ward = reference::create(&pool, ReferenceKind::Ward, &form).await.unwrap();

    let duplicate = ReferenceForm { name: form.name.to_uppercase(), ..form.clone() };
    let result = reference::create(&pool, ReferenceKind::Ward, &duplicate).await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "got {result:?}");

    let mut input = new_proposal(false);
    input.ward_id = Some(ward.id);
    let p = engine.create(input, &clerk()).await.unwrap();

    let result = reference::delete(&pool, engine.store(), ReferenceKind::Ward, ward.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "got {result:?}");

    engine.delete(p.id, &admin()).await.unwrap();
    reference::delete(&pool, engine.store(), ReferenceKind::Ward, ward.id).await.unwrap();
    assert!(reference::find_by_id(&pool, ReferenceKind::Ward, ward.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_pg_city_with_wards_cannot_be_deleted() {
    let engine = pg_engine!();
    let pool = engine.store().pool().clone();

    let city_form = ReferenceForm { name: unique("City"), parent_id: None, is_active: None };
    let city = reference::create(&pool, ReferenceKind::City, &city_form).await.unwrap();
    let ward_form = ReferenceForm { name: unique("Ward"), parent_id: Some(city.id), is_active: None };
    let ward = reference::create(&pool, ReferenceKind::Ward, &ward_form).await.unwrap();
    assert_eq!(ward.parent_id, Some(city.id));

    let result = reference::delete(&pool, engine.store(), ReferenceKind::City, city.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "got {result:?}");
    assert!(reference::find_by_id(&pool, ReferenceKind::City, city.id).await.unwrap().is_some());

    reference::delete(&pool, engine.store(), ReferenceKind::Ward, ward.id).await.unwrap();
    reference::delete(&pool, engine.store(), ReferenceKind::City, city.id).await.unwrap();
}

#[tokio::test]
async fn test_pg_ward_parent_must_be_a_city_and_can_be_cleared() {
    let engine = pg_engine!();
    let pool = engine.store().pool().clone();

    let scheme_form = ReferenceForm { name: unique("Scheme"), parent_id: None, is_active: None };
    let scheme = reference::create(&pool, ReferenceKind::Scheme, &scheme_form).await.unwrap();
    let city_form = ReferenceForm { name: unique("City"), parent_id: None, is_active: None };
    let city = reference::create(&pool, ReferenceKind::City, &city_form).await.unwrap();

    let wrong_parent = ReferenceForm { name: unique("Ward"), parent_id: Some(scheme.id), is_active: None };
    let result = reference::create(&pool, ReferenceKind::Ward, &wrong_parent).await;
    assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "parent_id"), "got {result:?}");

    let orphan_city = ReferenceForm { name: unique("City"), parent_id: Some(city.id), is_active: None };
    let result = reference::create(&pool, ReferenceKind::City, &orphan_city).await;
    assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "parent_id"), "got {result:?}");

    let ward_form = ReferenceForm { name: unique("Ward"), parent_id: Some(city.id), is_active: None };
    let ward = reference::create(&pool, ReferenceKind::Ward, &ward_form).await.unwrap();

    let cleared = ReferenceForm { parent_id: None, ..ward_form.clone() };
    let ward = reference::update(&pool, ReferenceKind::Ward, ward.id, &cleared).await.unwrap();
    assert_eq!(ward.parent_id, None);

    reference::delete(&pool, engine.store(), ReferenceKind::Ward, ward.id).await.unwrap();
    reference::delete(&pool, engine.store(), ReferenceKind::City, city.id).await.unwrap();
    reference::delete(&pool, engine.store(), ReferenceKind::Scheme, scheme.id).await.unwrap();
}
