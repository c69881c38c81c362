//! Shared test infrastructure for lifecycle tests.
//!
//! Most tests drive the engine against `MemoryProposalStore`. Tests that need
//! Postgres call `pg_pool()`, which returns `None` (and the test skips) unless
//! `TEST_DATABASE_URL` is set.

#![allow(dead_code)]

use chrono::NaiveDate;

use works_tracker::auth::{Actor, Role};
use works_tracker::lifecycle::*;
use works_tracker::models::proposal::{MemoryProposalStore, ProposalStatus, WorkProposal};

pub type TestEngine = LifecycleEngine<MemoryProposalStore>;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_ID: i64 = 1;
pub const ENGINEER_ID: i64 = 7;
pub const CLERK_ID: i64 = 9;
pub const SANCTION: f64 = 250_000.0;

pub fn engine() -> TestEngine {
    LifecycleEngine::new(MemoryProposalStore::new())
}

pub fn admin() -> Actor {
    Actor::new(ADMIN_ID, Role::Admin)
}

pub fn engineer() -> Actor {
    Actor::new(ENGINEER_ID, Role::Engineer)
}

pub fn clerk() -> Actor {
    Actor::new(CLERK_ID, Role::DepartmentUser)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn new_proposal(is_tender: bool) -> NewProposal {
    NewProposal {
        work_name: Some("Ward 4 drainage line".to_string()),
        description: Some("Replace open drain with RCC pipe".to_string()),
        financial_year: Some("2025-26".to_string()),
        city_id: Some(10),
        ward_id: Some(40),
        type_of_location_id: Some(3),
        department_id: Some(20),
        approving_department_id: Some(21),
        scheme_id: Some(30),
        work_agency_id: Some(50),
        type_of_work_id: Some(60),
        appointed_engineer_id: Some(ENGINEER_ID),
        appointed_sdo_id: Some(70),
        sanction_amount: Some(SANCTION),
        estimated_completion_date: Some(date(2026, 3, 31)),
        is_dpr: true,
        is_tender,
        ..Default::default()
    }
}

pub fn approve_number(number: &str) -> TechnicalApprovalInput {
    TechnicalApprovalInput {
        approval_number: Some(number.to_string()),
        ..Default::default()
    }
}

pub fn admin_approve_number(number: &str) -> AdministrativeApprovalInput {
    AdministrativeApprovalInput {
        approval_number: Some(number.to_string()),
        sanction_reference: Some("DIST/2025/118".to_string()),
        ..Default::default()
    }
}

pub fn work_order(number: &str) -> WorkOrderInput {
    WorkOrderInput {
        work_order_number: Some(number.to_string()),
        date_of_work_order: Some(date(2025, 7, 1)),
        contractor_or_gram_panchayat: Some("Shree Constructions".to_string()),
        remark: Some("Start within 15 days".to_string()),
        file: None,
    }
}

pub fn tender() -> TenderInput {
    TenderInput {
        title: Some("Drainage works package 4".to_string()),
        tender_id: Some("TND-2025-044".to_string()),
        ..Default::default()
    }
}

pub async fn submit(engine: &TestEngine, is_tender: bool) -> WorkProposal {
    engine.create(new_proposal(is_tender), &clerk()).await.expect("create proposal")
}

/// Create a proposal and drive it to `Pending Work Order`.
pub async fn at_pending_work_order(engine: &TestEngine, is_tender: bool) -> WorkProposal {
    let p = submit(engine, is_tender).await;
    let actor = admin();
    engine
        .technical_approval(p.id, ApprovalAction::Approve, approve_number("TA-1"), &actor)
        .await
        .expect("technical approval");
    let p = engine
        .administrative_approval(p.id, ApprovalAction::Approve, admin_approve_number("AA-1"), &actor)
        .await
        .expect("administrative approval");
    if is_tender {
        engine.start_tender_process(p.id, tender(), &actor).await.expect("start tender")
    } else {
        p
    }
}

/// Create a proposal and drive it to `Work In Progress` with the given work-order number.
pub async fn at_work_in_progress(engine: &TestEngine, number: &str) -> WorkProposal {
    let p = at_pending_work_order(engine, false).await;
    engine
        .create_work_order(p.id, work_order(number), &admin())
        .await
        .expect("create work order")
}

pub fn assert_status(p: &WorkProposal, status: ProposalStatus) {
    assert_eq!(p.current_status, status);
    assert_eq!(p.work_progress_stage, status, "status and stage must move together");
}

/// Postgres pool for store tests, or `None` when `TEST_DATABASE_URL` is unset.
pub async fn pg_pool() -> Option<sqlx::PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("Failed to connect to TEST_DATABASE_URL");
    works_tracker::db::run_migrations(&pool).await.expect("Failed to run migrations");
    Some(pool)
}
