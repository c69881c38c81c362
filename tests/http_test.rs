//! Request guards and the JSON error contract, exercised without a database.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpResponse, cookie::Key, http::StatusCode, test, web};
use serde_json::Value;

use works_tracker::auth;
use works_tracker::errors::AppError;
use works_tracker::handlers;
use works_tracker::models::proposal::ProposalStatus;

fn session() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_secure(false)
        .build()
}

async fn ping() -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn wrong_state() -> Result<HttpResponse, AppError> {
    Err(AppError::invalid_state(
        &[ProposalStatus::PendingTender],
        ProposalStatus::PendingTechnicalApproval,
    ))
}

#[actix_rt::test]
async fn test_unauthenticated_request_gets_json_401() {
    let app = test::init_service(
        App::new().wrap(session()).service(
            web::scope("/api/v1")
                .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                .route("/ping", web::get().to(ping)),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/ping").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unauthenticated");
}

#[actix_rt::test]
async fn test_mutation_without_json_content_type_is_415() {
    let app = test::init_service(App::new().wrap(session()).configure(handlers::configure)).await;

    let req = test::TestRequest::post()
        .uri("/proposals")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload("work_name=Drain")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unsupported_media_type");
}

#[actix_rt::test]
async fn test_invalid_state_maps_to_409_with_details() {
    let app = test::init_service(App::new().route("/fail", web::post().to(wrong_state))).await;

    let req = test::TestRequest::post().uri("/fail").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_state");
    let details = body["details"].as_str().unwrap_or_default();
    assert!(details.contains("Pending Tender"), "details were: {details}");
}
