pub mod proposal_handlers;
pub mod reference_handlers;

use actix_web::{
    web, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::Next,
};

use crate::errors::ApiErrorResponse;

/// Rejects mutation requests that are not `Content-Type: application/json`.
/// Browsers cannot send cross-origin JSON with cookies via a simple form
/// POST, so the check doubles as CSRF protection for the session cookie.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();
    let has_body = method == Method::POST || method == Method::PUT || method == Method::PATCH;

    if has_body {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let response = HttpResponse::UnsupportedMediaType().json(ApiErrorResponse {
                error: "unsupported_media_type".to_string(),
                details: Some("Content-Type must be application/json for mutation requests".to_string()),
            });
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure `/api/v1` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use proposal_handlers::{crud, progress, workflow};

    cfg.service(
        web::scope("/proposals")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::post().to(crud::create))
            .route("/{id}", web::get().to(crud::read))
            .route("/{id}", web::put().to(crud::update))
            .route("/{id}", web::delete().to(crud::delete))
            .route("/{id}/audit", web::get().to(crud::audit_trail))
            .route("/{id}/technical-approval", web::post().to(workflow::technical_approval))
            .route("/{id}/technical-approval", web::patch().to(workflow::update_technical_approval))
            .route("/{id}/administrative-approval", web::post().to(workflow::administrative_approval))
            .route("/{id}/administrative-approval", web::patch().to(workflow::update_administrative_approval))
            .route("/{id}/tender", web::post().to(workflow::start_tender))
            .route("/{id}/tender", web::patch().to(workflow::update_tender))
            .route("/{id}/tender/award", web::post().to(workflow::award_tender))
            .route("/{id}/work-order", web::post().to(workflow::create_work_order))
            .route("/{id}/work-order", web::patch().to(workflow::update_work_order))
            .route("/{id}/start-work", web::post().to(workflow::start_work))
            .route("/{id}/completion", web::post().to(workflow::record_completion))
            .route("/{id}/progress", web::post().to(progress::add))
            .route("/{id}/progress/{entry_id}", web::delete().to(progress::delete)),
    );
    cfg.service(
        web::scope("/references")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/{kind}", web::get().to(reference_handlers::list))
            .route("/{kind}", web::post().to(reference_handlers::create))
            .route("/{kind}/{id}", web::put().to(reference_handlers::update))
            .route("/{kind}/{id}", web::delete().to(reference_handlers::delete)),
    );
}
