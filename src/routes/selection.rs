use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::SelectionPipeline;
use crate::models::{ErrorResponse, HealthResponse, SelectVendorsRequest, SelectVendorsResponse};

/// Version tag reported with every selection
pub const ALGORITHM_VERSION: &str = "deterministic_pipeline_v1";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: SelectionPipeline,
}

/// Configure all selection routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/selections", web::post().to(select_vendors));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        oracle: state.pipeline.oracle_name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Vendor selection endpoint
///
/// POST /api/v1/selections
///
/// Request body:
/// ```json
/// {
///   "service_request": { "request_id": "REQ-001", "service_type": "AC Repair", ... },
///   "available_vendors": [{ "vendor_id": "vendor-1", ... }]
/// }
/// ```
///
/// A failed selection is still a `200`: the body carries an empty
/// `selected_vendors` list and the failure cause in `selection_reasoning`.
async fn select_vendors(
    state: web::Data<AppState>,
    req: web::Json<SelectVendorsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!(
            "Validation failed for selection request {}: {}",
            req.service_request.request_id,
            errors
        );
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let SelectVendorsRequest {
        service_request,
        available_vendors,
    } = req.into_inner();

    tracing::info!(
        "Processing selection request: {} ({} vendors)",
        service_request.request_id,
        available_vendors.len()
    );

    let result = state
        .pipeline
        .select(&service_request, &available_vendors)
        .await;

    HttpResponse::Ok().json(SelectVendorsResponse {
        selection_id: uuid::Uuid::new_v4().to_string(),
        result,
        algorithm_version: ALGORITHM_VERSION.to_string(),
        processing_time: chrono::Utc::now(),
    })
}
