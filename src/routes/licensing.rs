use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::Matcher;
use crate::models::{
    BusinessProfile, ErrorResponse, HealthResponse, MatchResponse, ProviderStatusResponse,
    ReportRequest, ReportResponse,
};
use crate::services::ReportService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub reports: Arc<ReportService>,
}

/// Configure all licensing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ai/status", web::get().to(ai_status))
        .route("/requirements", web::get().to(get_requirements))
        .route("/match", web::post().to(match_business))
        .route("/report", web::post().to(generate_report));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        requirements: state.matcher.catalog().len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Report which provider is configured
async fn ai_status(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ProviderStatusResponse {
        provider: state.reports.provider().to_string(),
    })
}

/// Return the full requirement catalog
async fn get_requirements(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.matcher.catalog())
}

/// Match a business profile against the catalog
///
/// POST /api/match
async fn match_business(
    state: web::Data<AppState>,
    req: web::Json<BusinessProfile>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let business = req.into_inner();
    let matched = state.matcher.find_matches(&business);

    tracing::info!(
        "Matched {} requirements for business (size={}, seats={}, area={}, staff={}, features={})",
        matched.len(),
        business.size,
        business.seats,
        business.area_sqm,
        business.staff_count,
        business.features.len()
    );

    HttpResponse::Ok().json(MatchResponse { business, matched })
}

/// Generate a compliance report for previously matched requirements
///
/// POST /api/report
async fn generate_report(
    state: web::Data<AppState>,
    req: web::Json<ReportRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for report request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request = req.into_inner();
    let outcome = state
        .reports
        .generate(&request.business, &request.matches)
        .await;

    tracing::info!(
        "Generated report for {} matches (mode={:?}, provider={})",
        request.matches.len(),
        outcome.metadata.mode,
        outcome.metadata.provider
    );

    HttpResponse::Ok().json(ReportResponse {
        report: outcome.report,
        metadata: outcome.metadata,
    })
}
