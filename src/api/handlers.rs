//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use super::AppState;
use super::types::{CatalogResponse, ErrorResponse};
use crate::projection::{FinancialProjection, Projector, QuoteRequest};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorResponse { error: message }))
}

/// Projects a quote over 30 years.
///
/// `POST /projection` + `QuoteRequest` JSON → 200 + `FinancialProjection` JSON
/// Non-positive production or power, or a parameter out of range → 400 + `ErrorResponse`
/// Power or subscription missing from the catalog → 422 + `ErrorResponse`
pub async fn post_projection(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<FinancialProjection>, ApiError> {
    for (name, value) in [
        ("base_production_kwh", request.base_production_kwh),
        ("peak_power_kwc", request.peak_power_kwc),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(error(
                StatusCode::BAD_REQUEST,
                format!("`{name}` must be a positive number, got {value}"),
            ));
        }
    }
    if let Some((field, constraint)) = request.parameters.out_of_range().into_iter().next() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("`parameters.{field}` {constraint}"),
        ));
    }

    Projector::new(&state.catalog)
        .project(&request)
        .map(Json)
        .map_err(|e| {
            warn!(error = %e, "projection rejected");
            error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        })
}

/// Returns the kit prices and battery offers.
///
/// `GET /catalog` → 200 + `CatalogResponse` JSON
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(CatalogResponse::from(&state.catalog))
}
