use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::aggregation::{MonthlyTravelQuery, StatisticsOption};
use super::document_store::DocumentStoreError;
use super::models::{ErrorResponse, MonthlyCount, MonthlyTravelParams, StoredFlight};
use super::AppState;
use crate::record::FlightRecord;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn store_error(context: &str, e: DocumentStoreError) -> ApiError {
    log::error!("{}: {}", context, e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(format!("{}: {}", context, e))),
    )
}

/// Simple health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "flightgraph",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn create_flight_handler(
    State(app_state): State<Arc<AppState>>,
    Json(flight): Json<FlightRecord>,
) -> Result<(StatusCode, Json<StoredFlight>), ApiError> {
    log::debug!("Creating flight {} ({})", flight.id, flight.airline);

    let stored = app_state
        .documents
        .insert_flight(&flight)
        .await
        .map_err(|e| store_error("Failed to store flight", e))?;

    log::info!("Stored flight {} with _id {}", stored.flight.id, stored.id);
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn monthly_travel_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<MonthlyTravelParams>,
) -> Result<Json<Vec<MonthlyCount>>, ApiError> {
    let start_time = Instant::now();

    let query = MonthlyTravelQuery::parse(&params.option, &params.option_chosen).map_err(|e| {
        let allowed: Vec<&str> = StatisticsOption::ALL.iter().map(|o| o.as_str()).collect();
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.to_string()).with_hint(format!(
                "option must be one of: {}",
                allowed.join(", ")
            ))),
        )
    })?;

    let counts = app_state
        .documents
        .monthly_travel(&query)
        .await
        .map_err(|e| store_error("Failed to aggregate flights", e))?;

    log::info!(
        "Monthly travel for {}={:?}: {} months in {:.3}ms",
        query.option,
        query.chosen,
        counts.len(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(Json(counts))
}
