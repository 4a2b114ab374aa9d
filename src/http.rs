//! JSON HTTP adapter. Thin by design: handlers translate bodies and status
//! codes, the engine owns every decision.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::engine::{Engine, EngineError};
use crate::model::{AllocationResult, Ms, Reservation, ReservationRequest, Resource};
use crate::observability;

pub type AppState = Arc<Engine>;

pub fn router(engine: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/v1/resources", get(list_resources).post(create_resource))
        .route(
            "/api/v1/resources/{id}",
            get(get_resource).put(update_resource).delete(delete_resource),
        )
        .route(
            "/api/v1/reservations",
            get(list_upcoming).post(create_reservation),
        )
        .with_state(engine)
}

// ── DTOs ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    pub make: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: String,
    pub make: String,
    pub model: String,
}

impl From<Resource> for ResourceResponse {
    fn from(resource: Resource) -> Self {
        Self {
            id: resource.id,
            make: resource.make,
            model: resource.model,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// Start instant, unix milliseconds.
    pub start: Ms,
    pub duration_minutes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationResponse {
    pub reservation_id: Option<Ulid>,
    pub resource_id: Option<String>,
    pub message: String,
}

impl From<AllocationResult> for CreateReservationResponse {
    fn from(result: AllocationResult) -> Self {
        match result {
            AllocationResult::Confirmed {
                reservation_id,
                resource_id,
                message,
            } => Self {
                reservation_id: Some(reservation_id),
                resource_id: Some(resource_id),
                message,
            },
            AllocationResult::Rejected { reason } => Self {
                reservation_id: None,
                resource_id: None,
                message: reason,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: Ulid,
    pub resource_id: String,
    pub start: Ms,
    pub duration_minutes: i64,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            resource_id: reservation.resource_id.clone(),
            start: reservation.start,
            duration_minutes: reservation.duration / 60_000,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpcomingParams {
    /// Inclusive upper bound on the reservation start, unix milliseconds.
    pub limit: Option<Ms>,
}

// ── Error mapping ────────────────────────────────────────

/// Engine usage errors mapped onto status codes; the body is the display
/// message.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::InvalidArgument(_) | EngineError::LimitExceeded(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        (status, self.0.to_string()).into_response()
    }
}

/// Per-field request validation, every violation reported.
fn validate_resource_request(request: &ResourceRequest) -> Vec<String> {
    let mut errors = Vec::new();
    for (field, value) in [("make", &request.make), ("model", &request.model)] {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            errors.push(format!("The {field} should not be empty."));
        } else if trimmed.len() < 2 {
            errors.push(format!("The {field} should have at least 2 characters."));
        }
    }
    errors
}

// ── Handlers ─────────────────────────────────────────────

async fn healthz() -> &'static str {
    "ok"
}

async fn list_resources(State(engine): State<AppState>) -> Json<Vec<ResourceResponse>> {
    let resources = engine.list_resources().await;
    Json(resources.into_iter().map(Into::into).collect())
}

async fn get_resource(
    State(engine): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResourceResponse>, StatusCode> {
    engine
        .get_resource(&id)
        .await
        .map(|r| Json(r.into()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_resource(
    State(engine): State<AppState>,
    Json(request): Json<ResourceRequest>,
) -> Result<Response, ApiError> {
    let errors = validate_resource_request(&request);
    if !errors.is_empty() {
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response());
    }

    let id = engine.resources.add(request.make, request.model).await?;
    metrics::gauge!(observability::RESOURCES_ACTIVE).increment(1.0);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "resourceId": id })),
    )
        .into_response())
}

async fn update_resource(
    State(engine): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ResourceRequest>,
) -> Result<Response, ApiError> {
    let errors = validate_resource_request(&request);
    if !errors.is_empty() {
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response());
    }

    let updated = engine
        .resources
        .update(&id, request.make, request.model)
        .await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ResourceResponse::from(updated)),
    )
        .into_response())
}

async fn delete_resource(
    State(engine): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    engine.resources.remove(&id).await?;
    metrics::gauge!(observability::RESOURCES_ACTIVE).decrement(1.0);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_upcoming(
    State(engine): State<AppState>,
    Query(params): Query<UpcomingParams>,
) -> Json<Vec<ReservationResponse>> {
    let upcoming = engine.list_upcoming(params.limit).await;
    Json(upcoming.into_iter().map(Into::into).collect())
}

async fn create_reservation(
    State(engine): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Response {
    let timer = Instant::now();
    let result = engine
        .reserve(ReservationRequest {
            start: request.start,
            duration: request.duration_minutes.saturating_mul(60_000),
        })
        .await;
    metrics::histogram!(observability::RESERVE_DURATION_SECONDS)
        .record(timer.elapsed().as_secs_f64());

    // Same JSON shape either way; rejections carry null ids.
    let status = if result.is_confirmed() {
        metrics::counter!(observability::RESERVATIONS_TOTAL, "outcome" => "confirmed")
            .increment(1);
        StatusCode::OK
    } else {
        metrics::counter!(observability::RESERVATIONS_TOTAL, "outcome" => "rejected")
            .increment(1);
        StatusCode::BAD_REQUEST
    };
    (status, Json(CreateReservationResponse::from(result))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_request_validation_collects_all_errors() {
        let request = ResourceRequest {
            make: "".into(),
            model: "X".into(),
        };
        let errors = validate_resource_request(&request);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("make"));
        assert!(errors[1].contains("model"));
    }

    #[test]
    fn resource_request_validation_accepts_good_input() {
        let request = ResourceRequest {
            make: "Tesla".into(),
            model: "Model 3".into(),
        };
        assert!(validate_resource_request(&request).is_empty());
    }

    #[test]
    fn rejected_result_maps_to_null_ids() {
        let response = CreateReservationResponse::from(AllocationResult::Rejected {
            reason: "nope".into(),
        });
        assert!(response.reservation_id.is_none());
        assert!(response.resource_id.is_none());
        assert_eq!(response.message, "nope");
    }
}
