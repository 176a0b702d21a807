use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantId, ApplicantIntake, ApplicantStatusView};
use super::repository::ApplicantRepository;
use super::service::WaitlistService;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetPointsRequest {
    pub points: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AddPointsRequest {
    pub delta: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub applicants: Vec<ApplicantStatusView>,
}

/// Router builder exposing intake, points, and standings endpoints.
pub fn waitlist_router<R>(service: Arc<WaitlistService<R>>) -> Router
where
    R: ApplicantRepository + 'static,
{
    Router::new()
        .route("/api/v1/applicants", post(submit_handler::<R>))
        .route("/api/v1/applicants/:applicant_id", get(status_handler::<R>))
        .route(
            "/api/v1/applicants/:applicant_id/points",
            post(add_points_handler::<R>).put(set_points_handler::<R>),
        )
        .route("/api/v1/waitlist", get(standings_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<WaitlistService<R>>>,
    payload: Result<Json<ApplicantIntake>, JsonRejection>,
) -> Result<(StatusCode, Json<ApplicantStatusView>), AppError>
where
    R: ApplicantRepository + 'static,
{
    let Json(intake) = payload?;
    let record = service.submit(intake)?;
    Ok((StatusCode::CREATED, Json(record.status_view())))
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<WaitlistService<R>>>,
    Path(applicant_id): Path<String>,
) -> Result<Json<ApplicantStatusView>, AppError>
where
    R: ApplicantRepository + 'static,
{
    let record = service.get(&ApplicantId(applicant_id))?;
    Ok(Json(record.status_view()))
}

pub(crate) async fn set_points_handler<R>(
    State(service): State<Arc<WaitlistService<R>>>,
    Path(applicant_id): Path<String>,
    payload: Result<Json<SetPointsRequest>, JsonRejection>,
) -> Result<Json<ApplicantStatusView>, AppError>
where
    R: ApplicantRepository + 'static,
{
    let Json(request) = payload?;
    let record = service.set_points(&ApplicantId(applicant_id), request.points)?;
    Ok(Json(record.status_view()))
}

pub(crate) async fn add_points_handler<R>(
    State(service): State<Arc<WaitlistService<R>>>,
    Path(applicant_id): Path<String>,
    payload: Result<Json<AddPointsRequest>, JsonRejection>,
) -> Result<Json<ApplicantStatusView>, AppError>
where
    R: ApplicantRepository + 'static,
{
    let Json(request) = payload?;
    let record = service.add_points(&ApplicantId(applicant_id), request.delta)?;
    Ok(Json(record.status_view()))
}

pub(crate) async fn standings_handler<R>(
    State(service): State<Arc<WaitlistService<R>>>,
    query: Result<Query<StandingsQuery>, QueryRejection>,
) -> Result<Json<StandingsResponse>, AppError>
where
    R: ApplicantRepository + 'static,
{
    let Query(query) = query?;
    let applicants = service
        .standings(query.limit)?
        .iter()
        .map(|record| record.status_view())
        .collect();
    Ok(Json(StandingsResponse { applicants }))
}
