use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::semester::{
    GradesUpdate, SemesterDatesUpdate, SemesterInput, SemesterResponse, SemesterSearch,
};
use crate::services::semesters;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_semesters).post(create_semester))
        .route("/search", get(search_semester))
        .route(
            "/:semester_id",
            get(get_semester).put(update_semester).delete(delete_semester),
        )
        .route("/:semester_id/dates", put(update_semester_dates))
        .route("/:semester_id/grades", put(update_semester_grades))
}

async fn list_semesters(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SemesterResponse>>, ApiError> {
    let semesters = repositories::semesters::list_by_owner(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list semesters"))?;

    Ok(Json(semesters.into_iter().map(SemesterResponse::from_db).collect()))
}

async fn search_semester(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(search): Query<SemesterSearch>,
) -> Result<Json<SemesterResponse>, ApiError> {
    search.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let semester =
        semesters::find_by_year_season(state.db(), &user.id, search.year, search.season).await?;
    Ok(Json(SemesterResponse::from_db(semester)))
}

async fn get_semester(
    Path(semester_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<SemesterResponse>, ApiError> {
    let semester = semesters::load_owned(state.db(), &user.id, &semester_id).await?;
    Ok(Json(SemesterResponse::from_db(semester)))
}

async fn create_semester(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SemesterInput>,
) -> Result<(StatusCode, Json<SemesterResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let semester = semesters::create_semester(state.db(), &user.id, payload.draft()).await?;
    Ok((StatusCode::CREATED, Json(SemesterResponse::from_db(semester))))
}

async fn update_semester(
    Path(semester_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SemesterInput>,
) -> Result<Json<SemesterResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let semester =
        semesters::update_semester(state.db(), &user.id, &semester_id, payload.draft()).await?;
    Ok(Json(SemesterResponse::from_db(semester)))
}

async fn update_semester_dates(
    Path(semester_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SemesterDatesUpdate>,
) -> Result<Json<SemesterResponse>, ApiError> {
    let semester = semesters::update_dates(
        state.db(),
        &user.id,
        &semester_id,
        payload.start_date,
        payload.end_date,
    )
    .await?;
    Ok(Json(SemesterResponse::from_db(semester)))
}

async fn update_semester_grades(
    Path(semester_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<GradesUpdate>,
) -> Result<Json<SemesterResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let semester =
        semesters::update_grades(state.db(), &user.id, &semester_id, &payload.grades()).await?;
    Ok(Json(SemesterResponse::from_db(semester)))
}

async fn delete_semester(
    Path(semester_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    semesters::delete_semester(state.db(), &user.id, &semester_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
