//! Scores recorded by hand for coursework graded outside the service,
//! mounted under `/courses/:course_id/assessments`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_course_owner, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::CourseAssessment;
use crate::repositories;
use crate::schemas::course_assessment::{
    CourseAssessmentCreate, CourseAssessmentResponse, CourseAssessmentUpdate,
};
use crate::services::course_assessments::ScoreRecord;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_records).post(create_record)).route(
        "/:assessment_id",
        get(get_record).put(update_record).delete(delete_record),
    )
}

async fn load_record(
    state: &AppState,
    course_id: &str,
    assessment_id: &str,
) -> Result<CourseAssessment, ApiError> {
    repositories::course_assessments::find_in_course(state.db(), course_id, assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course assessment"))?
        .ok_or_else(|| ApiError::NotFound("Course assessment not found".to_string()))
}

async fn list_records(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseAssessmentResponse>>, ApiError> {
    let course = require_course_owner(&state, &user, &course_id).await?;
    let records = repositories::course_assessments::list_by_course(state.db(), &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list course assessments"))?;

    Ok(Json(records.into_iter().map(CourseAssessmentResponse::from_db).collect()))
}

async fn get_record(
    Path((course_id, assessment_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CourseAssessmentResponse>, ApiError> {
    let course = require_course_owner(&state, &user, &course_id).await?;
    let record = load_record(&state, &course.id, &assessment_id).await?;
    Ok(Json(CourseAssessmentResponse::from_db(record)))
}

async fn create_record(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CourseAssessmentCreate>,
) -> Result<(StatusCode, Json<CourseAssessmentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let checked = ScoreRecord::new(&payload.title, payload.score, payload.max_score)?;
    let course = require_course_owner(&state, &user, &course_id).await?;

    let record = repositories::course_assessments::create(
        state.db(),
        repositories::course_assessments::CreateCourseAssessment {
            id: &Uuid::new_v4().to_string(),
            course_id: &course.id,
            owner_id: &user.id,
            title: &checked.title,
            score: checked.score,
            max_score: checked.max_score,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course assessment"))?;

    tracing::info!(
        course_assessment_id = %record.id,
        course_id = %course.id,
        score = record.score,
        max_score = record.max_score,
        "Course assessment recorded"
    );

    Ok((StatusCode::CREATED, Json(CourseAssessmentResponse::from_db(record))))
}

async fn update_record(
    Path((course_id, assessment_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CourseAssessmentUpdate>,
) -> Result<Json<CourseAssessmentResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let course = require_course_owner(&state, &user, &course_id).await?;
    let existing = load_record(&state, &course.id, &assessment_id).await?;
    let merged = ScoreRecord::merge(
        &existing,
        payload.title.as_deref(),
        payload.score,
        payload.max_score,
    )?;

    let record = repositories::course_assessments::update(
        state.db(),
        &existing.id,
        &merged.title,
        merged.score,
        merged.max_score,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course assessment"))?
    .ok_or_else(|| ApiError::NotFound("Course assessment not found".to_string()))?;

    Ok(Json(CourseAssessmentResponse::from_db(record)))
}

async fn delete_record(
    Path((course_id, assessment_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let course = require_course_owner(&state, &user, &course_id).await?;
    let record = load_record(&state, &course.id, &assessment_id).await?;
    repositories::course_assessments::delete_by_id(state.db(), &record.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course assessment"))?;

    Ok(StatusCode::NO_CONTENT)
}
