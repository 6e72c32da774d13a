use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::course_assessments;
use crate::api::errors::ApiError;
use crate::api::guards::{require_course_owner, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::course::{CourseCreate, CourseResponse, CourseUpdate};
use crate::schemas::semester::GradesUpdate;
use crate::services::semesters;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/semester/:semester_id", get(list_semester_courses))
        .route("/:course_id", get(get_course).put(update_course).delete(delete_course))
        .route("/:course_id/grades", put(update_course_grades))
        .nest("/:course_id/assessments", course_assessments::router())
}

fn non_blank_title(title: &str) -> Result<&str, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Course title must not be empty".to_string()));
    }
    Ok(title)
}

async fn create_course(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let title = non_blank_title(&payload.title)?;

    let semester_id = match payload.semester_id.as_deref() {
        Some(semester_id) => {
            Some(semesters::load_owned(state.db(), &user.id, semester_id).await?.id)
        }
        None => None,
    };

    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            owner_id: &user.id,
            semester_id: semester_id.as_deref(),
            title,
            description: payload.description.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    tracing::info!(course_id = %course.id, owner_id = %user.id, "Course created");

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn list_courses(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_by_owner(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn list_semester_courses(
    Path(semester_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let semester = semesters::load_owned(state.db(), &user.id, &semester_id).await?;
    let courses = repositories::courses::list_by_semester(state.db(), &semester.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn get_course(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = require_course_owner(&state, &user, &course_id).await?;
    Ok(Json(CourseResponse::from_db(course)))
}

async fn update_course(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let title = non_blank_title(&payload.title)?;
    let course = require_course_owner(&state, &user, &course_id).await?;

    let course = repositories::courses::update_details(
        state.db(),
        &course.id,
        title,
        payload.description.as_deref(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course"))?
    .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(CourseResponse::from_db(course)))
}

async fn update_course_grades(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<GradesUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let course = require_course_owner(&state, &user, &course_id).await?;

    let course = repositories::courses::update_grades(
        state.db(),
        &course.id,
        &payload.grades(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course grades"))?
    .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(CourseResponse::from_db(course)))
}

async fn delete_course(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let course = require_course_owner(&state, &user, &course_id).await?;
    repositories::courses::delete_by_id(state.db(), &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?;

    tracing::info!(course_id = %course.id, owner_id = %user.id, "Course deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
