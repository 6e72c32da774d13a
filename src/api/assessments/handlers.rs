use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_assessment_owner, require_course_owner, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::types::AssessmentKind;
use crate::repositories;
use crate::schemas::assessment::{
    AssessmentCreate, AssessmentResponse, AssessmentUpdate, CourseAverageResponse,
    CourseResultResponse, GeneratedItemsCreate, ItemView, ResponseView, ResultDetailResponse,
    ResultElement, ResultView, SubmissionCreate, SubmissionResponse,
};
use crate::services::{generation, results, submission};

pub(super) async fn create_assessment(
    Extension(kind): Extension<AssessmentKind>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AssessmentCreate>,
) -> Result<(StatusCode, Json<AssessmentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title must not be blank".to_string()));
    }

    let course = require_course_owner(&state, &user, &payload.course_id).await?;

    let assessment = repositories::assessments::create(
        state.db(),
        repositories::assessments::CreateAssessment {
            id: &Uuid::new_v4().to_string(),
            kind,
            course_id: &course.id,
            owner_id: &user.id,
            title,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assessment"))?;

    tracing::info!(
        assessment_id = %assessment.id,
        course_id = %course.id,
        kind = kind.as_str(),
        "Assessment created; awaiting generated items"
    );

    Ok((StatusCode::CREATED, Json(AssessmentResponse::from_db(assessment))))
}

pub(super) async fn list_course_assessments(
    Extension(kind): Extension<AssessmentKind>,
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssessmentResponse>>, ApiError> {
    require_course_owner(&state, &user, &course_id).await?;

    let assessments = repositories::assessments::list_by_course(state.db(), &course_id, kind)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assessments"))?;

    Ok(Json(assessments.into_iter().map(AssessmentResponse::from_db).collect()))
}

pub(super) async fn list_course_results(
    Extension(kind): Extension<AssessmentKind>,
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResultResponse>>, ApiError> {
    require_course_owner(&state, &user, &course_id).await?;

    let rows = results::list_course_results(state.db(), kind, &course_id).await?;
    let response = rows
        .into_iter()
        .map(|row| CourseResultResponse {
            id: row.id,
            assessment_id: row.assessment_id,
            assessment_title: row.assessment_title,
            user_id: row.user_id,
            score: row.score,
            max_score: row.max_score,
            started_at: format_primitive(row.started_at),
            ended_at: format_primitive(row.ended_at),
        })
        .collect();

    Ok(Json(response))
}

pub(super) async fn course_average(
    Extension(kind): Extension<AssessmentKind>,
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CourseAverageResponse>, ApiError> {
    require_course_owner(&state, &user, &course_id).await?;

    let average = results::course_average_percent(state.db(), kind, &course_id).await?;

    Ok(Json(CourseAverageResponse {
        course_id,
        kind,
        average_percent: average.average_percent,
        results_counted: average.results_counted,
    }))
}

pub(super) async fn list_liked_items(
    Extension(kind): Extension<AssessmentKind>,
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    require_course_owner(&state, &user, &course_id).await?;

    let assessments = repositories::assessments::list_by_course(state.db(), &course_id, kind)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assessments"))?;
    let revealed: HashMap<String, bool> = assessments
        .into_iter()
        .map(|assessment| (assessment.id, assessment.status.has_result()))
        .collect();

    let items = repositories::items::list_liked_by_course(state.db(), &course_id, kind)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list liked items"))?;

    let views = items
        .into_iter()
        .map(|item| {
            let reveal = revealed.get(&item.assessment_id).copied().unwrap_or(false);
            ItemView::from_db(item, reveal)
        })
        .collect();

    Ok(Json(views))
}

pub(super) async fn get_assessment(
    Extension(kind): Extension<AssessmentKind>,
    Path(assessment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let assessment = require_assessment_owner(&state, &user, kind, &assessment_id).await?;

    let items = repositories::items::list_by_assessment(state.db(), &assessment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list items"))?;

    Ok(Json(AssessmentResponse::with_items(assessment, items)))
}

pub(super) async fn update_assessment(
    Extension(kind): Extension<AssessmentKind>,
    Path(assessment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AssessmentUpdate>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title must not be blank".to_string()));
    }

    let assessment = require_assessment_owner(&state, &user, kind, &assessment_id).await?;

    let renamed =
        repositories::assessments::rename(state.db(), &assessment.id, title, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update assessment"))?;

    Ok(Json(AssessmentResponse::from_db(renamed)))
}

pub(super) async fn delete_assessment(
    Extension(kind): Extension<AssessmentKind>,
    Path(assessment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let assessment = require_assessment_owner(&state, &user, kind, &assessment_id).await?;

    repositories::assessments::delete_by_id(state.db(), &assessment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete assessment"))?;

    tracing::info!(assessment_id = %assessment.id, kind = kind.as_str(), "Assessment deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn add_generated_items(
    Extension(kind): Extension<AssessmentKind>,
    Path(assessment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<GeneratedItemsCreate>,
) -> Result<(StatusCode, Json<AssessmentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (assessment, items) = generation::record_generated_items(
        state.db(),
        kind,
        &assessment_id,
        &user.id,
        &payload.items,
        state.settings().assessment().max_items_per_assessment,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(AssessmentResponse::with_items(assessment, items))))
}

pub(super) async fn submit_assessment(
    Extension(kind): Extension<AssessmentKind>,
    Path(assessment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SubmissionCreate>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let outcome = submission::submit_and_grade(
        state.db(),
        kind,
        &assessment_id,
        &user.id,
        &payload.answers,
        state.settings().assessment().max_items_per_assessment,
    )
    .await?;

    Ok(Json(SubmissionResponse {
        assessment_id: outcome.assessment.id,
        status: outcome.assessment.status,
        responses: outcome.responses.into_iter().map(ResponseView::from_db).collect(),
        result: ResultView::from_db(outcome.result),
    }))
}

pub(super) async fn get_result(
    Extension(kind): Extension<AssessmentKind>,
    Path(assessment_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ResultDetailResponse>, ApiError> {
    let detail = results::fetch_result(state.db(), kind, &assessment_id, &user.id).await?;

    let elements = detail
        .elements
        .into_iter()
        .map(|(item, response)| ResultElement {
            item: ItemView::from_db(item, true),
            response: response.map(ResponseView::from_db),
        })
        .collect();

    Ok(Json(ResultDetailResponse {
        assessment: AssessmentResponse::from_db(detail.assessment),
        result: ResultView::from_db(detail.result),
        elements,
    }))
}

pub(super) async fn toggle_item_like(
    Extension(kind): Extension<AssessmentKind>,
    Path((assessment_id, item_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ItemView>, ApiError> {
    let assessment = require_assessment_owner(&state, &user, kind, &assessment_id).await?;

    repositories::items::find_in_assessment(state.db(), &assessment.id, &item_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch item"))?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    let item = repositories::items::toggle_like(state.db(), &item_id, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to toggle item like"))?;

    Ok(Json(ItemView::from_db(item, assessment.status.has_result())))
}
