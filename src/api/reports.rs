use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::report::{ReportCreate, ReportResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_report))
        .route("/mine", get(list_my_reports))
        .route("/:report_id", delete(delete_report))
}

async fn create_report(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ReportCreate>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let assessment = repositories::assessments::find_by_id(state.db(), &payload.assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assessment"))?
        .ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))?;
    if assessment.owner_id != user.id {
        return Err(ApiError::Forbidden("Not the owner of this assessment"));
    }

    repositories::items::find_in_assessment(state.db(), &assessment.id, &payload.item_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch item"))?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    let report = repositories::reports::create(
        state.db(),
        repositories::reports::CreateReport {
            id: &Uuid::new_v4().to_string(),
            assessment_id: &assessment.id,
            item_id: &payload.item_id,
            user_id: &user.id,
            reason: payload.reason.trim(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create report"))?;

    tracing::info!(
        report_id = %report.id,
        assessment_id = %report.assessment_id,
        item_id = %report.item_id,
        "Question report filed"
    );

    Ok((StatusCode::CREATED, Json(ReportResponse::from_db(report))))
}

async fn list_my_reports(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportResponse>>, ApiError> {
    let reports = repositories::reports::list_by_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list reports"))?;

    Ok(Json(reports.into_iter().map(ReportResponse::from_db).collect()))
}

async fn delete_report(
    Path(report_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let report = repositories::reports::find_by_id(state.db(), &report_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch report"))?
        .ok_or_else(|| ApiError::NotFound("Report not found".to_string()))?;

    if report.user_id != user.id {
        return Err(ApiError::Forbidden("Not the author of this report"));
    }

    repositories::reports::delete_by_id(state.db(), &report.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete report"))?;

    Ok(StatusCode::NO_CONTENT)
}
