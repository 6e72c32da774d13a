use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::{Assessment, Course, User};
use crate::db::types::AssessmentKind;
use crate::repositories;

pub(crate) struct CurrentUser(pub(crate) User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        let user = repositories::users::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized("User not found"));
        };

        if !user.is_active {
            return Err(ApiError::Unauthorized("Invalid authentication credentials"));
        }

        Ok(CurrentUser(user))
    }
}

pub(crate) async fn require_course_owner(
    state: &AppState,
    user: &User,
    course_id: &str,
) -> Result<Course, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if course.owner_id != user.id {
        return Err(ApiError::Forbidden("Not the owner of this course"));
    }

    Ok(course)
}

pub(crate) async fn require_assessment_owner(
    state: &AppState,
    user: &User,
    kind: AssessmentKind,
    assessment_id: &str,
) -> Result<Assessment, ApiError> {
    let assessment = repositories::assessments::find_by_id(state.db(), assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assessment"))?
        .filter(|assessment| assessment.kind == kind)
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", kind.label())))?;

    if assessment.owner_id != user.id {
        return Err(ApiError::Forbidden("Not the owner of this assessment"));
    }

    Ok(assessment)
}
