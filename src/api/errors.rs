use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::course_assessments::CourseAssessmentError;
use crate::services::generation::GenerationError;
use crate::services::grading::GradingError;
use crate::services::results::ResultError;
use crate::services::semesters::SemesterError;
use crate::services::submission::SubmissionError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::Unauthorized(message) | ApiError::Forbidden(message) => message.to_string(),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                message
            }
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::Conflict(message) => message,
        };

        let mut response =
            (status, Json(ErrorResponse { status: status.as_u16(), detail })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<GradingError> for ApiError {
    fn from(err: GradingError) -> Self {
        match err {
            GradingError::AssessmentNotFound(_) => {
                ApiError::NotFound("Assessment not found".to_string())
            }
            GradingError::AlreadyGraded { .. } => {
                ApiError::Conflict("Assessment has already been graded".to_string())
            }
            GradingError::InvalidQuestionType { .. } | GradingError::ItemNotInAssessment { .. } => {
                ApiError::internal(err, "Assessment items cannot be graded")
            }
            GradingError::Database(err) => ApiError::internal(err, "Failed to grade assessment"),
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::NotFound => ApiError::NotFound("Assessment not found".to_string()),
            SubmissionError::NotOwner => {
                ApiError::Forbidden("Not allowed to submit this assessment")
            }
            SubmissionError::GenerationPending
            | SubmissionError::Empty
            | SubmissionError::TooManyAnswers { .. }
            | SubmissionError::UnknownItem(_)
            | SubmissionError::DuplicateItem(_) => ApiError::BadRequest(err.to_string()),
            SubmissionError::AlreadySubmitted(_)
            | SubmissionError::StatusRace
            | SubmissionError::Lifecycle(_) => ApiError::Conflict(err.to_string()),
            SubmissionError::Grading(err) => err.into(),
            SubmissionError::Database(err) => {
                ApiError::internal(err, "Failed to record submission")
            }
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::NotFound => ApiError::NotFound("Assessment not found".to_string()),
            GenerationError::NotOwner => {
                ApiError::Forbidden("Not allowed to modify this assessment")
            }
            GenerationError::TooManyItems { .. } | GenerationError::InvalidItem { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            GenerationError::AlreadyGenerated(_)
            | GenerationError::StatusRace
            | GenerationError::Lifecycle(_) => ApiError::Conflict(err.to_string()),
            GenerationError::Database(err) => {
                ApiError::internal(err, "Failed to store generated items")
            }
        }
    }
}

impl From<ResultError> for ApiError {
    fn from(err: ResultError) -> Self {
        match err {
            ResultError::NotFound => ApiError::NotFound("Assessment not found".to_string()),
            ResultError::NotOwner => ApiError::Forbidden("Not allowed to view this result"),
            ResultError::NotReady(_) => ApiError::BadRequest(err.to_string()),
            ResultError::Missing => ApiError::internal(err, "Failed to load result"),
            ResultError::Database(err) => ApiError::internal(err, "Failed to load results"),
        }
    }
}

impl From<SemesterError> for ApiError {
    fn from(err: SemesterError) -> Self {
        match err {
            SemesterError::NotFound => ApiError::NotFound("Semester not found".to_string()),
            SemesterError::NotOwner => ApiError::Forbidden("Not the owner of this semester"),
            SemesterError::EndBeforeStart { .. } => ApiError::BadRequest(err.to_string()),
            SemesterError::Duplicate { .. } => ApiError::Conflict(err.to_string()),
            SemesterError::Database(err) => ApiError::internal(err, "Failed to store semester"),
        }
    }
}

impl From<CourseAssessmentError> for ApiError {
    fn from(err: CourseAssessmentError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
