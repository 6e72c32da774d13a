//! Automatic grading of assessment responses.
//!
//! `matcher` decides correctness for a single answer, `scoring` folds a whole
//! submission into a score without touching storage, and `engine` runs one
//! grading pass against the database on a caller supplied transaction.

mod engine;
mod matcher;
mod scoring;

use thiserror::Error;

pub(crate) use engine::grade_non_essay_questions;

#[derive(Debug, Error)]
pub(crate) enum GradingError {
    #[error("assessment {0} not found")]
    AssessmentNotFound(String),
    #[error("item {item_id} has no question type")]
    InvalidQuestionType { item_id: String },
    #[error("response {response_id} references item {item_id} outside the assessment")]
    ItemNotInAssessment { response_id: String, item_id: String },
    #[error("assessment {assessment_id} already graded for user {user_id}")]
    AlreadyGraded { assessment_id: String, user_id: String },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
