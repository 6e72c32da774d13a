use thiserror::Error;

use crate::db::models::CourseAssessment;

#[derive(Debug, Error, PartialEq)]
pub(crate) enum CourseAssessmentError {
    #[error("title must not be blank")]
    BlankTitle,
    #[error("score must not be negative")]
    NegativeScore,
    #[error("max score must be greater than zero")]
    NonPositiveMaxScore,
    #[error("score {score} exceeds max score {max_score}")]
    ScoreAboveMax { score: f64, max_score: f64 },
    #[error("update must change at least one field")]
    EmptyUpdate,
}

/// Title and score pair checked against the recording rules.
#[derive(Debug, PartialEq)]
pub(crate) struct ScoreRecord {
    pub(crate) title: String,
    pub(crate) score: f64,
    pub(crate) max_score: f64,
}

impl ScoreRecord {
    pub(crate) fn new(
        title: &str,
        score: f64,
        max_score: f64,
    ) -> Result<Self, CourseAssessmentError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CourseAssessmentError::BlankTitle);
        }
        if score.is_nan() || score < 0.0 {
            return Err(CourseAssessmentError::NegativeScore);
        }
        if max_score.is_nan() || max_score <= 0.0 {
            return Err(CourseAssessmentError::NonPositiveMaxScore);
        }
        if score > max_score {
            return Err(CourseAssessmentError::ScoreAboveMax { score, max_score });
        }
        Ok(Self { title: title.to_string(), score, max_score })
    }

    /// Overlays a partial update on a stored record; the merged values must still hold.
    pub(crate) fn merge(
        existing: &CourseAssessment,
        title: Option<&str>,
        score: Option<f64>,
        max_score: Option<f64>,
    ) -> Result<Self, CourseAssessmentError> {
        if title.is_none() && score.is_none() && max_score.is_none() {
            return Err(CourseAssessmentError::EmptyUpdate);
        }
        Self::new(
            title.unwrap_or(&existing.title),
            score.unwrap_or(existing.score),
            max_score.unwrap_or(existing.max_score),
        )
    }
}
