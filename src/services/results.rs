use std::collections::HashMap;

use sqlx::PgPool;
use thiserror::Error;

use crate::db::models::{Assessment, AssessmentItem, AssessmentResult, ItemResponse};
use crate::db::types::{AssessmentKind, AssessmentStatus};
use crate::repositories;
use crate::repositories::results::CourseResultRow;

#[derive(Debug, Error)]
pub(crate) enum ResultError {
    #[error("assessment not found")]
    NotFound,
    #[error("assessment belongs to another user")]
    NotOwner,
    #[error("assessment is {0} and has no result yet")]
    NotReady(AssessmentStatus),
    #[error("result row missing for a graded assessment")]
    Missing,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug)]
pub(crate) struct ResultDetail {
    pub(crate) assessment: Assessment,
    pub(crate) result: AssessmentResult,
    pub(crate) elements: Vec<(AssessmentItem, Option<ItemResponse>)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CourseAverage {
    pub(crate) average_percent: f64,
    pub(crate) results_counted: usize,
}

/// Loads the graded result of one assessment together with every item and the
/// caller's response to it.
pub(crate) async fn fetch_result(
    pool: &PgPool,
    kind: AssessmentKind,
    assessment_id: &str,
    user_id: &str,
) -> Result<ResultDetail, ResultError> {
    let assessment = repositories::assessments::find_by_id(pool, assessment_id)
        .await?
        .filter(|assessment| assessment.kind == kind)
        .ok_or(ResultError::NotFound)?;

    if assessment.owner_id != user_id {
        return Err(ResultError::NotOwner);
    }
    if !assessment.status.has_result() {
        return Err(ResultError::NotReady(assessment.status));
    }

    let result = repositories::results::find_for_assessment_user(pool, assessment_id, user_id)
        .await?
        .ok_or(ResultError::Missing)?;
    let items = repositories::items::list_by_assessment(pool, assessment_id).await?;
    let mut responses: HashMap<String, ItemResponse> =
        repositories::responses::list_by_assessment_user(pool, assessment_id, user_id)
            .await?
            .into_iter()
            .map(|response| (response.item_id.clone(), response))
            .collect();

    let elements = items
        .into_iter()
        .map(|item| {
            let response = responses.remove(&item.id);
            (item, response)
        })
        .collect();

    Ok(ResultDetail { assessment, result, elements })
}

pub(crate) async fn list_course_results(
    pool: &PgPool,
    kind: AssessmentKind,
    course_id: &str,
) -> Result<Vec<CourseResultRow>, ResultError> {
    Ok(repositories::results::list_by_course(pool, course_id, kind).await?)
}

pub(crate) async fn course_average_percent(
    pool: &PgPool,
    kind: AssessmentKind,
    course_id: &str,
) -> Result<CourseAverage, ResultError> {
    let rows = repositories::results::list_by_course(pool, course_id, kind).await?;
    Ok(average_percent(rows.iter().map(|row| (row.score, row.max_score))))
}

/// Mean of `score / max_score * 100`. Results worth zero points are left out.
pub(crate) fn average_percent(scores: impl IntoIterator<Item = (i32, i32)>) -> CourseAverage {
    let percents: Vec<f64> = scores
        .into_iter()
        .filter(|(_, max_score)| *max_score > 0)
        .map(|(score, max_score)| f64::from(score) / f64::from(max_score) * 100.0)
        .collect();

    if percents.is_empty() {
        return CourseAverage { average_percent: 0.0, results_counted: 0 };
    }

    CourseAverage {
        average_percent: percents.iter().sum::<f64>() / percents.len() as f64,
        results_counted: percents.len(),
    }
}
