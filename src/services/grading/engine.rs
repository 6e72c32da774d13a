use sqlx::PgConnection;
use uuid::Uuid;

use crate::core::metrics;
use crate::core::time::primitive_now_utc;
use crate::db::models::{AssessmentResult, ItemResponse};
use crate::db::types::Correctness;
use crate::repositories;

use super::scoring::score_responses;
use super::GradingError;

#[derive(Debug)]
pub(crate) struct GradingPass {
    pub(crate) result: AssessmentResult,
    pub(crate) responses: Vec<ItemResponse>,
    pub(crate) essays_pending: bool,
}

/// Grades every non-essay response of `user_id` on one assessment and stores the result.
///
/// All writes go through `conn`; the caller owns the transaction and must roll it
/// back when this returns an error.
pub(crate) async fn grade_non_essay_questions(
    conn: &mut PgConnection,
    assessment_id: &str,
    user_id: &str,
) -> Result<GradingPass, GradingError> {
    let assessment = repositories::assessments::find_by_id(&mut *conn, assessment_id)
        .await?
        .ok_or_else(|| GradingError::AssessmentNotFound(assessment_id.to_string()))?;
    let kind = assessment.kind.as_str();

    let items = repositories::items::list_by_assessment(&mut *conn, assessment_id).await?;
    let mut responses =
        repositories::responses::list_by_assessment_user(&mut *conn, assessment_id, user_id)
            .await?;

    let outcome = match score_responses(&items, &responses) {
        Ok(outcome) => outcome,
        Err(err) => {
            metrics::record_grading_pass(kind, "rejected");
            tracing::error!(
                assessment_id = %assessment_id,
                user_id = %user_id,
                error = %err,
                "Grading pass aborted"
            );
            return Err(err);
        }
    };

    let now = primitive_now_utc();
    // `scored` is index-aligned with `responses`.
    for (response, scored) in responses.iter_mut().zip(&outcome.scored) {
        if scored.correctness == Correctness::Ungraded {
            continue;
        }
        repositories::responses::update_correctness(
            &mut *conn,
            &scored.response_id,
            scored.correctness,
            now,
        )
        .await?;
        response.correctness = scored.correctness;
        response.updated_at = now;
    }

    let result = repositories::results::insert_if_absent(
        &mut *conn,
        repositories::results::CreateResult {
            id: &Uuid::new_v4().to_string(),
            assessment_id,
            user_id,
            score: outcome.score,
            max_score: outcome.max_score,
            started_at: assessment.contents_generated_at.unwrap_or(assessment.created_at),
            ended_at: now,
        },
    )
    .await?;

    let Some(result) = result else {
        metrics::record_grading_pass(kind, "duplicate");
        tracing::warn!(
            assessment_id = %assessment_id,
            user_id = %user_id,
            "Result already exists; refusing second grading pass"
        );
        return Err(GradingError::AlreadyGraded {
            assessment_id: assessment_id.to_string(),
            user_id: user_id.to_string(),
        });
    };

    metrics::record_grading_pass(kind, "graded");
    metrics::record_score_ratio(kind, result.score, result.max_score);
    tracing::info!(
        assessment_id = %assessment_id,
        user_id = %user_id,
        kind,
        score = result.score,
        max_score = result.max_score,
        responses = outcome.scored.len(),
        essays_pending = outcome.essays_pending,
        "Grading pass completed"
    );

    Ok(GradingPass { result, responses, essays_pending: outcome.essays_pending })
}
