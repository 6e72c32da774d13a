use std::collections::HashSet;

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Assessment, AssessmentItem, AssessmentResult, ItemResponse};
use crate::db::types::{AssessmentKind, AssessmentStatus};
use crate::repositories;
use crate::schemas::assessment::AnswerSubmission;
use crate::services::grading::{self, GradingError};
use crate::services::lifecycle::{LifecycleError, LifecycleEvent};

#[derive(Debug, Error)]
pub(crate) enum SubmissionError {
    #[error("assessment not found")]
    NotFound,
    #[error("assessment belongs to another user")]
    NotOwner,
    #[error("items are still being generated")]
    GenerationPending,
    #[error("assessment is already {0}")]
    AlreadySubmitted(AssessmentStatus),
    #[error("submission contains no answers")]
    Empty,
    #[error("submission contains more than {max} answers")]
    TooManyAnswers { max: u64 },
    #[error("item {0} does not belong to this assessment")]
    UnknownItem(String),
    #[error("item {0} is answered more than once")]
    DuplicateItem(String),
    #[error("assessment status changed concurrently")]
    StatusRace,
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Grading(#[from] GradingError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug)]
pub(crate) struct SubmissionOutcome {
    pub(crate) assessment: Assessment,
    pub(crate) responses: Vec<ItemResponse>,
    pub(crate) result: AssessmentResult,
}

/// Stores the caller's answers and grades them in one transaction.
///
/// The assessment row stays locked until commit, so a concurrent submission for the
/// same assessment waits and then sees it is no longer `not_started`.
pub(crate) async fn submit_and_grade(
    pool: &PgPool,
    kind: AssessmentKind,
    assessment_id: &str,
    user_id: &str,
    answers: &[AnswerSubmission],
    max_answers: u64,
) -> Result<SubmissionOutcome, SubmissionError> {
    let mut tx = pool.begin().await?;

    let assessment = repositories::assessments::find_by_id_for_update(&mut *tx, assessment_id)
        .await?
        .filter(|assessment| assessment.kind == kind)
        .ok_or(SubmissionError::NotFound)?;

    if assessment.owner_id != user_id {
        return Err(SubmissionError::NotOwner);
    }

    match assessment.status {
        AssessmentStatus::GenerateInProgress => return Err(SubmissionError::GenerationPending),
        status if !status.accepts_submission() => {
            return Err(SubmissionError::AlreadySubmitted(status));
        }
        _ => {}
    }

    let items = repositories::items::list_by_assessment(&mut *tx, assessment_id).await?;
    validate_answers(answers, &items, max_answers)?;

    let now = primitive_now_utc();
    for answer in answers {
        repositories::responses::create(
            &mut *tx,
            repositories::responses::CreateResponse {
                id: &Uuid::new_v4().to_string(),
                assessment_id,
                item_id: &answer.item_id,
                user_id,
                selected_bool: answer.selected_bool,
                selected_indices: &answer.selected_indices,
                text_answer: answer.text_answer.as_deref(),
                created_at: now,
            },
        )
        .await?;
    }

    let submitted = assessment.status.next(LifecycleEvent::Submitted)?;
    move_status(&mut tx, assessment_id, assessment.status, submitted).await?;

    let pass = grading::grade_non_essay_questions(&mut tx, assessment_id, user_id).await?;

    let graded =
        submitted.next(LifecycleEvent::Graded { essays_pending: pass.essays_pending })?;
    move_status(&mut tx, assessment_id, submitted, graded).await?;

    let assessment = repositories::assessments::find_by_id(&mut *tx, assessment_id)
        .await?
        .ok_or(SubmissionError::NotFound)?;

    tx.commit().await?;

    tracing::info!(
        assessment_id = %assessment_id,
        user_id = %user_id,
        kind = kind.as_str(),
        answers = answers.len(),
        status = %graded,
        score = pass.result.score,
        max_score = pass.result.max_score,
        "Submission graded"
    );

    Ok(SubmissionOutcome { assessment, responses: pass.responses, result: pass.result })
}

async fn move_status(
    conn: &mut sqlx::PgConnection,
    assessment_id: &str,
    from: AssessmentStatus,
    to: AssessmentStatus,
) -> Result<(), SubmissionError> {
    let moved = repositories::assessments::compare_and_set_status(
        conn,
        assessment_id,
        from,
        to,
        primitive_now_utc(),
    )
    .await?;

    if !moved {
        tracing::warn!(
            assessment_id = %assessment_id,
            from = %from,
            to = %to,
            "Assessment status changed underneath submission"
        );
        return Err(SubmissionError::StatusRace);
    }

    tracing::debug!(assessment_id = %assessment_id, from = %from, to = %to, "Status moved");
    Ok(())
}

fn validate_answers(
    answers: &[AnswerSubmission],
    items: &[AssessmentItem],
    max_answers: u64,
) -> Result<(), SubmissionError> {
    if answers.is_empty() {
        return Err(SubmissionError::Empty);
    }
    if answers.len() as u64 > max_answers {
        return Err(SubmissionError::TooManyAnswers { max: max_answers });
    }

    let known: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
    let mut seen = HashSet::with_capacity(answers.len());

    for answer in answers {
        if !known.contains(answer.item_id.as_str()) {
            return Err(SubmissionError::UnknownItem(answer.item_id.clone()));
        }
        if !seen.insert(answer.item_id.as_str()) {
            return Err(SubmissionError::DuplicateItem(answer.item_id.clone()));
        }
    }

    Ok(())
}
