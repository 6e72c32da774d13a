use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Assessment, AssessmentItem};
use crate::db::types::{AssessmentKind, AssessmentStatus, QuestionType};
use crate::repositories;
use crate::schemas::assessment::GeneratedItem;
use crate::services::lifecycle::{LifecycleError, LifecycleEvent};

#[derive(Debug, Error)]
pub(crate) enum GenerationError {
    #[error("assessment not found")]
    NotFound,
    #[error("assessment belongs to another user")]
    NotOwner,
    #[error("items were already generated; assessment is {0}")]
    AlreadyGenerated(AssessmentStatus),
    #[error("at most {max} items are allowed")]
    TooManyItems { max: u64 },
    #[error("item {index}: {reason}")]
    InvalidItem { index: usize, reason: String },
    #[error("assessment status changed concurrently")]
    StatusRace,
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Stores generator output and opens the assessment for submission.
pub(crate) async fn record_generated_items(
    pool: &PgPool,
    kind: AssessmentKind,
    assessment_id: &str,
    user_id: &str,
    generated: &[GeneratedItem],
    max_items: u64,
) -> Result<(Assessment, Vec<AssessmentItem>), GenerationError> {
    if generated.len() as u64 > max_items {
        return Err(GenerationError::TooManyItems { max: max_items });
    }
    for (index, item) in generated.iter().enumerate() {
        check_item(item).map_err(|reason| GenerationError::InvalidItem { index, reason })?;
    }

    let mut tx = pool.begin().await?;

    let assessment = repositories::assessments::find_by_id_for_update(&mut *tx, assessment_id)
        .await?
        .filter(|assessment| assessment.kind == kind)
        .ok_or(GenerationError::NotFound)?;

    if assessment.owner_id != user_id {
        return Err(GenerationError::NotOwner);
    }
    if assessment.status != AssessmentStatus::GenerateInProgress {
        return Err(GenerationError::AlreadyGenerated(assessment.status));
    }
    let next = assessment.status.next(LifecycleEvent::ItemsGenerated)?;

    let now = primitive_now_utc();
    let mut items = Vec::with_capacity(generated.len());
    for (display_order, item) in generated.iter().enumerate() {
        let stored = repositories::items::create(
            &mut *tx,
            repositories::items::CreateItem {
                id: &Uuid::new_v4().to_string(),
                assessment_id,
                question: &item.question,
                question_type: item.question_type,
                explanation: item.explanation.as_deref(),
                is_true_answer: item.is_true_answer,
                choices: &item.choices,
                answer_indices: &item.answer_indices,
                text_answer: item.text_answer.as_deref(),
                display_order: display_order as i32,
                points: item.resolved_points(),
                created_at: now,
            },
        )
        .await?;
        items.push(stored);
    }

    let moved = repositories::assessments::compare_and_set_status(
        &mut *tx,
        assessment_id,
        assessment.status,
        next,
        now,
    )
    .await?;
    if !moved {
        return Err(GenerationError::StatusRace);
    }

    let assessment = repositories::assessments::find_by_id(&mut *tx, assessment_id)
        .await?
        .ok_or(GenerationError::NotFound)?;

    tx.commit().await?;

    tracing::info!(
        assessment_id = %assessment_id,
        kind = kind.as_str(),
        items = items.len(),
        "Generated items recorded"
    );

    Ok((assessment, items))
}

fn check_item(item: &GeneratedItem) -> Result<(), String> {
    if item.question_type != Some(QuestionType::MultipleChoice) {
        return Ok(());
    }

    let choices = item.choices.len() as i64;
    match item.answer_indices.iter().find(|index| **index < 0 || i64::from(**index) >= choices) {
        Some(index) => Err(format!("answer index {index} is outside the {choices} choices")),
        None => Ok(()),
    }
}
