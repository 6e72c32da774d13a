use time::PrimitiveDateTime;

use crate::db::models::AssessmentItem;
use crate::db::types::{AssessmentKind, QuestionType};

pub(crate) const COLUMNS: &str = "\
    id, assessment_id, question, question_type, explanation, is_true_answer, choices, \
    answer_indices, text_answer, display_order, points, is_liked, created_at, updated_at";

pub(crate) struct CreateItem<'a> {
    pub id: &'a str,
    pub assessment_id: &'a str,
    pub question: &'a str,
    pub question_type: Option<QuestionType>,
    pub explanation: Option<&'a str>,
    pub is_true_answer: Option<bool>,
    pub choices: &'a [String],
    pub answer_indices: &'a [i32],
    pub text_answer: Option<&'a str>,
    pub display_order: i32,
    pub points: i32,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateItem<'_>,
) -> Result<AssessmentItem, sqlx::Error> {
    sqlx::query_as::<_, AssessmentItem>(&format!(
        "INSERT INTO assessment_items (
            id, assessment_id, question, question_type, explanation, is_true_answer,
            choices, answer_indices, text_answer, display_order, points, is_liked,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,FALSE,$12,$12)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.assessment_id)
    .bind(params.question)
    .bind(params.question_type)
    .bind(params.explanation)
    .bind(params.is_true_answer)
    .bind(params.choices)
    .bind(params.answer_indices)
    .bind(params.text_answer)
    .bind(params.display_order)
    .bind(params.points)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_by_assessment(
    executor: impl sqlx::PgExecutor<'_>,
    assessment_id: &str,
) -> Result<Vec<AssessmentItem>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentItem>(&format!(
        "SELECT {COLUMNS}
         FROM assessment_items
         WHERE assessment_id = $1
         ORDER BY display_order, created_at, id"
    ))
    .bind(assessment_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn find_in_assessment(
    executor: impl sqlx::PgExecutor<'_>,
    assessment_id: &str,
    item_id: &str,
) -> Result<Option<AssessmentItem>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentItem>(&format!(
        "SELECT {COLUMNS} FROM assessment_items WHERE id = $1 AND assessment_id = $2"
    ))
    .bind(item_id)
    .bind(assessment_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn toggle_like(
    executor: impl sqlx::PgExecutor<'_>,
    item_id: &str,
    now: PrimitiveDateTime,
) -> Result<AssessmentItem, sqlx::Error> {
    sqlx::query_as::<_, AssessmentItem>(&format!(
        "UPDATE assessment_items
         SET is_liked = NOT is_liked, updated_at = $1
         WHERE id = $2
         RETURNING {COLUMNS}"
    ))
    .bind(now)
    .bind(item_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_liked_by_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    kind: AssessmentKind,
) -> Result<Vec<AssessmentItem>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentItem>(
        "SELECT i.id, i.assessment_id, i.question, i.question_type, i.explanation,
                i.is_true_answer, i.choices, i.answer_indices, i.text_answer,
                i.display_order, i.points, i.is_liked, i.created_at, i.updated_at
         FROM assessment_items i
         JOIN assessments a ON a.id = i.assessment_id
         WHERE a.course_id = $1 AND a.kind = $2 AND i.is_liked
         ORDER BY i.updated_at DESC, i.id",
    )
    .bind(course_id)
    .bind(kind)
    .fetch_all(executor)
    .await
}
