use time::PrimitiveDateTime;

use crate::db::models::Assessment;
use crate::db::types::{AssessmentKind, AssessmentStatus};

pub(crate) const COLUMNS: &str = "\
    id, kind, course_id, owner_id, title, status, contents_generated_at, \
    submitted_at, graded_at, created_at, updated_at";

pub(crate) struct CreateAssessment<'a> {
    pub id: &'a str,
    pub kind: AssessmentKind,
    pub course_id: &'a str,
    pub owner_id: &'a str,
    pub title: &'a str,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateAssessment<'_>,
) -> Result<Assessment, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "INSERT INTO assessments (
            id, kind, course_id, owner_id, title, status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.kind)
    .bind(params.course_id)
    .bind(params.owner_id)
    .bind(params.title)
    .bind(AssessmentStatus::GenerateInProgress)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!("SELECT {COLUMNS} FROM assessments WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Row-locks the assessment for the rest of the surrounding transaction.
pub(crate) async fn find_by_id_for_update(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {COLUMNS} FROM assessments WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn list_by_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    kind: AssessmentKind,
) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {COLUMNS}
         FROM assessments
         WHERE course_id = $1 AND kind = $2
         ORDER BY created_at DESC, id"
    ))
    .bind(course_id)
    .bind(kind)
    .fetch_all(executor)
    .await
}

pub(crate) async fn rename(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    title: &str,
    now: PrimitiveDateTime,
) -> Result<Assessment, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "UPDATE assessments SET title = $1, updated_at = $2 WHERE id = $3 RETURNING {COLUMNS}"
    ))
    .bind(title)
    .bind(now)
    .bind(id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn delete_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM assessments WHERE id = $1").bind(id).execute(executor).await?;
    Ok(())
}

/// Moves the status only if it still equals `expected`. Returns whether a row changed.
/// Entering a status stamps its matching timestamp column.
pub(crate) async fn compare_and_set_status(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    expected: AssessmentStatus,
    next: AssessmentStatus,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let (generated_at, submitted_at, graded_at) = match next {
        AssessmentStatus::NotStarted => (Some(now), None, None),
        AssessmentStatus::Submitted => (None, Some(now), None),
        AssessmentStatus::Graded | AssessmentStatus::PartiallyGraded => (None, None, Some(now)),
        AssessmentStatus::GenerateInProgress => (None, None, None),
    };

    let result = sqlx::query(
        "UPDATE assessments SET
            status = $1,
            contents_generated_at = COALESCE($2, contents_generated_at),
            submitted_at = COALESCE($3, submitted_at),
            graded_at = COALESCE($4, graded_at),
            updated_at = $5
         WHERE id = $6 AND status = $7",
    )
    .bind(next)
    .bind(generated_at)
    .bind(submitted_at)
    .bind(graded_at)
    .bind(now)
    .bind(id)
    .bind(expected)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}
