use time::PrimitiveDateTime;

use crate::db::models::AssessmentResult;
use crate::db::types::AssessmentKind;

pub(crate) const COLUMNS: &str = "\
    id, assessment_id, user_id, score, max_score, feedback, started_at, ended_at, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CourseResultRow {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) assessment_title: String,
    pub(crate) user_id: String,
    pub(crate) score: i32,
    pub(crate) max_score: i32,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) ended_at: PrimitiveDateTime,
}

pub(crate) struct CreateResult<'a> {
    pub id: &'a str,
    pub assessment_id: &'a str,
    pub user_id: &'a str,
    pub score: i32,
    pub max_score: i32,
    pub started_at: PrimitiveDateTime,
    pub ended_at: PrimitiveDateTime,
}

/// Inserts the result unless one already exists for the (assessment, user) pair,
/// in which case `None` is returned and nothing is written.
pub(crate) async fn insert_if_absent(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateResult<'_>,
) -> Result<Option<AssessmentResult>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentResult>(&format!(
        "INSERT INTO assessment_results (
            id, assessment_id, user_id, score, max_score, feedback,
            started_at, ended_at, created_at
        ) VALUES ($1,$2,$3,$4,$5,NULL,$6,$7,$7)
        ON CONFLICT (assessment_id, user_id) DO NOTHING
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.assessment_id)
    .bind(params.user_id)
    .bind(params.score)
    .bind(params.max_score)
    .bind(params.started_at)
    .bind(params.ended_at)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn find_for_assessment_user(
    executor: impl sqlx::PgExecutor<'_>,
    assessment_id: &str,
    user_id: &str,
) -> Result<Option<AssessmentResult>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentResult>(&format!(
        "SELECT {COLUMNS} FROM assessment_results WHERE assessment_id = $1 AND user_id = $2"
    ))
    .bind(assessment_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn list_by_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    kind: AssessmentKind,
) -> Result<Vec<CourseResultRow>, sqlx::Error> {
    sqlx::query_as::<_, CourseResultRow>(
        "SELECT r.id,
                r.assessment_id,
                a.title AS assessment_title,
                r.user_id,
                r.score,
                r.max_score,
                r.started_at,
                r.ended_at
         FROM assessment_results r
         JOIN assessments a ON a.id = r.assessment_id
         WHERE a.course_id = $1 AND a.kind = $2
         ORDER BY r.ended_at DESC, r.id",
    )
    .bind(course_id)
    .bind(kind)
    .fetch_all(executor)
    .await
}
