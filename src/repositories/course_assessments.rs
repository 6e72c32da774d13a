use time::PrimitiveDateTime;

use crate::db::models::CourseAssessment;

const COLUMNS: &str = "id, course_id, owner_id, title, score, max_score, created_at, updated_at";

pub(crate) struct CreateCourseAssessment<'a> {
    pub id: &'a str,
    pub course_id: &'a str,
    pub owner_id: &'a str,
    pub title: &'a str,
    pub score: f64,
    pub max_score: f64,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateCourseAssessment<'_>,
) -> Result<CourseAssessment, sqlx::Error> {
    sqlx::query_as::<_, CourseAssessment>(&format!(
        "INSERT INTO course_assessments (
            id, course_id, owner_id, title, score, max_score, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.owner_id)
    .bind(params.title)
    .bind(params.score)
    .bind(params.max_score)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_in_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
    id: &str,
) -> Result<Option<CourseAssessment>, sqlx::Error> {
    sqlx::query_as::<_, CourseAssessment>(&format!(
        "SELECT {COLUMNS} FROM course_assessments WHERE id = $1 AND course_id = $2"
    ))
    .bind(id)
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn list_by_course(
    executor: impl sqlx::PgExecutor<'_>,
    course_id: &str,
) -> Result<Vec<CourseAssessment>, sqlx::Error> {
    sqlx::query_as::<_, CourseAssessment>(&format!(
        "SELECT {COLUMNS} FROM course_assessments WHERE course_id = $1 ORDER BY created_at, id"
    ))
    .bind(course_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn update(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    title: &str,
    score: f64,
    max_score: f64,
    updated_at: PrimitiveDateTime,
) -> Result<Option<CourseAssessment>, sqlx::Error> {
    sqlx::query_as::<_, CourseAssessment>(&format!(
        "UPDATE course_assessments
         SET title = $2, score = $3, max_score = $4, updated_at = $5
         WHERE id = $1
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(title)
    .bind(score)
    .bind(max_score)
    .bind(updated_at)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM course_assessments WHERE id = $1").bind(id).execute(executor).await?;
    Ok(())
}
