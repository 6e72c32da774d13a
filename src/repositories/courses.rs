use time::PrimitiveDateTime;

use crate::db::models::Course;

use super::Grades;

const COLUMNS: &str = "id, owner_id, semester_id, title, description, target_grade, \
                       earned_grade, completed_credits, created_at, updated_at";

pub(crate) struct CreateCourse<'a> {
    pub id: &'a str,
    pub owner_id: &'a str,
    pub semester_id: Option<&'a str>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateCourse<'_>,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (id, owner_id, semester_id, title, description, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.owner_id)
    .bind(params.semester_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn list_by_owner(
    executor: impl sqlx::PgExecutor<'_>,
    owner_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses WHERE owner_id = $1 ORDER BY created_at DESC, id"
    ))
    .bind(owner_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn list_by_semester(
    executor: impl sqlx::PgExecutor<'_>,
    semester_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses WHERE semester_id = $1 ORDER BY created_at DESC, id"
    ))
    .bind(semester_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn update_details(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    title: &str,
    description: Option<&str>,
    updated_at: PrimitiveDateTime,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "UPDATE courses SET title = $2, description = $3, updated_at = $4
         WHERE id = $1
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(updated_at)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn update_grades(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    grades: &Grades,
    updated_at: PrimitiveDateTime,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "UPDATE courses
         SET target_grade = $2, earned_grade = $3, completed_credits = $4, updated_at = $5
         WHERE id = $1
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(grades.target_grade)
    .bind(grades.earned_grade)
    .bind(grades.completed_credits)
    .bind(updated_at)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM courses WHERE id = $1").bind(id).execute(executor).await?;
    Ok(())
}
