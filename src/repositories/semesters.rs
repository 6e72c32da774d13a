use time::{Date, PrimitiveDateTime};

use crate::db::models::Semester;
use crate::db::types::Season;

use super::Grades;

const COLUMNS: &str = "id, owner_id, name, year, season, start_date, end_date, target_grade, \
                       earned_grade, completed_credits, created_at, updated_at";

pub(crate) struct CreateSemester<'a> {
    pub id: &'a str,
    pub owner_id: &'a str,
    pub name: &'a str,
    pub year: i32,
    pub season: Season,
    pub created_at: PrimitiveDateTime,
}

/// Returns `None` when the owner already has a semester for that year and season.
pub(crate) async fn insert_if_absent(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateSemester<'_>,
) -> Result<Option<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!(
        "INSERT INTO semesters (id, owner_id, name, year, season, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $6)
         ON CONFLICT (owner_id, year, season) DO NOTHING
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.owner_id)
    .bind(params.name)
    .bind(params.year)
    .bind(params.season)
    .bind(params.created_at)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!("SELECT {COLUMNS} FROM semesters WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn find_by_owner_year_season(
    executor: impl sqlx::PgExecutor<'_>,
    owner_id: &str,
    year: i32,
    season: Season,
) -> Result<Option<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!(
        "SELECT {COLUMNS} FROM semesters WHERE owner_id = $1 AND year = $2 AND season = $3"
    ))
    .bind(owner_id)
    .bind(year)
    .bind(season)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn list_by_owner(
    executor: impl sqlx::PgExecutor<'_>,
    owner_id: &str,
) -> Result<Vec<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!(
        "SELECT {COLUMNS} FROM semesters WHERE owner_id = $1 ORDER BY year DESC, season DESC, id"
    ))
    .bind(owner_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn update_details(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    name: &str,
    year: i32,
    season: Season,
    updated_at: PrimitiveDateTime,
) -> Result<Option<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!(
        "UPDATE semesters SET name = $2, year = $3, season = $4, updated_at = $5
         WHERE id = $1
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(name)
    .bind(year)
    .bind(season)
    .bind(updated_at)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn update_dates(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    start_date: Date,
    end_date: Date,
    updated_at: PrimitiveDateTime,
) -> Result<Option<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!(
        "UPDATE semesters SET start_date = $2, end_date = $3, updated_at = $4
         WHERE id = $1
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(start_date)
    .bind(end_date)
    .bind(updated_at)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn update_grades(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    grades: &Grades,
    updated_at: PrimitiveDateTime,
) -> Result<Option<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!(
        "UPDATE semesters
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
    sqlx::query("DELETE FROM semesters WHERE id = $1").bind(id).execute(executor).await?;
    Ok(())
}
